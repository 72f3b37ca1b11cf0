//! Database module
//!
//! Database connection and schema utilities.

use sqlx::PgPool;

/// Schema for the `bank_accounts` table
const CREATE_BANK_ACCOUNTS: &str = r#"
CREATE TABLE IF NOT EXISTS bank_accounts (
    id              UUID PRIMARY KEY,
    account_number  TEXT NOT NULL,
    client_code     TEXT NOT NULL,
    client_type     SMALLINT NOT NULL,
    account_type    SMALLINT NOT NULL,
    balance         NUMERIC(28, 8) NOT NULL DEFAULT 0,
    membership_date TIMESTAMPTZ NOT NULL,
    card            JSONB,
    updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_CLIENT_ACCOUNT_NUMBER_INDEX: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS bank_accounts_client_account_number_key
    ON bank_accounts (client_code, account_number)
"#;

const CREATE_CLIENT_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS bank_accounts_client_code_idx
    ON bank_accounts (client_code)
"#;

/// Verify database connectivity
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create the account table and its indexes if they are missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in [
        CREATE_BANK_ACCOUNTS,
        CREATE_CLIENT_ACCOUNT_NUMBER_INDEX,
        CREATE_CLIENT_INDEX,
    ] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    tracing::info!("Schema ensured: bank_accounts");
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["bank_accounts"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
