//! PostgreSQL account store.
//!
//! Accounts live in the `bank_accounts` table (see `crate::db`). The card
//! is stored as JSONB so it is always read and written whole.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{Account, AccountType, Card, ClientType};

use super::{AccountFilter, AccountStore, AccountStream, StoreError, StoreResult};

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const ACCOUNT_COLUMNS: &str = "id, account_number, client_code, client_type, account_type, \
                               balance, membership_date, card";

/// Raw `bank_accounts` row
type AccountRow = (
    Uuid,
    String,
    String,
    i16,
    i16,
    Decimal,
    DateTime<Utc>,
    Option<Json<Card>>,
);

/// PostgreSQL implementation of `AccountStore`
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Create a new PgAccountStore with a database pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn stream(&self, filter: AccountFilter) -> AccountStream {
        let pool = self.pool.clone();

        stream::once(async move { fetch_filtered(&pool, &filter).await })
            .map_ok(|rows| stream::iter(rows.into_iter().map(row_to_account)))
            .try_flatten()
            .boxed()
    }
}

/// Run a filtered SELECT, binding only the fields that are set
async fn fetch_filtered(pool: &PgPool, filter: &AccountFilter) -> StoreResult<Vec<AccountRow>> {
    let mut query: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM bank_accounts WHERE TRUE", ACCOUNT_COLUMNS));

    if let Some(client_code) = &filter.client_code {
        query.push(" AND client_code = ").push_bind(client_code.clone());
    }
    if let Some(client_type) = filter.client_type {
        query.push(" AND client_type = ").push_bind(client_type.code() as i16);
    }
    if let Some(account_type) = filter.account_type {
        query.push(" AND account_type = ").push_bind(account_type.code() as i16);
    }
    if let Some(account_number) = &filter.account_number {
        query.push(" AND account_number = ").push_bind(account_number.clone());
    }

    let rows = query.build_query_as::<AccountRow>().fetch_all(pool).await?;

    tracing::debug!(rows = rows.len(), filter = ?filter, "Fetched bank accounts");

    Ok(rows)
}

fn row_to_account(row: AccountRow) -> StoreResult<Account> {
    let (id, account_number, client_code, client_type, account_type, balance, membership_date, card) =
        row;

    let corrupt = |e: crate::domain::DomainError| StoreError::Corrupt {
        id,
        reason: e.to_string(),
    };
    let client_type = ClientType::from_code(client_type.into()).map_err(corrupt)?;
    let account_type = AccountType::from_code(account_type.into()).map_err(corrupt)?;

    Ok(Account::from_parts(
        id,
        account_number,
        client_code,
        client_type,
        account_type,
        balance,
        membership_date,
        card.map(|Json(card)| card),
    ))
}

fn map_write_error(e: sqlx::Error, account: &Account) -> StoreError {
    let is_unique_violation = e
        .as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION);

    if is_unique_violation {
        StoreError::duplicate_account_number(account.client_code(), account.account_number())
    } else {
        StoreError::Database(e)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        let sql = format!("SELECT {} FROM bank_accounts WHERE id = $1", ACCOUNT_COLUMNS);

        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(row_to_account)
            .transpose()
    }

    fn get_all(&self) -> AccountStream {
        self.stream(AccountFilter::default())
    }

    fn query(&self, filter: AccountFilter) -> AccountStream {
        self.stream(filter)
    }

    async fn put(&self, account: Account) -> StoreResult<Account> {
        // Identity columns and membership_date are never updated on conflict
        let sql = format!(
            r#"
            INSERT INTO bank_accounts ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                client_type = EXCLUDED.client_type,
                account_type = EXCLUDED.account_type,
                balance = EXCLUDED.balance,
                card = EXCLUDED.card,
                updated_at = NOW()
            RETURNING {columns}
            "#,
            columns = ACCOUNT_COLUMNS
        );

        let row = sqlx::query_as::<_, AccountRow>(&sql)
            .bind(account.id())
            .bind(account.account_number())
            .bind(account.client_code())
            .bind(account.client_type().code() as i16)
            .bind(account.account_type().code() as i16)
            .bind(account.balance())
            .bind(account.membership_date())
            .bind(account.card().cloned().map(Json))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_error(e, &account))?;

        row_to_account(row)
    }

    async fn delete(&self, account: &Account) -> StoreResult<()> {
        sqlx::query("DELETE FROM bank_accounts WHERE id = $1")
            .bind(account.id())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
