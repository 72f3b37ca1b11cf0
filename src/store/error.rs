//! Account Store Errors
//!
//! Error types for store operations.

use uuid::Uuid;

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in an account store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness rule violated, e.g. a duplicate (client, account number)
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// A stored record could not be mapped back to an account
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}

impl StoreError {
    /// Check if this error is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }

    pub fn duplicate_account_number(client_code: &str, account_number: &str) -> Self {
        StoreError::Conflict(format!(
            "account number {} already exists for client {}",
            account_number, client_code
        ))
    }
}
