//! Service Errors
//!
//! Faults an `AccountService` operation can raise. Absence is not a
//! fault: lookups return `Option` instead.

use crate::domain::DomainError;
use crate::store::StoreError;

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by `AccountService`
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before any store call
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// Store collaborator failed; propagated unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Validation(_))
    }
}
