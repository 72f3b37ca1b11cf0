//! Domain Error Types
//!
//! Pure validation errors that don't depend on infrastructure.

use thiserror::Error;

/// Validation failures on account payloads.
///
/// These are raised before any store call is attempted, so a
/// `DomainError` never leaves a partially written record behind.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A required field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field was present but malformed
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Client type code not in the enumeration
    #[error("Unknown client type code: {0}")]
    UnknownClientType(i32),

    /// Account type code not in the enumeration
    #[error("Unknown account type code: {0}")]
    UnknownAccountType(i32),
}

impl DomainError {
    /// Create an invalid field error
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(field) | Self::InvalidField { field, .. } => Some(*field),
            Self::UnknownClientType(_) => Some("client_type"),
            Self::UnknownAccountType(_) => Some("account_type"),
        }
    }
}
