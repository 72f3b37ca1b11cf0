//! Operation result with a human-readable message.

use serde::{Deserialize, Serialize};

/// A persisted object bundled with a message describing what happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub obj: T,
    pub message: String,
}

impl<T> OperationResult<T> {
    pub fn new(obj: T, message: impl Into<String>) -> Self {
        Self {
            obj,
            message: message.into(),
        }
    }

    pub fn into_obj(self) -> T {
        self.obj
    }
}
