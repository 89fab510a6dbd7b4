use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} with ID {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    Conflict(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
}

impl StoreError {
    pub(crate) fn missing_fields(fields: &[&str]) -> Self {
        Self::Validation(vec![format!(
            "Missing required fields: {}",
            fields.join(", ")
        )])
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
