use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the user store.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// The call exceeded its deadline and was abandoned.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::NotFound)
    }
}
