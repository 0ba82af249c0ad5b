use super::backend::StoreError;
use thiserror::Error;

/// Store-boundary errors surfaced to the caller.
///
/// Persistence failures are converted here and never propagate as panics
/// into the view layer; corruption found at guest-store load time is not an
/// error at all (handled by discard inside the backend).
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type CartResult<T> = Result<T, CartError>;
