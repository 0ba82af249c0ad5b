//! Backing-store contract
//!
//! Both cart backends — the guest-local snapshot store and the per-owner
//! remote store — implement [`LineStore`]. The reconciliation store depends
//! only on this trait; which implementation is active is decided by
//! authentication state at construction/switch time.

use async_trait::async_trait;
use shared::models::CartLine;
use thiserror::Error;

/// Backing-store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Remote error: {0}")]
    Remote(#[from] surrealdb::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for backing-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Contract both cart backends fulfil.
///
/// Every method awaits its own persistence round-trip to completion; there
/// is no retry logic and no overlapping write per mutation.
#[async_trait]
pub trait LineStore: Send + Sync {
    /// Read the full line collection, already sanitized per the backend's
    /// corruption policy
    async fn load(&self) -> StoreResult<Vec<CartLine>>;

    /// Replace the stored collection wholesale
    async fn save_all(&self, lines: &[CartLine]) -> StoreResult<()>;

    /// Insert or update one line. Assigns and returns the definitive line
    /// ID when the incoming line carries none.
    async fn upsert(&self, line: &CartLine) -> StoreResult<String>;

    /// Remove one line by ID
    async fn delete(&self, line_id: &str) -> StoreResult<()>;

    /// Remove every line this store is scoped to
    async fn delete_all(&self) -> StoreResult<()>;
}
