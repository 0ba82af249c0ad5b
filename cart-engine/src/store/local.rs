//! redb-backed guest cart store
//!
//! Stands in for browser local storage: one table, one well-known key
//! (`"cart"`), value = serialized JSON array of [`CartLine`] records. No
//! versioning or migration scheme.
//!
//! # Corruption policy
//!
//! Executed once per load. If the stored JSON fails to parse, or ANY line
//! in it is structurally invalid, the ENTIRE collection is treated as
//! suspect: the key is erased and the load yields an empty cart. Partial
//! repair is deliberately avoided so corrupted state can never propagate
//! into total computation or duplicate merging. Not surfaced as an error.

use super::backend::{LineStore, StoreResult};
use crate::sanitize::sanitize_lines;
use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use shared::models::CartLine;
use shared::util::guest_line_id;
use std::path::Path;
use std::sync::Arc;

/// Single-key table holding the serialized guest cart
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("guest_cart");

/// The well-known key the whole collection lives under
const CART_KEY: &str = "cart";

/// Guest cart storage backed by redb
#[derive(Clone)]
pub struct LocalLineStore {
    db: Arc<Database>,
}

impl LocalLineStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::create(path)?;

        // Create the table so fresh databases can serve reads
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Read and sanitize the stored collection, applying the all-or-nothing
    /// corruption discard
    fn read_stored(&self) -> StoreResult<Vec<CartLine>> {
        let raw = {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(CART_TABLE)?;
            match table.get(CART_KEY)? {
                Some(value) => value.value().to_vec(),
                None => return Ok(Vec::new()),
            }
        };

        let parsed: Vec<CartLine> = match serde_json::from_slice(&raw) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "Guest cart failed to parse, discarding stored collection");
                self.erase()?;
                return Ok(Vec::new());
            }
        };

        let count = parsed.len();
        let (valid, discarded) = sanitize_lines(parsed);
        if discarded > 0 {
            tracing::warn!(
                discarded,
                total = count,
                "Guest cart contains invalid lines, discarding stored collection"
            );
            self.erase()?;
            return Ok(Vec::new());
        }

        Ok(valid)
    }

    /// Write the full collection snapshot under the well-known key
    fn write_stored(&self, lines: &[CartLine]) -> StoreResult<()> {
        let value = serde_json::to_vec(lines)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Erase the stored key entirely
    fn erase(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CART_TABLE)?;
            table.remove(CART_KEY)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[async_trait]
impl LineStore for LocalLineStore {
    async fn load(&self) -> StoreResult<Vec<CartLine>> {
        self.read_stored()
    }

    async fn save_all(&self, lines: &[CartLine]) -> StoreResult<()> {
        self.write_stored(lines)
    }

    async fn upsert(&self, line: &CartLine) -> StoreResult<String> {
        let mut lines = self.read_stored()?;
        let mut line = line.clone();
        if line.id.is_empty() {
            line.id = guest_line_id();
        }
        match lines.iter_mut().find(|l| l.id == line.id) {
            Some(slot) => *slot = line.clone(),
            None => lines.push(line.clone()),
        }
        self.write_stored(&lines)?;
        Ok(line.id)
    }

    /// Idempotent: removing a non-existent ID is a no-op
    async fn delete(&self, line_id: &str) -> StoreResult<()> {
        let mut lines = self.read_stored()?;
        lines.retain(|l| l.id != line_id);
        self.write_stored(&lines)
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.erase()
    }
}
