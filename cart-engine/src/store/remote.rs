//! SurrealDB-backed remote cart store
//!
//! Per-owner durable storage for authenticated sessions. Every query is
//! scoped by `owner_id`; line IDs are record keys assigned by the database
//! on create. Loads sanitize per-line (invalid records are skipped, valid
//! ones kept) — the all-or-nothing discard is a guest-path policy only.

use super::backend::{LineStore, StoreError, StoreResult};
use crate::sanitize::sanitize_lines;
use async_trait::async_trait;
use serde::Serialize;
use shared::models::{CartLine, ItemSnapshot};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "cart_line";

/// Row shape sent to the database (ID lives in the record key, not a field)
#[derive(Debug, Serialize)]
struct CartLineRow {
    product: Option<ItemSnapshot>,
    service: Option<ItemSnapshot>,
    quantity: i32,
    owner_id: String,
    created_at: i64,
    updated_at: i64,
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Remote cart storage scoped to one owner
#[derive(Clone)]
pub struct RemoteLineStore {
    base: BaseRepository,
    owner_id: String,
}

impl RemoteLineStore {
    pub fn new(db: Surreal<Db>, owner_id: impl Into<String>) -> Self {
        Self {
            base: BaseRepository::new(db),
            owner_id: owner_id.into(),
        }
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    /// Serialize a line for persistence, forcing the store's owner scope
    fn row(&self, line: &CartLine) -> CartLineRow {
        CartLineRow {
            product: line.product.clone(),
            service: line.service.clone(),
            quantity: line.quantity,
            owner_id: self.owner_id.clone(),
            created_at: line.created_at,
            updated_at: line.updated_at,
        }
    }

    fn parse_record_id(&self, line_id: &str) -> StoreResult<RecordId> {
        line_id
            .parse()
            .map_err(|_| StoreError::Backend(format!("Invalid line ID format: {}", line_id)))
    }
}

#[async_trait]
impl LineStore for RemoteLineStore {
    async fn load(&self) -> StoreResult<Vec<CartLine>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT <string>id AS id, product, service, quantity, owner_id, \
                 created_at, updated_at \
                 FROM cart_line WHERE owner_id = $owner ORDER BY created_at",
            )
            .bind(("owner", self.owner_id.clone()))
            .await?;
        let lines: Vec<CartLine> = result.take(0)?;

        let (valid, discarded) = sanitize_lines(lines);
        if discarded > 0 {
            tracing::warn!(
                owner = %self.owner_id,
                discarded,
                "Skipped invalid remote cart lines on load"
            );
        }
        Ok(valid)
    }

    async fn save_all(&self, lines: &[CartLine]) -> StoreResult<()> {
        self.delete_all().await?;
        for line in lines {
            self.upsert(&CartLine {
                id: String::new(),
                ..line.clone()
            })
            .await?;
        }
        Ok(())
    }

    async fn upsert(&self, line: &CartLine) -> StoreResult<String> {
        if line.id.is_empty() {
            let mut result = self
                .base
                .db()
                .query("CREATE cart_line CONTENT $data RETURN VALUE <string>id")
                .bind(("data", self.row(line)))
                .await?;
            let ids: Vec<String> = result.take(0)?;
            ids.into_iter().next().ok_or_else(|| {
                StoreError::Backend(format!("Failed to create line in {}", TABLE))
            })
        } else {
            let record_id = self.parse_record_id(&line.id)?;
            self.base
                .db()
                .query("UPDATE $thing MERGE $data WHERE owner_id = $owner")
                .bind(("thing", record_id))
                .bind(("data", self.row(line)))
                .bind(("owner", self.owner_id.clone()))
                .await?;
            Ok(line.id.clone())
        }
    }

    async fn delete(&self, line_id: &str) -> StoreResult<()> {
        let record_id = self.parse_record_id(line_id)?;
        self.base
            .db()
            .query("DELETE $thing WHERE owner_id = $owner")
            .bind(("thing", record_id))
            .bind(("owner", self.owner_id.clone()))
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.base
            .db()
            .query("DELETE cart_line WHERE owner_id = $owner")
            .bind(("owner", self.owner_id.clone()))
            .await?;
        Ok(())
    }
}
