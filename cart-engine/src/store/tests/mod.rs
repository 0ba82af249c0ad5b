//! CartStore test suite
//!
//! Split by concern:
//! - `test_core`: happy-path CRUD, merging, totals
//! - `test_boundary`: validation failures, corruption, persistence faults
//! - `test_flows`: backend switching, guest merge, event stream


pub use super::backend::{LineStore, StoreError, StoreResult};
pub use super::{CartStore, LocalLineStore};
pub use async_trait::async_trait;
pub use parking_lot::Mutex;
pub use shared::models::{AddItemRequest, CartLine, CatalogEntry, ItemSnapshot, LineKind};
pub use std::sync::Arc;
pub use std::sync::atomic::{AtomicU64, Ordering};

// ========== Fixtures ==========

pub fn entry(id: &str, name: &str, price: Option<f64>) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category: "General".to_string(),
        image: None,
    }
}

pub fn add_product(id: &str, name: &str, price: f64) -> AddItemRequest {
    AddItemRequest::new(LineKind::Product, entry(id, name, Some(price)))
}

pub fn add_service(id: &str, name: &str, price: f64) -> AddItemRequest {
    AddItemRequest::new(LineKind::Service, entry(id, name, Some(price)))
}

pub fn raw_line(id: &str, ref_id: &str, price: Option<f64>, quantity: i32) -> CartLine {
    CartLine {
        id: id.to_string(),
        product: Some(ItemSnapshot {
            ref_id: ref_id.to_string(),
            name: format!("Item {ref_id}"),
            unit_price: price,
            category: "General".to_string(),
            image: None,
        }),
        service: None,
        quantity,
        owner_id: None,
        created_at: 0,
        updated_at: 0,
    }
}

/// Guest store over fresh in-memory redb
pub async fn guest_store() -> CartStore {
    let backend = Arc::new(LocalLineStore::open_in_memory().unwrap());
    CartStore::open(backend, None).await.unwrap()
}

// ========== Test doubles ==========

/// In-memory backend that counts calls, for verifying persistence ordering
pub struct RecordingStore {
    lines: Mutex<Vec<CartLine>>,
    next_id: AtomicU64,
    pub upsert_calls: AtomicU64,
    pub delete_calls: AtomicU64,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            upsert_calls: AtomicU64::new(0),
            delete_calls: AtomicU64::new(0),
        }
    }

    pub fn seeded(lines: Vec<CartLine>) -> Self {
        let store = Self::new();
        *store.lines.lock() = lines;
        store
    }

    pub fn stored(&self) -> Vec<CartLine> {
        self.lines.lock().clone()
    }
}

#[async_trait]
impl LineStore for RecordingStore {
    async fn load(&self) -> StoreResult<Vec<CartLine>> {
        Ok(self.lines.lock().clone())
    }

    async fn save_all(&self, lines: &[CartLine]) -> StoreResult<()> {
        *self.lines.lock() = lines.to_vec();
        Ok(())
    }

    async fn upsert(&self, line: &CartLine) -> StoreResult<String> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        let mut line = line.clone();
        if line.id.is_empty() {
            line.id = format!("rec-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        }
        let mut lines = self.lines.lock();
        match lines.iter_mut().find(|l| l.id == line.id) {
            Some(slot) => *slot = line.clone(),
            None => lines.push(line.clone()),
        }
        Ok(line.id)
    }

    async fn delete(&self, line_id: &str) -> StoreResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.lines.lock().retain(|l| l.id != line_id);
        Ok(())
    }

    async fn delete_all(&self) -> StoreResult<()> {
        self.lines.lock().clear();
        Ok(())
    }
}

/// Backend whose mutations always fail, for all-or-nothing checks
pub struct FailingStore {
    loaded: Vec<CartLine>,
}

impl FailingStore {
    pub fn new(loaded: Vec<CartLine>) -> Self {
        Self { loaded }
    }

    fn fail<T>() -> StoreResult<T> {
        Err(StoreError::Backend("simulated outage".to_string()))
    }
}

#[async_trait]
impl LineStore for FailingStore {
    async fn load(&self) -> StoreResult<Vec<CartLine>> {
        Ok(self.loaded.clone())
    }

    async fn save_all(&self, _lines: &[CartLine]) -> StoreResult<()> {
        Self::fail()
    }

    async fn upsert(&self, _line: &CartLine) -> StoreResult<String> {
        Self::fail()
    }

    async fn delete(&self, _line_id: &str) -> StoreResult<()> {
        Self::fail()
    }

    async fn delete_all(&self) -> StoreResult<()> {
        Self::fail()
    }
}
