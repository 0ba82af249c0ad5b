//! Cart reconciliation store
//!
//! Maintains an authoritative, duplicate-free, valid list of cart lines,
//! exposes CRUD-style operations, and computes the aggregate monetary
//! total.
//!
//! # Backend selection
//!
//! The store holds exactly one [`LineStore`] at a time, chosen by
//! authentication state:
//!
//! - authenticated → [`RemoteLineStore`], scoped by owner
//! - guest → [`LocalLineStore`], single well-known key
//!
//! Switching backends on sign-in does NOT migrate guest lines; the
//! explicit [`CartStore::merge_guest_lines`] operation exists so that data
//! loss is a decision made at the call site, never an accident.
//!
//! # Mutation flow
//!
//! ```text
//! operation(args)
//!     ├─ 1. Validate input
//!     ├─ 2. Build candidate line(s)
//!     ├─ 3. Persist to the active backend (await round-trip)
//!     ├─ 4. Commit to in-memory list (only on success)
//!     ├─ 5. Broadcast CartEvent
//!     └─ 6. Return outcome value
//! ```
//!
//! Persistence failures leave the in-memory list untouched — mutations are
//! all-or-nothing from the caller's perspective.

mod backend;
mod error;
mod event;
mod local;
mod remote;

#[cfg(test)]
mod tests;

pub use backend::{LineStore, StoreError, StoreResult};
pub use error::{CartError, CartResult};
pub use event::CartEvent;
pub use local::LocalLineStore;
pub use remote::RemoteLineStore;

use crate::money;
use crate::sanitize::sanitize_lines;
use parking_lot::RwLock;
use shared::models::{AddItemRequest, CartLine, ItemSnapshot, LineKind};
use shared::util::now_millis;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Result of a successful add, for the caller's notification surface
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub line_id: String,
    /// Item name, for "added X to cart" notices
    pub name: String,
    /// Quantity on the line after the add
    pub quantity: i32,
    /// True when the add merged into an existing line
    pub merged: bool,
}

/// The cart reconciliation store
pub struct CartStore {
    backend: Arc<dyn LineStore>,
    /// Authenticated owner; `None` for guest sessions
    owner_id: Option<String>,
    /// In-memory view, owned exclusively by the store
    lines: RwLock<Vec<CartLine>>,
    event_tx: broadcast::Sender<CartEvent>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("owner_id", &self.owner_id)
            .field("line_count", &self.lines.read().len())
            .finish()
    }
}

impl CartStore {
    /// Create a store over the given backend without loading
    pub fn new(backend: Arc<dyn LineStore>, owner_id: Option<String>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            owner_id,
            lines: RwLock::new(Vec::new()),
            event_tx,
        }
    }

    /// Create a store and perform the initial load from its backend
    pub async fn open(backend: Arc<dyn LineStore>, owner_id: Option<String>) -> CartResult<Self> {
        let store = Self::new(backend, owner_id);
        store.refresh().await?;
        Ok(store)
    }

    /// Re-select the backing store on an authentication-state change and
    /// reload. Existing guest lines are NOT migrated; call
    /// [`Self::merge_guest_lines`] explicitly if the product wants them.
    pub async fn switch_backend(
        &mut self,
        backend: Arc<dyn LineStore>,
        owner_id: Option<String>,
    ) -> CartResult<()> {
        self.backend = backend;
        self.owner_id = owner_id;
        *self.lines.get_mut() = Vec::new();
        self.refresh().await
    }

    /// Subscribe to committed-mutation events
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.event_tx.subscribe()
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn is_guest(&self) -> bool {
        self.owner_id.is_none()
    }

    /// Read-only view of the current lines
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines.read().clone()
    }

    /// Sum of `quantity × unit_price` over the current lines, skipping any
    /// line whose price cannot be resolved. Never fails.
    pub fn compute_total(&self) -> f64 {
        money::compute_total(&self.lines.read())
    }

    /// Add an item, merging into an existing line for the same catalog
    /// item instead of duplicating it
    pub async fn add_item(&self, request: AddItemRequest) -> CartResult<AddOutcome> {
        let price = money::validate_add_request(&request)?;
        let quantity = request.requested_quantity();
        let kind = request.kind;
        let entry = request.entry;

        let existing = {
            let lines = self.lines.read();
            lines.iter().find(|l| l.matches(kind, &entry.id)).cloned()
        };

        if let Some(mut line) = existing {
            line.quantity += quantity;
            line.updated_at = now_millis();
            self.backend.upsert(&line).await?;
            self.commit_line(&line);
            tracing::debug!(line_id = %line.id, quantity = line.quantity, "Merged add into existing line");
            self.emit(CartEvent::ItemAdded {
                line_id: line.id.clone(),
                name: entry.name.clone(),
                quantity: line.quantity,
                merged: true,
            });
            return Ok(AddOutcome {
                line_id: line.id,
                name: entry.name,
                quantity: line.quantity,
                merged: true,
            });
        }

        let now = now_millis();
        let snapshot = ItemSnapshot {
            ref_id: entry.id.clone(),
            name: entry.name.clone(),
            unit_price: Some(price),
            category: entry.category.clone(),
            image: entry.image.clone(),
        };
        let (product, service) = match kind {
            LineKind::Product => (Some(snapshot), None),
            LineKind::Service => (None, Some(snapshot)),
        };
        let mut line = CartLine {
            id: String::new(),
            product,
            service,
            quantity,
            owner_id: self.owner_id.clone(),
            created_at: now,
            updated_at: now,
        };

        line.id = self.backend.upsert(&line).await?;
        self.lines.write().push(line.clone());
        tracing::debug!(line_id = %line.id, name = %entry.name, "Added new cart line");
        self.emit(CartEvent::ItemAdded {
            line_id: line.id.clone(),
            name: entry.name.clone(),
            quantity,
            merged: false,
        });
        Ok(AddOutcome {
            line_id: line.id,
            name: entry.name,
            quantity,
            merged: false,
        })
    }

    /// Remove a line by ID. Guest path: idempotent. Remote path:
    /// persistence failures surface as [`CartError::Persistence`].
    pub async fn remove_item(&self, line_id: &str) -> CartResult<()> {
        self.backend.delete(line_id).await?;
        self.lines.write().retain(|l| l.id != line_id);
        self.emit(CartEvent::ItemRemoved {
            line_id: line_id.to_string(),
        });
        Ok(())
    }

    /// Overwrite a line's quantity; anything below 1 removes the line
    pub async fn update_quantity(&self, line_id: &str, quantity: i32) -> CartResult<()> {
        if quantity < 1 {
            return self.remove_item(line_id).await;
        }
        if quantity > money::MAX_QUANTITY {
            return Err(CartError::InvalidItem(format!(
                "quantity exceeds maximum allowed ({}), got {}",
                money::MAX_QUANTITY,
                quantity
            )));
        }

        let mut line = {
            let lines = self.lines.read();
            lines
                .iter()
                .find(|l| l.id == line_id)
                .cloned()
                .ok_or_else(|| CartError::LineNotFound(line_id.to_string()))?
        };
        line.quantity = quantity;
        line.updated_at = now_millis();

        self.backend.upsert(&line).await?;
        self.commit_line(&line);
        self.emit(CartEvent::QuantityChanged {
            line_id: line_id.to_string(),
            quantity,
        });
        Ok(())
    }

    /// Empty the cart and the active backend
    pub async fn clear(&self) -> CartResult<()> {
        self.backend.delete_all().await?;
        self.lines.write().clear();
        self.emit(CartEvent::Cleared);
        Ok(())
    }

    /// Re-read from the active backend and replace the in-memory view
    /// wholesale — no optimistic-update drift is assumed safe
    pub async fn refresh(&self) -> CartResult<()> {
        let loaded = self.backend.load().await?;
        let line_count = loaded.len();
        *self.lines.write() = loaded;
        self.emit(CartEvent::Refreshed { line_count });
        Ok(())
    }

    /// Explicitly migrate guest lines into an authenticated cart, applying
    /// the normal merge rule per line. Returns the number of lines merged.
    ///
    /// Invalid guest lines are skipped (they were corruption candidates in
    /// the local store anyway).
    pub async fn merge_guest_lines(&self, guest_lines: Vec<CartLine>) -> CartResult<usize> {
        let owner = self.owner_id.clone().ok_or_else(|| {
            CartError::InvalidOperation(
                "guest lines can only be merged into an authenticated cart".to_string(),
            )
        })?;

        let (valid, discarded) = sanitize_lines(guest_lines);
        if discarded > 0 {
            tracing::warn!(discarded, "Skipped invalid guest lines during merge");
        }

        let mut merged = 0usize;
        for guest in valid {
            let Some(kind) = guest.kind() else { continue };
            let Some(ref_id) = guest.ref_id().map(str::to_string) else {
                continue;
            };

            let existing = {
                let lines = self.lines.read();
                lines.iter().find(|l| l.matches(kind, &ref_id)).cloned()
            };

            if let Some(mut line) = existing {
                line.quantity += guest.quantity;
                line.updated_at = now_millis();
                self.backend.upsert(&line).await?;
                self.commit_line(&line);
            } else {
                let now = now_millis();
                let mut line = guest.clone();
                line.id = String::new();
                line.owner_id = Some(owner.clone());
                line.created_at = now;
                line.updated_at = now;
                line.id = self.backend.upsert(&line).await?;
                self.lines.write().push(line);
            }
            merged += 1;
        }

        tracing::info!(owner = %owner, merged, "Merged guest lines into remote cart");
        self.emit(CartEvent::GuestLinesMerged { merged });
        Ok(merged)
    }

    /// Replace the in-memory copy of a line after its persistence succeeded
    fn commit_line(&self, line: &CartLine) {
        let mut lines = self.lines.write();
        if let Some(slot) = lines.iter_mut().find(|l| l.id == line.id) {
            *slot = line.clone();
        }
    }

    fn emit(&self, event: CartEvent) {
        // No subscribers is fine; the event stream is optional
        let _ = self.event_tx.send(event);
    }
}
