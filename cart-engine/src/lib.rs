//! Cart engine
//!
//! The cart reconciliation store for the client portal: owns the list of
//! line items a visitor intends to purchase, persists it in one of two
//! backing stores selected by authentication state, and exposes mutation
//! and total-computation operations.
//!
//! - Authenticated sessions write to a per-owner remote store (SurrealDB).
//! - Guest sessions write to a local single-key snapshot store (redb).
//!
//! The store itself never renders user notifications; operations return
//! outcome values and broadcast [`store::CartEvent`]s for observers.

pub mod config;
pub mod logger;
pub mod money;
pub mod sanitize;
pub mod store;

pub use config::Config;
pub use store::{
    AddOutcome, CartError, CartEvent, CartResult, CartStore, LineStore, LocalLineStore,
    RemoteLineStore, StoreError, StoreResult,
};
