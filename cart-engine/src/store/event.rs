//! Cart event broadcast
//!
//! The store emits one event per committed mutation. Consumers (a
//! notification surface, analytics, a sync worker) subscribe and decide how
//! to present them — the store itself never renders notices.

use serde::Serialize;

/// One committed cart mutation
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartEvent {
    ItemAdded {
        line_id: String,
        name: String,
        quantity: i32,
        /// True when the add merged into an existing line
        merged: bool,
    },
    ItemRemoved {
        line_id: String,
    },
    QuantityChanged {
        line_id: String,
        quantity: i32,
    },
    Cleared,
    Refreshed {
        line_count: usize,
    },
    GuestLinesMerged {
        merged: usize,
    },
}
