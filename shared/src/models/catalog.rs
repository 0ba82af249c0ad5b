//! Catalog payload and add-to-cart request

use super::cart_line::LineKind;
use serde::{Deserialize, Serialize};

/// Read-only catalog payload consumed at add time only.
///
/// The store never looks an entry up again after the add; everything it
/// needs is copied into the line snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    /// Catalog price; an explicit request override takes precedence
    pub price: Option<f64>,
    pub category: String,
    pub image: Option<String>,
}

/// Add-to-cart request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemRequest {
    pub kind: LineKind,
    pub entry: CatalogEntry,
    /// Defaults to 1 when absent
    pub quantity: Option<i32>,
    /// Overrides the catalog price when present
    pub price_override: Option<f64>,
}

impl AddItemRequest {
    pub fn new(kind: LineKind, entry: CatalogEntry) -> Self {
        Self {
            kind,
            entry,
            quantity: None,
            price_override: None,
        }
    }

    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price_override = Some(price);
        self
    }

    /// Requested quantity (defaulted)
    pub fn requested_quantity(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }

    /// Resolved unit price: explicit override, else catalog payload price
    pub fn resolved_price(&self) -> Option<f64> {
        self.price_override.or(self.entry.price)
    }
}
