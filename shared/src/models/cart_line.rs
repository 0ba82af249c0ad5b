//! Cart Line Model

use serde::{Deserialize, Serialize};

/// What a cart line refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Product,
    Service,
}

/// Denormalized catalog snapshot captured at add time.
///
/// Catalog price changes after the line is added never retroactively
/// change the line — the snapshot is the authority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Catalog reference ID (used for duplicate merging, not live lookup)
    pub ref_id: String,
    pub name: String,
    /// Unit price at add time. `None` means the stored record is damaged;
    /// such lines are excluded from totals and flagged by the sanitizer.
    #[serde(default)]
    pub unit_price: Option<f64>,
    pub category: String,
    pub image: Option<String>,
}

/// One purchasable entry in a cart
///
/// Exactly one of `product` / `service` is populated; a line with neither
/// (or both) is structurally invalid and dropped by the sanitizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    #[serde(default)]
    pub product: Option<ItemSnapshot>,
    #[serde(default)]
    pub service: Option<ItemSnapshot>,
    /// Always >= 1 for valid lines; a line is removed, never left at 0
    pub quantity: i32,
    /// Authenticated owner; absent for guest lines
    #[serde(default)]
    pub owner_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CartLine {
    /// Line kind, when the product/service XOR invariant holds
    pub fn kind(&self) -> Option<LineKind> {
        match (&self.product, &self.service) {
            (Some(_), None) => Some(LineKind::Product),
            (None, Some(_)) => Some(LineKind::Service),
            _ => None,
        }
    }

    /// The populated snapshot, when the XOR invariant holds
    pub fn snapshot(&self) -> Option<&ItemSnapshot> {
        match (&self.product, &self.service) {
            (Some(p), None) => Some(p),
            (None, Some(s)) => Some(s),
            _ => None,
        }
    }

    /// Catalog reference ID of the populated snapshot
    pub fn ref_id(&self) -> Option<&str> {
        self.snapshot().map(|s| s.ref_id.as_str())
    }

    /// Whether this line and a `(kind, ref_id)` pair refer to the same
    /// catalog item (the duplicate-merge key)
    pub fn matches(&self, kind: LineKind, ref_id: &str) -> bool {
        self.kind() == Some(kind) && self.ref_id() == Some(ref_id)
    }
}
