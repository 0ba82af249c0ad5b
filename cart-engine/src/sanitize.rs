//! Line sanitizer
//!
//! One pure validation pass applied wherever a line collection is loaded
//! from a backing store. What counts as invalid:
//!
//! - blank ID, or an ID carrying the `"undefined"` placeholder (a sentinel
//!   left behind by older clients serializing a missing value)
//! - product/service XOR violated (neither or both populated)
//! - snapshot price missing, non-finite, or negative
//! - quantity below 1
//!
//! The caller decides what to do with the verdict: the guest store discards
//! the whole collection when anything is invalid, the remote store keeps
//! the valid remainder.

use shared::models::CartLine;

/// Placeholder that ends up inside IDs when a missing value was serialized
const UNDEFINED_SENTINEL: &str = "undefined";

/// Structural validity of a single line
pub fn is_valid_line(line: &CartLine) -> bool {
    if line.id.trim().is_empty() || line.id.contains(UNDEFINED_SENTINEL) {
        return false;
    }
    let Some(snapshot) = line.snapshot() else {
        return false; // XOR violated
    };
    match snapshot.unit_price {
        Some(price) if price.is_finite() && price >= 0.0 => {}
        _ => return false,
    }
    line.quantity >= 1
}

/// Split a loaded collection into valid lines and a discard count.
///
/// Pure; emits no logs so callers can report at the right severity for
/// their path.
pub fn sanitize_lines(lines: Vec<CartLine>) -> (Vec<CartLine>, usize) {
    let total = lines.len();
    let valid: Vec<CartLine> = lines.into_iter().filter(is_valid_line).collect();
    let discarded = total - valid.len();
    (valid, discarded)
}
