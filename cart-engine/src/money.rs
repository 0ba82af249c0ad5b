//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary values are stored as `f64` and converted to `Decimal` for
//! arithmetic, then back to `f64` for storage/serialization. The cart total
//! never fails: lines whose snapshot price cannot be resolved to a finite
//! non-negative number are skipped (and flagged via tracing), not errored on.

use crate::store::CartError;
use rust_decimal::prelude::*;
use shared::models::{AddItemRequest, CartLine};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per item
pub const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
pub const MAX_QUANTITY: i32 = 9999;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), CartError> {
    if !value.is_finite() {
        return Err(CartError::InvalidItem(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate an add-to-cart request before processing.
///
/// Returns the resolved unit price (explicit override, else catalog price).
pub fn validate_add_request(request: &AddItemRequest) -> Result<f64, CartError> {
    if request.entry.id.trim().is_empty() {
        return Err(CartError::InvalidItem(
            "request carries no catalog identity".to_string(),
        ));
    }

    let price = request.resolved_price().ok_or_else(|| {
        CartError::InvalidItem(format!(
            "no resolvable price for '{}'",
            request.entry.name
        ))
    })?;
    require_finite(price, "price")?;
    if price < 0.0 {
        return Err(CartError::InvalidItem(format!(
            "price must be non-negative, got {}",
            price
        )));
    }
    if price > MAX_PRICE {
        return Err(CartError::InvalidItem(format!(
            "price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, price
        )));
    }

    let quantity = request.requested_quantity();
    if quantity < 1 {
        return Err(CartError::InvalidItem(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(CartError::InvalidItem(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }

    Ok(price)
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Resolve a line's snapshot price to a Decimal.
///
/// Returns `None` when the snapshot is missing, or the price is absent,
/// non-finite, or negative — such lines are excluded from totals.
pub fn resolved_unit_price(line: &CartLine) -> Option<Decimal> {
    let price = line.snapshot()?.unit_price?;
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    Decimal::from_f64(price)
}

/// Line total: `quantity × unit_price`, or `None` when unpriceable
pub fn line_total(line: &CartLine) -> Option<Decimal> {
    let unit_price = resolved_unit_price(line)?;
    let total = unit_price * Decimal::from(line.quantity);
    Some(total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
}

/// Sum line totals across a cart, skipping unpriceable lines.
///
/// Skipped lines are logged for observability; this function never fails.
pub fn compute_total(lines: &[CartLine]) -> f64 {
    let mut total = Decimal::ZERO;
    for line in lines {
        match line_total(line) {
            Some(amount) => total += amount,
            None => {
                tracing::warn!(line_id = %line.id, "Skipping unpriceable line in total computation");
            }
        }
    }
    to_f64(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{CatalogEntry, ItemSnapshot, LineKind};

    fn entry(id: &str, price: Option<f64>) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            name: "Widget".to_string(),
            price,
            category: "General".to_string(),
            image: None,
        }
    }

    fn line(id: &str, price: Option<f64>, quantity: i32) -> CartLine {
        CartLine {
            id: id.to_string(),
            product: Some(ItemSnapshot {
                ref_id: format!("ref-{id}"),
                name: "Widget".to_string(),
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

    #[test]
    fn test_to_decimal_precision() {
        // Classic floating point problem: 0.1 + 0.2 != 0.3
        let sum_f64 = 0.1_f64 + 0.2_f64;
        assert_ne!(sum_f64, 0.3);

        let sum_dec = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum_dec), 0.3);
    }

    #[test]
    fn test_accumulation_precision() {
        // 100 lines at 0.01 each must sum to exactly 1.00
        let lines: Vec<CartLine> = (0..100)
            .map(|i| line(&format!("l{i}"), Some(0.01), 1))
            .collect();
        assert_eq!(compute_total(&lines), 1.0);
    }

    #[test]
    fn test_compute_total_mixed_kinds() {
        // product A: 100.00 × 1, service B: 200.00 × 2 → 500.00
        let a = line("a", Some(100.0), 1);
        let mut b = line("b", Some(200.0), 2);
        b.service = b.product.take();
        assert_eq!(compute_total(&[a, b]), 500.0);
    }

    #[test]
    fn test_compute_total_skips_unpriceable() {
        let lines = vec![
            line("a", Some(10.0), 2),
            line("b", None, 1),
            line("c", Some(f64::NAN), 3),
            line("d", Some(-5.0), 1),
            line("e", Some(2.5), 2),
        ];
        // Only a (20.00) and e (5.00) count
        assert_eq!(compute_total(&lines), 25.0);
    }

    #[test]
    fn test_compute_total_empty_cart() {
        assert_eq!(compute_total(&[]), 0.0);
    }

    #[test]
    fn test_resolved_unit_price_rejects_infinity() {
        assert!(resolved_unit_price(&line("a", Some(f64::INFINITY), 1)).is_none());
        assert!(resolved_unit_price(&line("a", Some(f64::NEG_INFINITY), 1)).is_none());
    }

    #[test]
    fn test_validate_rejects_missing_price() {
        let request = AddItemRequest::new(LineKind::Product, entry("p1", None));
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_nan_override() {
        let request =
            AddItemRequest::new(LineKind::Product, entry("p1", Some(10.0))).with_price(f64::NAN);
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let request = AddItemRequest::new(LineKind::Product, entry("p1", Some(-1.0)));
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_validate_override_takes_precedence() {
        let request =
            AddItemRequest::new(LineKind::Product, entry("p1", Some(10.0))).with_price(7.5);
        assert_eq!(validate_add_request(&request).unwrap(), 7.5);
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_quantity() {
        let request =
            AddItemRequest::new(LineKind::Product, entry("p1", Some(10.0))).with_quantity(0);
        assert!(validate_add_request(&request).is_err());

        let request =
            AddItemRequest::new(LineKind::Product, entry("p1", Some(10.0))).with_quantity(-3);
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_blank_catalog_id() {
        let request = AddItemRequest::new(LineKind::Product, entry("  ", Some(10.0)));
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_validate_rejects_excessive_bounds() {
        let request =
            AddItemRequest::new(LineKind::Product, entry("p1", Some(MAX_PRICE + 1.0)));
        assert!(validate_add_request(&request).is_err());

        let request = AddItemRequest::new(LineKind::Product, entry("p1", Some(10.0)))
            .with_quantity(MAX_QUANTITY + 1);
        assert!(validate_add_request(&request).is_err());
    }

    #[test]
    fn test_line_total_rounds_half_up() {
        // 3 × 0.335 = 1.005 → 1.01
        let l = line("a", Some(0.335), 3);
        assert_eq!(to_f64(line_total(&l).unwrap()), 1.01);
    }
}
