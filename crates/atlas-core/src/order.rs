//! # Order Aggregate Rules
//!
//! Pure line-item arithmetic for sale orders. The lifecycle service in
//! atlas-orders is the only caller; nothing else mutates an order's lines.
//!
//! ## Two distinct merge semantics
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │  ADD (append_line)                  REVISE (find_line_mut)         │
//! │                                                                    │
//! │  lines: [{A,2}]                     lines: [{A,2},{B,1}]           │
//! │  add {A,3}                          revise {A,5}                   │
//! │       │                                  │                         │
//! │       ▼                                  ▼                         │
//! │  [{A,2},{A,3}]   ← duplicate        [{A,5},{B,1}]  ← in place      │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Adding an already-present product appends a second entry; revising finds
//! the first entry for the product and overwrites its quantity. Both
//! behaviors are load-bearing: unifying them would change observable order
//! documents.

use crate::money::Money;
use crate::types::LineItem;

/// Cost of `quantity` units at `unit_price`.
///
/// `quantity` is signed: revision deltas flow through here with their sign.
#[inline]
pub fn line_cost(unit_price: Money, quantity: i64) -> Money {
    unit_price.times(quantity)
}

/// Appends a line to the order's line items.
///
/// Never merges with an existing entry for the same product; see the module
/// docs for why duplicates are kept.
pub fn append_line(lines: &mut Vec<LineItem>, product_id: impl Into<String>, quantity: i64) {
    lines.push(LineItem {
        product_id: product_id.into(),
        quantity,
    });
}

/// Finds the first line for `product_id`, for in-place quantity revision.
///
/// Returns `None` when the order has no line for the product; revision
/// requests for unknown products are skipped by the caller.
pub fn find_line_mut<'a>(lines: &'a mut [LineItem], product_id: &str) -> Option<&'a mut LineItem> {
    lines.iter_mut().find(|line| line.product_id == product_id)
}

/// Recomputes an order total from its lines and a price lookup.
///
/// Used by tests to assert the total/lines invariant; the service keeps the
/// running total incrementally and never calls this on the hot path (prices
/// may have changed since the lines were written).
pub fn total_at_current_prices<F>(lines: &[LineItem], price_of: F) -> Option<Money>
where
    F: Fn(&str) -> Option<Money>,
{
    let mut total = Money::zero();
    for line in lines {
        total += line_cost(price_of(&line.product_id)?, line.quantity);
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_duplicates() {
        let mut lines = vec![LineItem {
            product_id: "A".into(),
            quantity: 2,
        }];

        append_line(&mut lines, "A", 3);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].quantity, 3);
    }

    #[test]
    fn test_revise_overwrites_first_match() {
        let mut lines = vec![
            LineItem {
                product_id: "A".into(),
                quantity: 2,
            },
            LineItem {
                product_id: "B".into(),
                quantity: 1,
            },
            LineItem {
                product_id: "A".into(),
                quantity: 4,
            },
        ];

        let line = find_line_mut(&mut lines, "A").unwrap();
        line.quantity = 5;

        // Only the first A entry changes.
        assert_eq!(lines[0].quantity, 5);
        assert_eq!(lines[2].quantity, 4);
    }

    #[test]
    fn test_find_line_missing() {
        let mut lines: Vec<LineItem> = Vec::new();
        assert!(find_line_mut(&mut lines, "A").is_none());
    }

    #[test]
    fn test_line_cost_signed() {
        let price = Money::from_cents(1000);
        assert_eq!(line_cost(price, 3).cents(), 3000);
        assert_eq!(line_cost(price, -2).cents(), -2000);
    }

    #[test]
    fn test_total_at_current_prices() {
        let lines = vec![
            LineItem {
                product_id: "A".into(),
                quantity: 3,
            },
            LineItem {
                product_id: "B".into(),
                quantity: 1,
            },
        ];

        let total = total_at_current_prices(&lines, |id| match id {
            "A" => Some(Money::from_cents(1000)),
            "B" => Some(Money::from_cents(500)),
            _ => None,
        });
        assert_eq!(total.unwrap().cents(), 3500);

        // Unknown product makes the invariant unverifiable.
        let missing = total_at_current_prices(&lines, |_| None);
        assert!(missing.is_none());
    }
}
