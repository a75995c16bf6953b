//! # Pricing Engine
//!
//! Turns verified bill lines into totals.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal    = Σ unit_price × quantity           (exact, integer)      │
//! │  tax         = round_half_up(subtotal × rate)    (rounded ONCE)        │
//! │  grand_total = subtotal + tax − discount         (exact, integer)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices fed into this module must come from the catalog, never from the
//! client. The order finalizer is responsible for that lookup.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderDraft, OrderLine, PaymentMode, TaxRate};
use crate::validation::{validate_cart_size, validate_discount};

/// Monetary summary of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BillTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub grand_total: Money,
}

/// Computes subtotal, tax and grand total for `(unit_price, quantity)` pairs.
///
/// Only overflow is reported as an error here. Whether the grand total is
/// acceptable is decided by [`price_order`].
///
/// ```rust
/// use tabletop_core::money::Money;
/// use tabletop_core::pricing::compute_totals;
/// use tabletop_core::types::TaxRate;
///
/// let lines = [(Money::from_minor(350), 2)];
/// let totals = compute_totals(&lines, Money::from_minor(50), TaxRate::from_bps(500)).unwrap();
/// assert_eq!(totals.grand_total.minor(), 685);
/// ```
pub fn compute_totals(
    lines: &[(Money, i64)],
    discount: Money,
    rate: TaxRate,
) -> CoreResult<BillTotals> {
    let mut subtotal = Money::zero();
    for (unit_price, quantity) in lines {
        let line_total = unit_price
            .checked_mul_quantity(*quantity)
            .ok_or(CoreError::AmountOverflow("line total"))?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or(CoreError::AmountOverflow("subtotal"))?;
    }

    let tax = subtotal
        .calculate_tax(rate)
        .ok_or(CoreError::AmountOverflow("tax"))?;

    let grand_total = subtotal
        .checked_add(tax)
        .and_then(|gross| gross.checked_sub(discount))
        .ok_or(CoreError::AmountOverflow("grand total"))?;

    Ok(BillTotals {
        subtotal,
        tax,
        discount,
        grand_total,
    })
}

/// Prices a set of catalog-verified lines into an unnumbered order.
///
/// Rejects an empty bill, an oversized bill, a negative discount and a
/// discount larger than subtotal plus tax.
pub fn price_order(
    lines: Vec<OrderLine>,
    discount: Money,
    payment_mode: PaymentMode,
    rate: TaxRate,
) -> CoreResult<OrderDraft> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    validate_cart_size(lines.len())?;
    validate_discount(discount)?;

    let pairs: Vec<(Money, i64)> = lines.iter().map(|l| (l.unit_price, l.quantity)).collect();
    let totals = compute_totals(&pairs, discount, rate)?;

    if totals.grand_total.is_negative() {
        return Err(CoreError::DiscountExceedsTotal {
            discount: discount.minor(),
            total: (totals.subtotal + totals.tax).minor(),
        });
    }

    Ok(OrderDraft {
        lines,
        subtotal: totals.subtotal,
        tax: totals.tax,
        tax_rate: rate,
        discount: totals.discount,
        grand_total: totals.grand_total,
        payment_mode,
    })
}
