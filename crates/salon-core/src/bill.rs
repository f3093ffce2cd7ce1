//! # Bill Aggregator
//!
//! Composes finalized line items into the payable bill.
//!
//! ## Computation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  subtotal            Σ effective_price × quantity                      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  membership discount subtotal × membership%          (rounded here)    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  taxable base        subtotal - membership discount                    │
//! │      │               (membership discount applies BEFORE tax)          │
//! │      ▼                                                                  │
//! │  GST                 taxable base × gst%             (rounded here)    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  grand total         taxable base + GST + manual adjustment            │
//! │      │               (clamped at ₹0; clamping is a warning flag)       │
//! │      ▼                                                                  │
//! │  change due          max(0, received - grand total)                    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  loyalty points      floor(grand total / accrual)                      │
//! │                      floor, never round: partial points are never      │
//! │                      granted                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::money::{compute_gst, Money, Percent};
use crate::types::BillLineItem;
use crate::validation::{validate_price_paise, validate_quantity};

// =============================================================================
// Bill Totals
// =============================================================================

/// Every computed component of a finalized bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillTotals {
    /// Sum of effective line prices × quantities.
    pub subtotal: Money,

    /// Membership discount taken off before tax.
    pub membership_discount: Money,

    /// Subtotal less membership discount; the base GST applies to.
    pub taxable_base: Money,

    /// GST on the taxable base.
    pub gst: Money,

    /// Final payable amount, never negative.
    pub grand_total: Money,

    /// Cash back to the customer, never negative.
    pub change_due: Money,

    /// Whole loyalty points earned on the grand total.
    pub loyalty_points_earned: i64,

    /// Set when the manual adjustment drove the raw total below zero and
    /// the grand total was clamped to ₹0. A warning, not an error: a
    /// refund adjustment larger than the bill is unusual but legitimate.
    pub negative_total_clamped: bool,
}

// =============================================================================
// Finalize
// =============================================================================

/// Computes the totals for a bill at checkout.
///
/// `manual_adjustment` may be negative (further discount) or positive
/// (surcharge, e.g. a tip). `loyalty_paise_per_point` is the tenant's
/// accrual rate (1000 = one point per ₹10).
///
/// ## Errors
/// - `Validation` for a malformed line item (negative price, zero quantity)
/// - `InvalidInput` for an empty bill, an out-of-range membership rate,
///   an out-of-range GST rate, or a non-positive accrual rate
/// - `InsufficientPayment` when `amount_received` does not cover the
///   grand total. The UI blocks this earlier, but the aggregator enforces
///   it as a hard invariant since it is also called from non-UI paths.
///
/// ## Example
/// ```rust
/// use salon_core::bill::finalize_bill;
/// use salon_core::money::{Money, Percent};
/// use salon_core::types::BillLineItem;
///
/// let items = vec![BillLineItem::new("svc-1", "Haircut", Money::from_paise(50000), "staff-1", 1)];
/// let totals = finalize_bill(
///     &items,
///     Percent::zero(),
///     Money::zero(),
///     Percent::from_bps(500),
///     Money::from_paise(60000),
///     1000,
/// )
/// .unwrap();
///
/// assert_eq!(totals.grand_total.paise(), 52500); // ₹500 + 5% GST
/// assert_eq!(totals.change_due.paise(), 7500);
/// ```
pub fn finalize_bill(
    items: &[BillLineItem],
    membership_discount: Percent,
    manual_adjustment: Money,
    gst_rate: Percent,
    amount_received: Money,
    loyalty_paise_per_point: i64,
) -> CoreResult<BillTotals> {
    if items.is_empty() {
        return Err(CoreError::InvalidInput {
            field: "line_items".to_string(),
            reason: "a bill needs at least one line item".to_string(),
        });
    }

    if membership_discount.exceeds_full() {
        return Err(CoreError::InvalidInput {
            field: "membership_discount".to_string(),
            reason: format!("must be between 0 and 100%, got {} bps", membership_discount.bps()),
        });
    }

    if loyalty_paise_per_point <= 0 {
        return Err(CoreError::InvalidInput {
            field: "loyalty_paise_per_point".to_string(),
            reason: "accrual rate must be positive".to_string(),
        });
    }

    // 1. Subtotal over effective prices. Line items are integer paise
    //    already, so the sum needs no rounding.
    let mut subtotal = Money::zero();
    for item in items {
        validate_quantity(item.quantity)?;
        validate_price_paise(item.original_price_paise)?;
        if let Some(override_paise) = item.override_price_paise {
            validate_price_paise(override_paise)?;
        }
        subtotal += item.line_total();
    }

    // 2. Membership discount, rounded at this boundary.
    let membership_amount = subtotal.percent_of(membership_discount);

    // 3. Membership discount applies before tax.
    let taxable_base = subtotal - membership_amount;

    // 4. GST on the discounted base.
    let gst = compute_gst(taxable_base, gst_rate)?;

    // 5. Grand total, clamped at zero with a warning flag.
    let raw_total = taxable_base + gst + manual_adjustment;
    let negative_total_clamped = raw_total.is_negative();
    let grand_total = raw_total.clamp_non_negative();

    // 6/7 depend on the payment covering the total.
    if amount_received < grand_total {
        return Err(CoreError::InsufficientPayment {
            required_paise: grand_total.paise(),
            received_paise: amount_received.paise(),
        });
    }

    // 6. Change due, never negative.
    let change_due = (amount_received - grand_total).clamp_non_negative();

    // 7. Loyalty accrual: floor division, partial points never granted.
    let loyalty_points_earned = grand_total.paise() / loyalty_paise_per_point;

    Ok(BillTotals {
        subtotal,
        membership_discount: membership_amount,
        taxable_base,
        gst,
        grand_total,
        change_due,
        loyalty_points_earned,
        negative_total_clamped,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price_paise: i64, qty: i64) -> BillLineItem {
        BillLineItem::new("svc", "Service", Money::from_paise(price_paise), "staff-1", qty)
    }

    /// ₹500 ×1 + ₹300 ×2, 10% membership, 5% GST, -₹50 adjustment:
    /// the full worked example through every pipeline stage.
    #[test]
    fn test_full_pipeline() {
        let items = vec![line(50000, 1), line(30000, 2)];

        let totals = finalize_bill(
            &items,
            Percent::from_bps(1000), // 10% membership
            Money::from_paise(-5000), // -₹50 adjustment
            Percent::from_bps(500),  // 5% GST
            Money::from_paise(100000), // ₹1000 received
            1000,
        )
        .unwrap();

        assert_eq!(totals.subtotal.paise(), 110000); // ₹1100
        assert_eq!(totals.membership_discount.paise(), 11000); // ₹110
        assert_eq!(totals.taxable_base.paise(), 99000); // ₹990
        assert_eq!(totals.gst.paise(), 4950); // ₹49.50
        assert_eq!(totals.grand_total.paise(), 98950); // ₹989.50
        assert_eq!(totals.change_due.paise(), 1050); // ₹10.50
        assert_eq!(totals.loyalty_points_earned, 98); // floor(989.50 / 10)
        assert!(!totals.negative_total_clamped);
    }

    /// Single item, no discounts, no adjustment:
    /// grand total == price × qty × (1 + gst).
    #[test]
    fn test_bill_additivity() {
        let items = vec![line(40000, 3)]; // ₹1200

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::zero(),
            Percent::from_bps(500),
            Money::from_paise(200000),
            1000,
        )
        .unwrap();

        assert_eq!(totals.subtotal.paise(), 120000);
        assert_eq!(totals.gst.paise(), 6000);
        assert_eq!(totals.grand_total.paise(), 126000);
    }

    #[test]
    fn test_override_prices_flow_into_subtotal() {
        let mut discounted = line(100000, 1);
        discounted.override_price_paise = Some(85000);
        let items = vec![discounted, line(30000, 1)];

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::zero(),
            Percent::zero(),
            Money::from_paise(115000),
            1000,
        )
        .unwrap();

        assert_eq!(totals.subtotal.paise(), 115000);
    }

    #[test]
    fn test_insufficient_payment_fails() {
        let items = vec![line(50000, 1)];

        let err = finalize_bill(
            &items,
            Percent::zero(),
            Money::zero(),
            Percent::from_bps(500),
            Money::from_paise(52499), // one paisa short of ₹525
            1000,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::InsufficientPayment {
                required_paise: 52500,
                received_paise: 52499,
            }
        ));
    }

    #[test]
    fn test_exact_payment_has_zero_change() {
        let items = vec![line(50000, 1)];

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::zero(),
            Percent::from_bps(500),
            Money::from_paise(52500),
            1000,
        )
        .unwrap();

        assert!(totals.change_due.is_zero());
    }

    /// Change due is never negative, whatever is received at or above the
    /// total.
    #[test]
    fn test_change_due_non_negative() {
        let items = vec![line(50000, 1)];

        for received in [52500i64, 52501, 60000, 1_000_000] {
            let totals = finalize_bill(
                &items,
                Percent::zero(),
                Money::zero(),
                Percent::from_bps(500),
                Money::from_paise(received),
                1000,
            )
            .unwrap();
            assert!(totals.change_due.paise() >= 0);
            assert_eq!(totals.change_due.paise(), received - 52500);
        }
    }

    #[test]
    fn test_negative_total_clamps_with_warning() {
        // ₹100 bill with a -₹200 refund adjustment: clamp to ₹0 and warn
        let items = vec![line(10000, 1)];

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::from_paise(-20000),
            Percent::zero(),
            Money::zero(),
            1000,
        )
        .unwrap();

        assert!(totals.negative_total_clamped);
        assert!(totals.grand_total.is_zero());
        assert_eq!(totals.loyalty_points_earned, 0);
        // Zero total: zero received covers it, change is zero
        assert!(totals.change_due.is_zero());
    }

    #[test]
    fn test_positive_adjustment_is_a_surcharge() {
        let items = vec![line(10000, 1)];

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::from_paise(2000), // ₹20 tip
            Percent::zero(),
            Money::from_paise(12000),
            1000,
        )
        .unwrap();

        assert_eq!(totals.grand_total.paise(), 12000);
        assert!(!totals.negative_total_clamped);
    }

    #[test]
    fn test_loyalty_points_floor_not_round() {
        // ₹99.90 grand total earns 9 points, not 10
        let items = vec![line(9990, 1)];

        let totals = finalize_bill(
            &items,
            Percent::zero(),
            Money::zero(),
            Percent::zero(),
            Money::from_paise(9990),
            1000,
        )
        .unwrap();

        assert_eq!(totals.loyalty_points_earned, 9);
    }

    #[test]
    fn test_empty_bill_fails() {
        let err = finalize_bill(
            &[],
            Percent::zero(),
            Money::zero(),
            Percent::from_bps(500),
            Money::zero(),
            1000,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }

    #[test]
    fn test_malformed_items_fail() {
        let bad_qty = BillLineItem::new("svc", "Service", Money::from_paise(1000), "s", 0);
        assert!(finalize_bill(
            &[bad_qty],
            Percent::zero(),
            Money::zero(),
            Percent::zero(),
            Money::zero(),
            1000,
        )
        .is_err());

        let bad_price = BillLineItem::new("svc", "Service", Money::from_paise(-1), "s", 1);
        assert!(finalize_bill(
            &[bad_price],
            Percent::zero(),
            Money::zero(),
            Percent::zero(),
            Money::zero(),
            1000,
        )
        .is_err());
    }

    #[test]
    fn test_membership_discount_above_full_fails() {
        let items = vec![line(10000, 1)];
        let err = finalize_bill(
            &items,
            Percent::from_bps(10001),
            Money::zero(),
            Percent::zero(),
            Money::from_paise(10000),
            1000,
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidInput { .. }));
    }
}
