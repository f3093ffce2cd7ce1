//! # Price Override Workflow
//!
//! Validates and prepares a single-item price change requested at bill
//! time, enforcing the approval policy and the PIN presence gate.
//!
//! ## Validation Pipeline (fail fast, in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  requestOverride(item, newPrice, reason, pin)                          │
//! │                                                                         │
//! │  1. Price bound      0 <= newPrice <= originalPrice   → InvalidPrice   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. Classify         discount % → approval tier                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. Reason gate      custom needs >= 10 chars         → ReasonRequired │
//! │         │            (tenant flag: any discount needs a reason)        │
//! │         ▼                                                               │
//! │  4. PIN gate         tier needs approval? PIN must    → Authorization  │
//! │         │            have >= 4 digits after stripping    Required      │
//! │         ▼                                                               │
//! │  5. Build audit record + updated line item copy                        │
//! │                                                                         │
//! │  No side effect happens in here. The caller persists the record and    │
//! │  only then swaps the line item, so a failed write leaves the draft     │
//! │  untouched (atomic from the workflow's perspective).                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{discount_percent, Money};
use crate::policy::{classify, Classification};
use crate::types::{ApprovalRules, BillLineItem, OverrideReason, PriceOverride};
use crate::validation::{validate_pin, validate_reason};
use crate::MIN_CUSTOM_REASON_CHARS;

// =============================================================================
// Approved Override
// =============================================================================

/// Outcome of a successful override request: the immutable audit record,
/// the updated line item copy, and the sanitized PIN (when one was
/// required) for the authorization collaborator to verify.
#[derive(Debug, Clone)]
pub struct ApprovedOverride {
    /// Audit record to persist. Write-once.
    pub record: PriceOverride,

    /// Copy of the line item with the override applied. The caller swaps
    /// it into the draft only after the record is durably stored.
    pub item: BillLineItem,

    /// How the discount classified, for the caller's authorization step.
    pub classification: Classification,

    /// Digits-only PIN, present exactly when the tier needs approval.
    pub sanitized_pin: Option<String>,
}

// =============================================================================
// Request Override
// =============================================================================

/// Validates an override request and constructs the audit record.
///
/// Validation order is load-bearing: the operator sees the *first*
/// violation, and no later check can mask an earlier one.
///
/// The PIN is checked for shape only (digits stripped, at most 6 kept, at
/// least 4 required). Verifying it against a stored credential for the
/// required role is delegated to the authorization collaborator.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use salon_core::money::Money;
/// use salon_core::pricing::request_override;
/// use salon_core::policy::ApprovalTier;
/// use salon_core::types::{ApprovalRules, BillLineItem, OverrideReason};
///
/// let item = BillLineItem::new("svc-1", "Hair Spa", Money::from_paise(100000), "staff-1", 1);
/// let rules = ApprovalRules::sensible_defaults("tenant-1");
///
/// let approved = request_override(
///     &item,
///     "booking-1",
///     Money::from_paise(85000),
///     OverrideReason::Custom,
///     Some("regular client"),
///     Some("4321"),
///     "mgr-1",
///     &rules,
///     Utc::now(),
/// )
/// .unwrap();
///
/// assert_eq!(approved.record.discount_bps, 1500);
/// assert_eq!(approved.record.tier, ApprovalTier::Manager);
/// ```
#[allow(clippy::too_many_arguments)]
pub fn request_override(
    item: &BillLineItem,
    booking_id: &str,
    new_price: Money,
    reason_code: OverrideReason,
    reason_text: Option<&str>,
    raw_pin: Option<&str>,
    approved_by: &str,
    rules: &ApprovalRules,
    now: DateTime<Utc>,
) -> CoreResult<ApprovedOverride> {
    // 1. Price bound. Overrides only ever lower a price.
    if new_price.is_negative() || new_price > item.original_price() {
        return Err(CoreError::InvalidPrice {
            new_price_paise: new_price.paise(),
            original_price_paise: item.original_price_paise,
        });
    }

    // 2. Derive the discount and classify it.
    let discount = discount_percent(item.original_price(), new_price);
    let classification = classify(discount, rules);

    // 3. Reason gate. Custom reasons carry a 10 character minimum so a
    //    one-word excuse cannot justify an ad-hoc discount. Tenants may
    //    additionally require a reason for every discount.
    if reason_code == OverrideReason::Custom {
        validate_reason(reason_text.unwrap_or(""), MIN_CUSTOM_REASON_CHARS).map_err(|_| {
            CoreError::ReasonRequired {
                min_chars: MIN_CUSTOM_REASON_CHARS,
            }
        })?;
    } else if rules.require_reason_for_discount && !discount.is_zero() {
        validate_reason(reason_text.unwrap_or(""), 1)
            .map_err(|_| CoreError::ReasonRequired { min_chars: 1 })?;
    }

    // 4. PIN presence gate for tiers above auto.
    let sanitized_pin = if classification.needs_approval {
        let pin = validate_pin(raw_pin.unwrap_or("")).map_err(|_| {
            CoreError::AuthorizationRequired {
                tier: classification.tier,
            }
        })?;
        Some(pin)
    } else {
        None
    };

    // 5. Construct the audit record and the updated item copy.
    let reason_text = reason_text
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let record = PriceOverride {
        id: Uuid::new_v4().to_string(),
        booking_id: booking_id.to_string(),
        service_id: item.service_id.clone(),
        original_price_paise: item.original_price_paise,
        new_price_paise: new_price.paise(),
        discount_bps: discount.bps(),
        tier: classification.tier,
        reason_code,
        reason_text: reason_text.clone(),
        approved_by: approved_by.to_string(),
        approved_at: now,
    };

    let mut updated = item.clone();
    updated.override_price_paise = Some(new_price.paise());
    updated.override_reason_code = Some(reason_code);
    updated.override_reason_text = reason_text;

    Ok(ApprovedOverride {
        record,
        item: updated,
        classification,
        sanitized_pin,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ApprovalTier;

    fn item(price_paise: i64) -> BillLineItem {
        BillLineItem::new("svc-1", "Hair Spa", Money::from_paise(price_paise), "staff-1", 1)
    }

    fn rules() -> ApprovalRules {
        ApprovalRules::sensible_defaults("tenant-1")
    }

    #[test]
    fn test_fifteen_percent_override_with_custom_reason_and_pin() {
        // ₹1000 → ₹850: manager tier under auto 10 / manager 25 / owner 50
        let approved = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(85000),
            OverrideReason::Custom,
            Some("festival offer"), // 14 characters
            Some("4321"),
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(approved.record.discount_bps, 1500);
        assert_eq!(approved.record.tier, ApprovalTier::Manager);
        assert!(approved.classification.needs_approval);
        assert_eq!(approved.item.override_price_paise, Some(85000));
        assert_eq!(approved.sanitized_pin.as_deref(), Some("4321"));
    }

    #[test]
    fn test_sixty_percent_override_classifies_owner_tier() {
        // ₹1000 → ₹400: above the manager threshold, owner tier. A
        // format-valid PIN is accepted here; role verification happens at
        // the authorization collaborator.
        let approved = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(40000),
            OverrideReason::ServiceRecovery,
            None,
            Some("987654"),
            "owner-1",
            &rules(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(approved.record.discount_bps, 6000);
        assert_eq!(approved.record.tier, ApprovalTier::Owner);
    }

    #[test]
    fn test_override_above_original_price_fails() {
        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(120000),
            OverrideReason::Promotion,
            None,
            None,
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn test_negative_override_price_fails() {
        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(-1),
            OverrideReason::Promotion,
            None,
            None,
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::InvalidPrice { .. }));
    }

    #[test]
    fn test_custom_reason_below_ten_chars_fails() {
        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(95000), // 5%: auto tier, but reason still gated
            OverrideReason::Custom,
            Some("discount"), // 8 characters
            None,
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::ReasonRequired { min_chars: 10 }));
    }

    #[test]
    fn test_coded_reason_needs_no_text_by_default() {
        let approved = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(95000), // auto tier
            OverrideReason::Loyalty,
            None,
            None,
            "staff-1",
            &rules(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(approved.record.tier, ApprovalTier::Auto);
        assert!(approved.sanitized_pin.is_none());
    }

    #[test]
    fn test_tenant_flag_requires_reason_for_any_discount() {
        let mut r = rules();
        r.require_reason_for_discount = true;

        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(95000),
            OverrideReason::Loyalty,
            None,
            None,
            "staff-1",
            &r,
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ReasonRequired { .. }));

        // A short note satisfies the flag for coded reasons
        assert!(request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(95000),
            OverrideReason::Loyalty,
            Some("regular"),
            None,
            "staff-1",
            &r,
            Utc::now(),
        )
        .is_ok());
    }

    #[test]
    fn test_missing_pin_fails_when_approval_needed() {
        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(85000), // manager tier
            OverrideReason::Loyalty,
            None,
            None,
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::AuthorizationRequired {
                tier: ApprovalTier::Manager
            }
        ));
    }

    #[test]
    fn test_malformed_pin_fails_when_approval_needed() {
        // Three digits survive sanitization: not enough
        let err = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(85000),
            OverrideReason::Loyalty,
            None,
            Some("1a2b3"),
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::AuthorizationRequired { .. }));
    }

    #[test]
    fn test_pin_is_sanitized_before_length_check() {
        // Spaces and dashes stripped, six digits kept
        let approved = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(85000),
            OverrideReason::Loyalty,
            None,
            Some(" 12-34-56-78 "),
            "mgr-1",
            &rules(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(approved.sanitized_pin.as_deref(), Some("123456"));
    }

    #[test]
    fn test_zero_discount_needs_nothing() {
        // Overriding to the same price: no discount, no reason, no PIN
        let approved = request_override(
            &item(100000),
            "booking-1",
            Money::from_paise(100000),
            OverrideReason::PriceMatch,
            None,
            None,
            "staff-1",
            &rules(),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(approved.record.discount_bps, 0);
        assert_eq!(approved.record.tier, ApprovalTier::None);
        assert!(!approved.classification.needs_approval);
    }

    /// The audit record never carries a price outside [0, original].
    #[test]
    fn test_override_bound_property() {
        let original = 100000i64;
        for new_price in [-50000, -1, 0, 1, 50000, 99999, 100000, 100001, 200000] {
            let result = request_override(
                &item(original),
                "booking-1",
                Money::from_paise(new_price),
                OverrideReason::Promotion,
                None,
                Some("123456"),
                "mgr-1",
                &rules(),
                Utc::now(),
            );

            match result {
                Ok(approved) => {
                    assert!(approved.record.new_price_paise >= 0);
                    assert!(approved.record.new_price_paise <= original);
                }
                Err(e) => assert!(matches!(e, CoreError::InvalidPrice { .. })),
            }
        }
    }

    #[test]
    fn test_no_item_mutation_on_failure() {
        let original = item(100000);
        let _ = request_override(
            &original,
            "booking-1",
            Money::from_paise(120000),
            OverrideReason::Promotion,
            None,
            None,
            "mgr-1",
            &rules(),
            Utc::now(),
        );

        // The input item is untouched; only the returned copy ever changes
        assert!(original.override_price_paise.is_none());
    }
}
