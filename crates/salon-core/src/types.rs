//! # Domain Types
//!
//! Core domain types for the billing and discount-governance subsystem.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │  ApprovalRules  │   │  BillLineItem    │   │  PriceOverride   │     │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  thresholds     │   │  service prices  │   │  immutable audit │     │
//! │  │  (basis points) │   │  + override      │   │  record          │     │
//! │  └─────────────────┘   └──────────────────┘   └──────────────────┘     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │ StaffSuggestion │   │      Bill        │   │  BillingConfig   │     │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  pending ──►    │   │  write-once      │   │  GST rate,       │     │
//! │  │  approved/      │   │  computed totals │   │  loyalty accrual │     │
//! │  │  rejected/      │   └──────────────────┘   └──────────────────┘     │
//! │  │  expired        │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business references: (`booking_id`, `service_id`) - human-facing

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};
use crate::policy::ApprovalTier;

// =============================================================================
// Approval Rules
// =============================================================================

/// Per-tenant discount governance configuration.
///
/// Thresholds are basis points (1000 = 10%) and must be strictly ascending:
/// `0 <= auto < manager < owner <= 10000`. Rules are owned by the tenant,
/// mutated only through the administrative upsert, and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ApprovalRules {
    /// Tenant these rules belong to.
    pub tenant_id: String,

    /// Discounts at or below this need no approval at all.
    pub auto_approve_bps: u32,

    /// Discounts at or below this (and above auto) need a manager PIN.
    pub manager_approval_bps: u32,

    /// Discounts at or below this (and above manager) need the owner PIN.
    /// Anything above still classifies as owner tier.
    pub owner_approval_bps: u32,

    /// Total override discount the salon may grant per day, in paise.
    pub max_discount_per_day_paise: i64,

    /// Whether every discount needs a justification, not just custom ones.
    pub require_reason_for_discount: bool,

    /// Whether staff may file asynchronous discount suggestions.
    pub allow_staff_suggestions: bool,

    /// Minutes a pending suggestion stays actionable (>= 1).
    pub suggestion_expiry_minutes: i64,

    /// When the rules were last replaced.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ApprovalRules {
    /// Reasonable starting rules for a salon that has not configured any:
    /// auto up to 10%, manager up to 25%, owner beyond, ₹5000 discount
    /// budget per day, suggestions enabled with a 30 minute window.
    pub fn sensible_defaults(tenant_id: impl Into<String>) -> Self {
        ApprovalRules {
            tenant_id: tenant_id.into(),
            auto_approve_bps: 1000,
            manager_approval_bps: 2500,
            owner_approval_bps: 5000,
            max_discount_per_day_paise: 500_000,
            require_reason_for_discount: false,
            allow_staff_suggestions: true,
            suggestion_expiry_minutes: 30,
            updated_at: Utc::now(),
        }
    }

    /// The daily discount budget as Money.
    #[inline]
    pub fn max_discount_per_day(&self) -> Money {
        Money::from_paise(self.max_discount_per_day_paise)
    }

    /// How long a newly filed suggestion stays actionable.
    #[inline]
    pub fn suggestion_expiry(&self) -> Duration {
        Duration::minutes(self.suggestion_expiry_minutes)
    }
}

// =============================================================================
// Billing Config
// =============================================================================

/// Per-tenant billing configuration: tax rate and loyalty accrual.
///
/// Kept separate from [`ApprovalRules`] because it governs how bills are
/// computed, not who may discount them.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BillingConfig {
    /// Tenant this configuration belongs to.
    pub tenant_id: String,

    /// GST rate in basis points (500 = 5%).
    pub gst_bps: u32,

    /// Paise of spend that earn one loyalty point (1000 = one point per ₹10).
    pub loyalty_paise_per_point: i64,

    /// When the configuration was last replaced.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl BillingConfig {
    /// Default billing configuration: 5% GST, one point per ₹10.
    pub fn sensible_defaults(tenant_id: impl Into<String>) -> Self {
        BillingConfig {
            tenant_id: tenant_id.into(),
            gst_bps: 500,
            loyalty_paise_per_point: 1000,
            updated_at: Utc::now(),
        }
    }

    /// The GST rate.
    #[inline]
    pub fn gst_rate(&self) -> Percent {
        Percent::from_bps(self.gst_bps)
    }
}

// =============================================================================
// Override Reason
// =============================================================================

/// Why a price was overridden. `Custom` carries free text and is held to a
/// stricter justification rule than the coded reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OverrideReason {
    /// Long-standing client, relationship pricing.
    Loyalty,
    /// Making up for a bad experience.
    ServiceRecovery,
    /// Running promotion.
    Promotion,
    /// Approved from a staff suggestion.
    StaffSuggestion,
    /// Matching a competitor's price.
    PriceMatch,
    /// Anything else; requires written justification.
    Custom,
}

// =============================================================================
// Bill Line Item
// =============================================================================

/// One service line on a draft or finalized bill.
///
/// Created when a service is added to a draft bill; mutated once when an
/// override is applied; read-only after the bill is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillLineItem {
    /// Service being billed.
    pub service_id: String,

    /// Display name at time of adding (frozen).
    pub service_name: String,

    /// Catalog price in paise at time of adding (frozen).
    pub original_price_paise: i64,

    /// Staff member performing the service.
    pub staff_id: String,

    /// Quantity (>= 1).
    pub quantity: i64,

    /// Manager-approved adjusted price, if any. Always <= original.
    pub override_price_paise: Option<i64>,

    /// Coded reason for the override, if any.
    pub override_reason_code: Option<OverrideReason>,

    /// Free-text justification for the override, if any.
    pub override_reason_text: Option<String>,
}

impl BillLineItem {
    /// Creates a fresh line item with no override.
    pub fn new(
        service_id: impl Into<String>,
        service_name: impl Into<String>,
        original_price: Money,
        staff_id: impl Into<String>,
        quantity: i64,
    ) -> Self {
        BillLineItem {
            service_id: service_id.into(),
            service_name: service_name.into(),
            original_price_paise: original_price.paise(),
            staff_id: staff_id.into(),
            quantity,
            override_price_paise: None,
            override_reason_code: None,
            override_reason_text: None,
        }
    }

    /// Returns the catalog price as Money.
    #[inline]
    pub fn original_price(&self) -> Money {
        Money::from_paise(self.original_price_paise)
    }

    /// The price this line actually bills at: the override when present,
    /// the catalog price otherwise.
    #[inline]
    pub fn effective_price(&self) -> Money {
        Money::from_paise(self.override_price_paise.unwrap_or(self.original_price_paise))
    }

    /// Line total (effective price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.effective_price().multiply_quantity(self.quantity)
    }

    /// Whether an override has been applied to this line.
    #[inline]
    pub fn has_override(&self) -> bool {
        self.override_price_paise.is_some()
    }
}

// =============================================================================
// Price Override (audit record)
// =============================================================================

/// Persisted decision record for a single price override.
///
/// Created at override-confirmation time and immutable thereafter. The
/// invariant `new_price <= original_price` is enforced before construction;
/// nothing in this type or the persistence layer ever updates a row.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceOverride {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Booking the billed services belong to.
    pub booking_id: String,

    /// Service whose price was overridden.
    pub service_id: String,

    /// Catalog price at override time.
    pub original_price_paise: i64,

    /// The approved new price.
    pub new_price_paise: i64,

    /// Derived discount, basis points, clamped >= 0.
    pub discount_bps: u32,

    /// Approval tier the discount classified into (audit metadata).
    pub tier: ApprovalTier,

    /// Coded reason for the override.
    pub reason_code: OverrideReason,

    /// Free-text justification, when given.
    pub reason_text: Option<String>,

    /// Operator who confirmed the override.
    pub approved_by: String,

    /// When the override was confirmed.
    #[ts(as = "String")]
    pub approved_at: DateTime<Utc>,
}

impl PriceOverride {
    /// The discount amount in paise for one unit of the service.
    #[inline]
    pub fn discount_amount(&self) -> Money {
        Money::from_paise(self.original_price_paise - self.new_price_paise)
    }
}

// =============================================================================
// Staff Suggestion
// =============================================================================

/// What kind of concession a staff member is suggesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
    /// Reduced price.
    Discount,
    /// Service on the house.
    Complimentary,
    /// Better service at the booked price.
    Upgrade,
    /// Anything else.
    Custom,
}

/// Lifecycle state of a staff suggestion.
///
/// `Pending` is the only non-terminal state. A persisted `Pending` may
/// still be *effectively* expired; callers derive the effective status
/// from `expires_at` on every read (lazy expiry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    /// Awaiting a manager's decision.
    Pending,
    /// Manager accepted the suggestion.
    Approved,
    /// Manager declined the suggestion.
    Rejected,
    /// The review window lapsed before a decision.
    Expired,
}

impl SuggestionStatus {
    /// Whether this status permits no further transitions.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, SuggestionStatus::Pending)
    }
}

impl Default for SuggestionStatus {
    fn default() -> Self {
        SuggestionStatus::Pending
    }
}

/// A staff-proposed concession awaiting manager review.
///
/// Lifecycle behavior (submit, approve, reject, lazy expiry) lives in the
/// [`crate::suggestion`] module.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StaffSuggestion {
    pub id: String,
    pub booking_id: String,
    pub staff_id: String,
    pub suggestion_type: SuggestionType,
    pub original_price_paise: i64,
    pub suggested_price_paise: i64,
    /// Derived discount, basis points.
    pub discount_bps: u32,
    /// Why the staff member is suggesting this (required, non-empty).
    pub reason: String,
    pub status: SuggestionStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// `created_at` + the tenant's suggestion expiry window.
    #[ts(as = "String")]
    pub expires_at: DateTime<Utc>,
    /// Manager who resolved the suggestion, once terminal.
    pub reviewed_by: Option<String>,
    #[ts(as = "Option<String>")]
    pub reviewed_at: Option<DateTime<Utc>>,
    /// Optional note on rejection.
    pub rejection_reason: Option<String>,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card on the salon terminal.
    Card,
    /// UPI transfer.
    Upi,
    /// Wallet balance.
    Wallet,
}

// =============================================================================
// Bill
// =============================================================================

/// A finalized bill.
///
/// Created once at checkout and immutable after creation; re-billing means
/// creating a new Bill. Line items are persisted alongside and fetched
/// separately (snapshot pattern).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub tenant_id: String,
    pub booking_id: String,
    /// Membership discount applied before tax, basis points.
    pub membership_discount_bps: u32,
    /// Signed adjustment: negative = extra discount, positive = surcharge.
    pub manual_adjustment_paise: i64,
    /// GST rate the bill was computed with, basis points.
    pub gst_bps: u32,
    pub payment_method: PaymentMethod,
    pub amount_received_paise: i64,
    pub subtotal_paise: i64,
    pub membership_discount_paise: i64,
    pub gst_paise: i64,
    pub grand_total_paise: i64,
    pub change_due_paise: i64,
    pub loyalty_points_earned: i64,
    /// Set when the adjustment would have driven the total below zero.
    pub negative_total_clamped: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Bill {
    /// Returns the grand total as Money.
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_paise(self.grand_total_paise)
    }

    /// Returns the change due as Money.
    #[inline]
    pub fn change_due(&self) -> Money {
        Money::from_paise(self.change_due_paise)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_price_prefers_override() {
        let mut item = BillLineItem::new("svc-1", "Haircut", Money::from_paise(100000), "staff-1", 1);
        assert_eq!(item.effective_price().paise(), 100000);
        assert!(!item.has_override());

        item.override_price_paise = Some(85000);
        assert_eq!(item.effective_price().paise(), 85000);
        assert!(item.has_override());
    }

    #[test]
    fn test_line_total_uses_quantity() {
        let item = BillLineItem::new("svc-2", "Head Massage", Money::from_paise(30000), "staff-1", 2);
        assert_eq!(item.line_total().paise(), 60000);
    }

    #[test]
    fn test_suggestion_status_terminality() {
        assert!(!SuggestionStatus::Pending.is_terminal());
        assert!(SuggestionStatus::Approved.is_terminal());
        assert!(SuggestionStatus::Rejected.is_terminal());
        assert!(SuggestionStatus::Expired.is_terminal());
    }

    #[test]
    fn test_default_rules_are_ascending() {
        let rules = ApprovalRules::sensible_defaults("tenant-1");
        assert!(rules.auto_approve_bps < rules.manager_approval_bps);
        assert!(rules.manager_approval_bps < rules.owner_approval_bps);
        assert!(rules.owner_approval_bps <= 10000);
    }

    #[test]
    fn test_override_discount_amount() {
        let record = PriceOverride {
            id: "o-1".to_string(),
            booking_id: "b-1".to_string(),
            service_id: "svc-1".to_string(),
            original_price_paise: 100000,
            new_price_paise: 85000,
            discount_bps: 1500,
            tier: ApprovalTier::Manager,
            reason_code: OverrideReason::Loyalty,
            reason_text: None,
            approved_by: "mgr-1".to_string(),
            approved_at: Utc::now(),
        };
        assert_eq!(record.discount_amount().paise(), 15000);
    }
}
