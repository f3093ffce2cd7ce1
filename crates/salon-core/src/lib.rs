//! # salon-core: Pure Business Logic for Salon POS Billing
//!
//! This crate is the **heart** of the billing subsystem. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Salon POS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (PWA)                               │   │
//! │  │    Booking UI ──► Bill UI ──► Override Modal ──► Checkout      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    billing-api (axum)                           │   │
//! │  │    drafts, overrides, suggestions, bills, rules endpoints      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ salon-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │  policy   │  │  pricing  │  │   bill    │  │   │
//! │  │   │   Money   │  │  tiers    │  │ overrides │  │  totals   │  │   │
//! │  │   │  Percent  │  │ classify  │  │ PIN gate  │  │  GST      │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │suggestion │  │ validation│                                 │   │
//! │  │   │ lifecycle │  │   rules   │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    salon-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ApprovalRules, BillLineItem, StaffSuggestion, Bill)
//! - [`money`] - Money and Percent with integer arithmetic (no floating point!)
//! - [`policy`] - Approval tier classification
//! - [`pricing`] - Price override workflow
//! - [`suggestion`] - Staff suggestion lifecycle
//! - [`bill`] - Bill aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use salon_core::money::{discount_percent, Money};
//! use salon_core::policy::{classify, ApprovalTier};
//! use salon_core::types::ApprovalRules;
//!
//! // ₹1000 marked down to ₹850
//! let discount = discount_percent(Money::from_paise(100000), Money::from_paise(85000));
//! assert_eq!(discount.bps(), 1500); // 15%
//!
//! // 15% needs a manager under the default thresholds
//! let rules = ApprovalRules::sensible_defaults("tenant-1");
//! let c = classify(discount, &rules);
//! assert_eq!(c.tier, ApprovalTier::Manager);
//! assert!(c.needs_approval);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill;
pub mod error;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod suggestion;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use salon_core::Money` instead of
// `use salon_core::money::Money`

pub use bill::{finalize_bill, BillTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{compute_gst, discount_percent, Money, Percent};
pub use policy::{classify, ApprovalTier, Classification};
pub use pricing::{request_override, ApprovedOverride};
pub use suggestion::{submit, NewSuggestion};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default tenant ID for v0.1 (single-tenant runtime with multi-tenant schema)
///
/// ## Why a constant?
/// v0.1 serves one salon, but every table carries tenant_id so the schema
/// is ready for multi-tenancy. This constant is used throughout the
/// codebase and will be replaced with dynamic tenant resolution later.
pub const DEFAULT_TENANT_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Maximum line items allowed on a single draft bill
///
/// ## Business Reason
/// Prevents runaway drafts and keeps one bill per visit reasonable.
pub const MAX_DRAFT_ITEMS: usize = 50;

/// Maximum quantity of a single service line
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 100 instead of 1).
pub const MAX_ITEM_QUANTITY: i64 = 99;

/// Minimum characters for a custom override justification
///
/// ## Business Reason
/// Deliberate friction against one-word excuses for ad-hoc discounts.
pub const MIN_CUSTOM_REASON_CHARS: usize = 10;

/// Minimum digits a PIN must carry after sanitization.
pub const PIN_MIN_DIGITS: usize = 4;

/// Maximum digits kept from raw PIN input.
pub const PIN_MAX_DIGITS: usize = 6;
