//! # Approval Policy Evaluator
//!
//! Classifies a discount percentage into an approval tier using the salon's
//! configured thresholds.
//!
//! ## The Tier Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   Discount %        0        auto         manager          owner       │
//! │                     │          │             │               │  100%   │
//! │                     ▼          ▼             ▼               ▼    │    │
//! │   ──────────────────┼──────────┼─────────────┼───────────────┼────┤    │
//! │   Tier:      none   │   auto   │   manager   │     owner     │owner    │
//! │   Approval:  no     │   no     │   yes       │     yes       │yes      │
//! │                                                                         │
//! │   Boundaries are INCLUSIVE on the low side: a discount exactly equal   │
//! │   to a threshold belongs to the LOWER tier, never the higher one.      │
//! │   Off-by-one tier classification is a correctness bug with financial   │
//! │   impact, so the comparisons below are deliberate.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Percent;
use crate::types::ApprovalRules;

// =============================================================================
// Approval Tier
// =============================================================================

/// The approval level a discount percentage falls into.
///
/// Derives `Ord` so that "a bigger discount never needs a smaller tier"
/// is expressible as plain `<=` over tiers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalTier {
    /// No discount at all (zero, or a disallowed price increase).
    None,
    /// Small discount the system approves on its own.
    Auto,
    /// Needs a manager's sign-off.
    Manager,
    /// Needs the owner's sign-off.
    Owner,
}

impl fmt::Display for ApprovalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApprovalTier::None => "none",
            ApprovalTier::Auto => "auto",
            ApprovalTier::Manager => "manager",
            ApprovalTier::Owner => "owner",
        };
        write!(f, "{}", label)
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Result of classifying a discount against a salon's approval rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Tier the discount falls into.
    pub tier: ApprovalTier,

    /// Whether an authorization PIN must accompany the override.
    pub needs_approval: bool,
}

/// Classifies a discount percentage into an approval tier.
///
/// First-match-wins in ascending threshold order, inclusive at each
/// boundary. Pure and total: every input maps to exactly one tier, no
/// errors, no panics.
///
/// ## Algorithm
/// 1. Zero discount → `none`, no approval
/// 2. At or below the auto threshold → `auto`, no approval
/// 3. At or below the manager threshold → `manager`, approval required
/// 4. Everything else (including above the owner threshold) → `owner`,
///    approval required
///
/// ## Example
/// ```rust
/// use salon_core::money::Percent;
/// use salon_core::policy::{classify, ApprovalTier};
/// use salon_core::types::ApprovalRules;
///
/// let rules = ApprovalRules::sensible_defaults("tenant-1");
/// // defaults: auto 10%, manager 25%, owner 50%
/// let c = classify(Percent::from_bps(1500), &rules);
/// assert_eq!(c.tier, ApprovalTier::Manager);
/// assert!(c.needs_approval);
/// ```
pub fn classify(discount: Percent, rules: &ApprovalRules) -> Classification {
    let bps = discount.bps();

    if bps == 0 {
        return Classification {
            tier: ApprovalTier::None,
            needs_approval: false,
        };
    }

    if bps <= rules.auto_approve_bps {
        return Classification {
            tier: ApprovalTier::Auto,
            needs_approval: false,
        };
    }

    if bps <= rules.manager_approval_bps {
        return Classification {
            tier: ApprovalTier::Manager,
            needs_approval: true,
        };
    }

    Classification {
        tier: ApprovalTier::Owner,
        needs_approval: true,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ApprovalRules {
        // auto 10%, manager 25%, owner 50%
        ApprovalRules::sensible_defaults("tenant-1")
    }

    #[test]
    fn test_zero_discount_is_none_tier() {
        let c = classify(Percent::zero(), &rules());
        assert_eq!(c.tier, ApprovalTier::None);
        assert!(!c.needs_approval);
    }

    #[test]
    fn test_boundary_inclusivity() {
        let r = rules();

        // Exactly at the auto threshold: still auto, no approval
        let c = classify(Percent::from_bps(r.auto_approve_bps), &r);
        assert_eq!(c.tier, ApprovalTier::Auto);
        assert!(!c.needs_approval);

        // One basis point above: manager, approval required
        let c = classify(Percent::from_bps(r.auto_approve_bps + 1), &r);
        assert_eq!(c.tier, ApprovalTier::Manager);
        assert!(c.needs_approval);

        // Exactly at the manager threshold: still manager
        let c = classify(Percent::from_bps(r.manager_approval_bps), &r);
        assert_eq!(c.tier, ApprovalTier::Manager);

        // One basis point above: owner
        let c = classify(Percent::from_bps(r.manager_approval_bps + 1), &r);
        assert_eq!(c.tier, ApprovalTier::Owner);
    }

    #[test]
    fn test_above_owner_threshold_is_still_owner() {
        let r = rules();
        let c = classify(Percent::from_bps(r.owner_approval_bps + 2000), &r);
        assert_eq!(c.tier, ApprovalTier::Owner);
        assert!(c.needs_approval);
    }

    #[test]
    fn test_fifteen_percent_is_manager_tier() {
        let c = classify(Percent::from_bps(1500), &rules());
        assert_eq!(c.tier, ApprovalTier::Manager);
        assert!(c.needs_approval);
    }

    #[test]
    fn test_sixty_percent_is_owner_tier() {
        let c = classify(Percent::from_bps(6000), &rules());
        assert_eq!(c.tier, ApprovalTier::Owner);
        assert!(c.needs_approval);
    }

    /// A bigger discount never classifies into a smaller tier.
    #[test]
    fn test_tier_monotonicity() {
        let r = rules();
        let mut previous = ApprovalTier::None;

        for bps in 0..=10000u32 {
            let c = classify(Percent::from_bps(bps), &r);
            assert!(
                previous <= c.tier,
                "tier regressed at {} bps: {:?} after {:?}",
                bps,
                c.tier,
                previous
            );
            previous = c.tier;
        }
    }

    /// Approval is required exactly for tiers above auto.
    #[test]
    fn test_needs_approval_matches_tier() {
        let r = rules();
        for bps in (0..=10000u32).step_by(25) {
            let c = classify(Percent::from_bps(bps), &r);
            let expected = matches!(c.tier, ApprovalTier::Manager | ApprovalTier::Owner);
            assert_eq!(c.needs_approval, expected, "mismatch at {} bps", bps);
        }
    }
}
