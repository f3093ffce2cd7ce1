//! # Staff Suggestion Lifecycle
//!
//! Asynchronous discount/complimentary/upgrade suggestions proposed by
//! staff, awaiting manager approval or rejection, subject to expiry.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │                    submit (suggestions enabled)                        │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                    ┌──────────┐   approve    ┌───────────┐             │
//! │                    │ pending  │─────────────►│ approved  │ (terminal)  │
//! │                    │          │              └───────────┘             │
//! │                    │          │   reject     ┌───────────┐             │
//! │                    │          │─────────────►│ rejected  │ (terminal)  │
//! │                    │          │              └───────────┘             │
//! │                    │          │  now >=      ┌───────────┐             │
//! │                    │          │  expires_at  │ expired   │ (terminal)  │
//! │                    └──────────┘─────────────►└───────────┘             │
//! │                                                                         │
//! │  LAZY EXPIRY: nothing sweeps pending suggestions in the background.    │
//! │  Expiry is a data-driven deadline resolved at the next read or action  │
//! │  against the suggestion. Correct because every read and every          │
//! │  mutation attempt re-derives effective status from expires_at.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transitions here are the pure half of the lifecycle. Under
//! concurrent managers the persistence layer replays the same guards as a
//! conditional update, so the loser of a race observes `AlreadyResolved`
//! or `SuggestionExpired` instead of overwriting the winner's decision.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{discount_percent, Money};
use crate::types::{ApprovalRules, StaffSuggestion, SuggestionStatus, SuggestionType};
use crate::validation::validate_reason;

// =============================================================================
// Submission
// =============================================================================

/// Input for filing a new suggestion.
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub booking_id: String,
    pub staff_id: String,
    pub suggestion_type: SuggestionType,
    pub original_price: Money,
    pub suggested_price: Money,
    pub reason: String,
}

/// Files a new suggestion in `pending` state.
///
/// ## Errors
/// - `SuggestionsDisabled` when the tenant has switched suggestions off
/// - `ReasonRequired` when the reason is empty
/// - `InvalidPrice` when the suggested price is outside `[0, original]`
pub fn submit(input: NewSuggestion, rules: &ApprovalRules, now: DateTime<Utc>) -> CoreResult<StaffSuggestion> {
    if !rules.allow_staff_suggestions {
        return Err(CoreError::SuggestionsDisabled);
    }

    validate_reason(&input.reason, 1).map_err(|_| CoreError::ReasonRequired { min_chars: 1 })?;

    if input.suggested_price.is_negative() || input.suggested_price > input.original_price {
        return Err(CoreError::InvalidPrice {
            new_price_paise: input.suggested_price.paise(),
            original_price_paise: input.original_price.paise(),
        });
    }

    let discount = discount_percent(input.original_price, input.suggested_price);

    Ok(StaffSuggestion {
        id: Uuid::new_v4().to_string(),
        booking_id: input.booking_id,
        staff_id: input.staff_id,
        suggestion_type: input.suggestion_type,
        original_price_paise: input.original_price.paise(),
        suggested_price_paise: input.suggested_price.paise(),
        discount_bps: discount.bps(),
        reason: input.reason.trim().to_string(),
        status: SuggestionStatus::Pending,
        created_at: now,
        expires_at: now + rules.suggestion_expiry(),
        reviewed_by: None,
        reviewed_at: None,
        rejection_reason: None,
    })
}

// =============================================================================
// Lifecycle
// =============================================================================

impl StaffSuggestion {
    /// The status a reader should present, derived from `expires_at`.
    ///
    /// A persisted `pending` past its deadline reads as `expired` even
    /// though no writer has touched the row yet.
    pub fn effective_status(&self, now: DateTime<Utc>) -> SuggestionStatus {
        if self.status == SuggestionStatus::Pending && now >= self.expires_at {
            SuggestionStatus::Expired
        } else {
            self.status
        }
    }

    /// Whether a resolution attempt at `now` may proceed.
    ///
    /// ## Errors
    /// - `AlreadyResolved` once the suggestion is in any terminal state
    /// - `SuggestionExpired` when the deadline has lapsed
    pub fn check_actionable(&self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::AlreadyResolved {
                id: self.id.clone(),
                status: self.status,
            });
        }

        if now >= self.expires_at {
            return Err(CoreError::SuggestionExpired {
                id: self.id.clone(),
            });
        }

        Ok(())
    }

    /// Transitions `pending` → `approved`, recording the reviewer.
    ///
    /// An attempt past the deadline settles the suggestion into `expired`
    /// and fails with `SuggestionExpired`.
    pub fn approve(&mut self, reviewer_id: &str, now: DateTime<Utc>) -> CoreResult<()> {
        self.resolve(reviewer_id, SuggestionStatus::Approved, None, now)
    }

    /// Transitions `pending` → `rejected`, recording the reviewer and an
    /// optional note. Same expiry semantics as [`Self::approve`].
    pub fn reject(
        &mut self,
        reviewer_id: &str,
        rejection_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        self.resolve(reviewer_id, SuggestionStatus::Rejected, rejection_reason, now)
    }

    /// Classifies a lost resolution race from the state the loser observed.
    ///
    /// A conditional update that matched zero rows means someone (or the
    /// deadline) got there first; the observed row says which error the
    /// loser reports. `Approved`/`Rejected` mean a reviewer won;
    /// `Expired` (or a pending row the deadline disqualified) means the
    /// window closed.
    pub fn resolution_conflict(&self) -> CoreError {
        match self.status {
            SuggestionStatus::Pending | SuggestionStatus::Expired => CoreError::SuggestionExpired {
                id: self.id.clone(),
            },
            status => CoreError::AlreadyResolved {
                id: self.id.clone(),
                status,
            },
        }
    }

    fn resolve(
        &mut self,
        reviewer_id: &str,
        target: SuggestionStatus,
        rejection_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> CoreResult<()> {
        match self.check_actionable(now) {
            Ok(()) => {}
            Err(e) => {
                // Settle the lapsed deadline so later readers see the
                // terminal state directly.
                if matches!(e, CoreError::SuggestionExpired { .. }) {
                    self.status = SuggestionStatus::Expired;
                }
                return Err(e);
            }
        }

        self.status = target;
        self.reviewed_by = Some(reviewer_id.to_string());
        self.reviewed_at = Some(now);
        self.rejection_reason = rejection_reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
