//! Notification module.
//!
//! Fire-and-forget notifications around the suggestion lifecycle: a
//! manager hears about new pending suggestions, the suggesting staff
//! member hears about the outcome. Delivery transport (push, in-app) is a
//! separate service; this process emits structured log events that the
//! delivery side tails. Failures never propagate into the calling
//! operation.

use tracing::info;

use salon_core::{StaffSuggestion, SuggestionStatus};

/// Emits suggestion lifecycle notifications as structured log events.
#[derive(Debug, Clone, Default)]
pub struct Notifier;

impl Notifier {
    pub fn new() -> Self {
        Notifier
    }

    /// A new suggestion awaits manager review.
    pub fn suggestion_pending(&self, suggestion: &StaffSuggestion) {
        info!(
            target: "notifications",
            event = "suggestion_pending",
            suggestion_id = %suggestion.id,
            booking_id = %suggestion.booking_id,
            staff_id = %suggestion.staff_id,
            discount_bps = suggestion.discount_bps,
            expires_at = %suggestion.expires_at,
            "Suggestion awaiting review"
        );
    }

    /// A suggestion reached a terminal state; tell the staff member.
    pub fn suggestion_resolved(&self, suggestion: &StaffSuggestion) {
        let outcome = match suggestion.status {
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Expired => "expired",
            SuggestionStatus::Pending => return, // nothing to announce
        };

        info!(
            target: "notifications",
            event = "suggestion_resolved",
            suggestion_id = %suggestion.id,
            staff_id = %suggestion.staff_id,
            outcome = %outcome,
            reviewed_by = suggestion.reviewed_by.as_deref().unwrap_or(""),
            "Suggestion resolved"
        );
    }
}
