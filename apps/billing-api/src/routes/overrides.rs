//! # Price Override Endpoint
//!
//! `POST /billing/overrides` runs the full override workflow for one draft
//! line:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Find the line on the booking's draft            → 404              │
//! │  2. Validate + classify (salon-core)                → 400/422/401      │
//! │  3. Verify the PIN for the tier (authorizer)        → 401              │
//! │  4. Check the daily discount budget                 → 422              │
//! │  5. Persist the audit record                        → 500             │
//! │  6. Swap the overridden line into the draft                            │
//! │                                                                         │
//! │  Order matters: the draft is only mutated after the audit record is    │
//! │  durably stored, and a validation failure leaves no trace anywhere.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::State;
use axum::Json;
use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::SharedState;
use salon_core::pricing::request_override;
use salon_core::{ApprovalTier, BillLineItem, CoreError, Money, OverrideReason, PriceOverride};

// =============================================================================
// DTOs
// =============================================================================

/// Request body for an override.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    pub booking_id: String,
    pub service_id: String,
    pub new_price_paise: i64,
    pub reason_code: OverrideReason,
    pub reason_text: Option<String>,
    /// Raw PIN input; digits are extracted server-side.
    pub pin: Option<String>,
    /// Operator confirming the override.
    pub approved_by: String,
}

/// Response: the audit record and the updated line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideResponse {
    #[serde(rename = "override")]
    pub record: PriceOverride,
    pub item: BillLineItem,
    pub tier: ApprovalTier,
    pub needs_approval: bool,
}

// =============================================================================
// Handler
// =============================================================================

/// Applies a manager-gated price override to one draft line.
pub async fn create_override(
    State(state): State<SharedState>,
    Json(req): Json<OverrideRequest>,
) -> Result<Json<OverrideResponse>, ApiError> {
    debug!(
        booking_id = %req.booking_id,
        service_id = %req.service_id,
        new_price_paise = req.new_price_paise,
        reason_code = ?req.reason_code,
        "create_override"
    );

    // 1. The line must be on the booking's draft.
    let item = state
        .drafts
        .with_draft(&req.booking_id, |draft| {
            draft.and_then(|d| d.find_item(&req.service_id).cloned())
        })
        .ok_or_else(|| ApiError::not_found("Draft line", &req.service_id))?;

    let tenant_id = state.config.tenant_id.clone();
    let rules = state.db.tenant().approval_rules_or_default(&tenant_id).await?;

    // 2. Pure validation, classification, and record construction. A
    //    failure here has touched nothing.
    let now = Utc::now();
    let approved = request_override(
        &item,
        &req.booking_id,
        Money::from_paise(req.new_price_paise),
        req.reason_code,
        req.reason_text.as_deref(),
        req.pin.as_deref(),
        &req.approved_by,
        &rules,
        now,
    )?;

    // 3. Verify the PIN against the enrolled credential for the tier.
    if let Some(pin) = &approved.sanitized_pin {
        state
            .authorizer
            .verify(&tenant_id, approved.classification.tier, pin)
            .await?;
    }

    // 4. Daily discount budget, measured over the audit trail since UTC
    //    midnight. Checked before the insert so a rejected override leaves
    //    no record.
    let this_discount = approved.record.discount_amount().paise();
    if rules.max_discount_per_day_paise > 0 && this_discount > 0 {
        let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let granted_today = state
            .db
            .overrides()
            .discount_total_since(&tenant_id, midnight)
            .await?;

        if granted_today + this_discount > rules.max_discount_per_day_paise {
            return Err(CoreError::DailyLimitExceeded {
                limit_paise: rules.max_discount_per_day_paise,
                attempted_paise: granted_today + this_discount,
            }
            .into());
        }
    }

    // 5. Persist the audit record first...
    state.db.overrides().insert(&tenant_id, &approved.record).await?;

    // 6. ...and only then swap the line into the draft.
    let apply_result = state
        .drafts
        .with_draft_mut(&req.booking_id, |draft| draft.apply_override(approved.item.clone()));
    if let Err(e) = apply_result {
        // The draft vanished between validation and now. The audit record
        // stays (it documents an approved decision); the caller sees the
        // draft error.
        warn!(booking_id = %req.booking_id, error = %e, "Draft changed during override");
        return Err(ApiError::validation(e));
    }

    info!(
        override_id = %approved.record.id,
        booking_id = %req.booking_id,
        discount_bps = approved.record.discount_bps,
        tier = %approved.record.tier,
        "Price override applied"
    );

    Ok(Json(OverrideResponse {
        tier: approved.classification.tier,
        needs_approval: approved.classification.needs_approval,
        record: approved.record,
        item: approved.item,
    }))
}
