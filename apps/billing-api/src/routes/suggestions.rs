//! # Staff Suggestion Endpoints
//!
//! Submission and asynchronous resolution of staff-proposed concessions.
//! Every response presents *effective* status: a pending row past its
//! deadline reads as expired, whatever the database still says.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::SharedState;
use salon_core::suggestion::{submit, NewSuggestion};
use salon_core::{Money, StaffSuggestion, SuggestionType};
use salon_db::ResolveOutcome;

// =============================================================================
// DTOs
// =============================================================================

/// Request body for filing a suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub booking_id: String,
    pub staff_id: String,
    pub suggestion_type: SuggestionType,
    pub original_price_paise: i64,
    pub suggested_price_paise: i64,
    pub reason: String,
}

/// Query parameters for listing suggestions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub booking_id: String,
}

/// Request body for approving a suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub approver_id: String,
}

/// Request body for rejecting a suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequest {
    pub approver_id: String,
    pub rejection_reason: Option<String>,
}

/// List response wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionList {
    pub suggestions: Vec<StaffSuggestion>,
}

/// Replaces persisted status with effective status for presentation.
fn present(mut suggestion: StaffSuggestion) -> StaffSuggestion {
    suggestion.status = suggestion.effective_status(Utc::now());
    suggestion
}

// =============================================================================
// Handlers
// =============================================================================

/// Files a new suggestion for manager review.
pub async fn submit_suggestion(
    State(state): State<SharedState>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<StaffSuggestion>, ApiError> {
    debug!(
        booking_id = %req.booking_id,
        staff_id = %req.staff_id,
        suggestion_type = ?req.suggestion_type,
        "submit_suggestion"
    );

    let tenant_id = state.config.tenant_id.clone();
    let rules = state.db.tenant().approval_rules_or_default(&tenant_id).await?;

    let suggestion = submit(
        NewSuggestion {
            booking_id: req.booking_id,
            staff_id: req.staff_id,
            suggestion_type: req.suggestion_type,
            original_price: Money::from_paise(req.original_price_paise),
            suggested_price: Money::from_paise(req.suggested_price_paise),
            reason: req.reason,
        },
        &rules,
        Utc::now(),
    )?;

    state.db.suggestions().insert(&tenant_id, &suggestion).await?;
    state.notifier.suggestion_pending(&suggestion);

    info!(id = %suggestion.id, expires_at = %suggestion.expires_at, "Suggestion filed");
    Ok(Json(suggestion))
}

/// Lists a booking's suggestions with effective status.
pub async fn list_suggestions(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<SuggestionList>, ApiError> {
    debug!(booking_id = %query.booking_id, "list_suggestions");

    let suggestions = state
        .db
        .suggestions()
        .list_for_booking(&query.booking_id)
        .await?
        .into_iter()
        .map(present)
        .collect();

    Ok(Json(SuggestionList { suggestions }))
}

/// Gets one suggestion with effective status.
pub async fn get_suggestion(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<StaffSuggestion>, ApiError> {
    debug!(id = %id, "get_suggestion");

    let suggestion = state
        .db
        .suggestions()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Suggestion", &id))?;

    Ok(Json(present(suggestion)))
}

/// Approves a pending suggestion.
///
/// Backed by a conditional update: under two racing managers exactly one
/// resolution applies and the loser sees the winner's decision.
pub async fn approve_suggestion(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<ApproveRequest>,
) -> Result<Json<StaffSuggestion>, ApiError> {
    debug!(id = %id, approver = %req.approver_id, "approve_suggestion");

    let outcome = state
        .db
        .suggestions()
        .approve(&id, &req.approver_id, Utc::now())
        .await?;

    finish_resolution(&state, outcome)
}

/// Rejects a pending suggestion, with an optional note for the staff
/// member. Same race semantics as approval.
pub async fn reject_suggestion(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(req): Json<RejectRequest>,
) -> Result<Json<StaffSuggestion>, ApiError> {
    debug!(id = %id, approver = %req.approver_id, "reject_suggestion");

    let outcome = state
        .db
        .suggestions()
        .reject(&id, &req.approver_id, req.rejection_reason.as_deref(), Utc::now())
        .await?;

    finish_resolution(&state, outcome)
}

fn finish_resolution(
    state: &SharedState,
    outcome: ResolveOutcome,
) -> Result<Json<StaffSuggestion>, ApiError> {
    match outcome {
        ResolveOutcome::Applied(row) => {
            state.notifier.suggestion_resolved(&row);
            Ok(Json(row))
        }
        ResolveOutcome::Conflict(row) => Err(row.resolution_conflict().into()),
    }
}
