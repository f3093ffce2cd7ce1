//! # Administrative Endpoints
//!
//! Tenant configuration: approval rules, billing config, and PIN
//! enrollment. Rules are replace-only; the threshold ordering invariant is
//! validated before anything touches the database.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::auth::hash_pin;
use crate::error::ApiError;
use crate::state::SharedState;
use salon_core::validation::{validate_approval_rules, validate_percent_bps, validate_pin};
use salon_core::{ApprovalRules, BillingConfig, CoreError};

// =============================================================================
// DTOs
// =============================================================================

/// Request body replacing the tenant's approval rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRulesRequest {
    pub auto_approve_bps: u32,
    pub manager_approval_bps: u32,
    pub owner_approval_bps: u32,
    pub max_discount_per_day_paise: i64,
    pub require_reason_for_discount: bool,
    pub allow_staff_suggestions: bool,
    pub suggestion_expiry_minutes: i64,
}

/// Request body replacing the tenant's billing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfigRequest {
    pub gst_bps: u32,
    pub loyalty_paise_per_point: i64,
}

/// Request body enrolling a manager or owner PIN.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollPinRequest {
    /// "manager" or "owner".
    pub role: String,
    pub pin: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Returns the tenant's approval rules, seeding defaults on first read.
pub async fn get_rules(State(state): State<SharedState>) -> Result<Json<ApprovalRules>, ApiError> {
    debug!("get_rules");

    let rules = state
        .db
        .tenant()
        .approval_rules_or_default(&state.config.tenant_id)
        .await?;

    Ok(Json(rules))
}

/// Replaces the tenant's approval rules.
pub async fn update_rules(
    State(state): State<SharedState>,
    Json(req): Json<UpdateRulesRequest>,
) -> Result<Json<ApprovalRules>, ApiError> {
    debug!(
        auto = req.auto_approve_bps,
        manager = req.manager_approval_bps,
        owner = req.owner_approval_bps,
        "update_rules"
    );

    validate_approval_rules(
        req.auto_approve_bps,
        req.manager_approval_bps,
        req.owner_approval_bps,
        req.max_discount_per_day_paise,
        req.suggestion_expiry_minutes,
    )
    .map_err(CoreError::from)?;

    let rules = ApprovalRules {
        tenant_id: state.config.tenant_id.clone(),
        auto_approve_bps: req.auto_approve_bps,
        manager_approval_bps: req.manager_approval_bps,
        owner_approval_bps: req.owner_approval_bps,
        max_discount_per_day_paise: req.max_discount_per_day_paise,
        require_reason_for_discount: req.require_reason_for_discount,
        allow_staff_suggestions: req.allow_staff_suggestions,
        suggestion_expiry_minutes: req.suggestion_expiry_minutes,
        updated_at: Utc::now(),
    };

    state.db.tenant().upsert_approval_rules(&rules).await?;
    info!(tenant_id = %rules.tenant_id, "Approval rules replaced");

    Ok(Json(rules))
}

/// Returns the tenant's billing configuration, seeding defaults on first
/// read.
pub async fn get_config(State(state): State<SharedState>) -> Result<Json<BillingConfig>, ApiError> {
    debug!("get_config");

    let config = state
        .db
        .tenant()
        .billing_config_or_default(&state.config.tenant_id)
        .await?;

    Ok(Json(config))
}

/// Replaces the tenant's billing configuration.
pub async fn update_config(
    State(state): State<SharedState>,
    Json(req): Json<UpdateConfigRequest>,
) -> Result<Json<BillingConfig>, ApiError> {
    debug!(gst_bps = req.gst_bps, "update_config");

    validate_percent_bps(req.gst_bps).map_err(CoreError::from)?;
    if req.loyalty_paise_per_point <= 0 {
        return Err(ApiError::validation("loyalty accrual rate must be positive"));
    }

    let config = BillingConfig {
        tenant_id: state.config.tenant_id.clone(),
        gst_bps: req.gst_bps,
        loyalty_paise_per_point: req.loyalty_paise_per_point,
        updated_at: Utc::now(),
    };

    state.db.tenant().upsert_billing_config(&config).await?;
    info!(tenant_id = %config.tenant_id, gst_bps = config.gst_bps, "Billing config replaced");

    Ok(Json(config))
}

/// Enrolls (or replaces) the PIN for a role. The PIN is normalized the
/// same way the override workflow normalizes it, then stored as an argon2
/// hash.
pub async fn enroll_pin(
    State(state): State<SharedState>,
    Json(req): Json<EnrollPinRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(role = %req.role, "enroll_pin");

    if req.role != "manager" && req.role != "owner" {
        return Err(ApiError::validation("role must be 'manager' or 'owner'"));
    }

    let pin = validate_pin(&req.pin).map_err(CoreError::from)?;
    let hash = hash_pin(&pin)?;

    state
        .db
        .pins()
        .set_pin_hash(&state.config.tenant_id, &req.role, &hash)
        .await?;

    Ok(Json(serde_json::json!({ "enrolled": req.role })))
}
