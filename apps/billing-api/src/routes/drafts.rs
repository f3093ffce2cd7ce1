//! # Draft Bill Endpoints
//!
//! The front desk assembles a bill here: add service lines, inspect the
//! running draft, remove lines, or abandon the whole thing. Nothing is
//! durable until checkout (`POST /billing/bills`).

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::DraftBill;
use crate::error::ApiError;
use crate::state::SharedState;
use salon_core::validation::{validate_price_paise, validate_quantity};
use salon_core::{BillLineItem, CoreError, Money};

// =============================================================================
// DTOs
// =============================================================================

/// Request body for adding a service line to a draft.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub service_id: String,
    pub service_name: String,
    pub price_paise: i64,
    pub staff_id: String,
    /// Defaults to 1.
    pub quantity: Option<i64>,
}

/// Draft contents plus running totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub booking_id: String,
    pub items: Vec<BillLineItem>,
    pub item_count: usize,
    pub subtotal_paise: i64,
}

impl From<&DraftBill> for DraftResponse {
    fn from(draft: &DraftBill) -> Self {
        DraftResponse {
            booking_id: draft.booking_id.clone(),
            items: draft.items.clone(),
            item_count: draft.item_count(),
            subtotal_paise: draft.subtotal_paise(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Adds a service line to a booking's draft, creating the draft if needed.
pub async fn add_item(
    State(state): State<SharedState>,
    Path(booking_id): Path<String>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<DraftResponse>, ApiError> {
    debug!(booking_id = %booking_id, service_id = %req.service_id, "add draft item");

    let quantity = req.quantity.unwrap_or(1);
    validate_quantity(quantity).map_err(CoreError::from)?;
    validate_price_paise(req.price_paise).map_err(CoreError::from)?;

    if req.service_id.trim().is_empty() || req.staff_id.trim().is_empty() {
        return Err(ApiError::validation("service_id and staff_id are required"));
    }

    let item = BillLineItem::new(
        req.service_id,
        req.service_name,
        Money::from_paise(req.price_paise),
        req.staff_id,
        quantity,
    );

    let result = state.drafts.with_draft_mut(&booking_id, |draft| {
        draft.add_item(item)?;
        Ok::<DraftResponse, String>(DraftResponse::from(&*draft))
    });

    result.map(Json).map_err(ApiError::validation)
}

/// Returns a booking's current draft.
pub async fn get_draft(
    State(state): State<SharedState>,
    Path(booking_id): Path<String>,
) -> Result<Json<DraftResponse>, ApiError> {
    debug!(booking_id = %booking_id, "get draft");

    state
        .drafts
        .with_draft(&booking_id, |draft| draft.map(DraftResponse::from))
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Draft", &booking_id))
}

/// Removes one service line from a draft.
pub async fn remove_item(
    State(state): State<SharedState>,
    Path((booking_id, service_id)): Path<(String, String)>,
) -> Result<Json<DraftResponse>, ApiError> {
    debug!(booking_id = %booking_id, service_id = %service_id, "remove draft item");

    let result = state.drafts.with_draft_mut(&booking_id, |draft| {
        draft.remove_item(&service_id)?;
        Ok::<DraftResponse, String>(DraftResponse::from(&*draft))
    });

    result.map(Json).map_err(ApiError::validation)
}

/// Abandons a booking's draft entirely.
pub async fn clear_draft(
    State(state): State<SharedState>,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(booking_id = %booking_id, "clear draft");

    let removed = state.drafts.remove(&booking_id).is_some();
    Ok(Json(serde_json::json!({ "cleared": removed })))
}
