//! # Bill Endpoints
//!
//! Checkout turns a booking's draft into a write-once bill: the aggregator
//! computes the totals, the bill and its line items land in one
//! transaction, and the draft is consumed. Re-billing means a new bill.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::SharedState;
use salon_core::bill::finalize_bill;
use salon_core::{Bill, BillLineItem, Money, PaymentMethod, Percent};

// =============================================================================
// DTOs
// =============================================================================

/// Request body for checkout.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub booking_id: String,
    pub payment_method: PaymentMethod,
    pub amount_received_paise: i64,
    /// Defaults to no membership discount.
    pub membership_discount_bps: Option<u32>,
    /// Signed: negative = extra discount, positive = surcharge. Defaults to 0.
    pub manual_adjustment_paise: Option<i64>,
}

/// A finalized bill with its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillResponse {
    pub bill: Bill,
    pub items: Vec<BillLineItem>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Finalizes a booking's draft into a bill.
pub async fn create_bill(
    State(state): State<SharedState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<BillResponse>, ApiError> {
    debug!(
        booking_id = %req.booking_id,
        payment_method = ?req.payment_method,
        amount_received_paise = req.amount_received_paise,
        "create_bill"
    );

    // The draft's lines become the bill, frozen as-is.
    let items = state
        .drafts
        .with_draft(&req.booking_id, |draft| draft.map(|d| d.items.clone()))
        .ok_or_else(|| ApiError::not_found("Draft", &req.booking_id))?;

    let tenant_id = state.config.tenant_id.clone();
    let config = state.db.tenant().billing_config_or_default(&tenant_id).await?;

    let membership = Percent::from_bps(req.membership_discount_bps.unwrap_or(0));
    let adjustment = Money::from_paise(req.manual_adjustment_paise.unwrap_or(0));

    let totals = finalize_bill(
        &items,
        membership,
        adjustment,
        config.gst_rate(),
        Money::from_paise(req.amount_received_paise),
        config.loyalty_paise_per_point,
    )?;

    if totals.negative_total_clamped {
        warn!(
            booking_id = %req.booking_id,
            adjustment_paise = adjustment.paise(),
            "Manual adjustment exceeded the bill; grand total clamped to zero"
        );
    }

    let bill = Bill {
        id: Uuid::new_v4().to_string(),
        tenant_id,
        booking_id: req.booking_id.clone(),
        membership_discount_bps: membership.bps(),
        manual_adjustment_paise: adjustment.paise(),
        gst_bps: config.gst_bps,
        payment_method: req.payment_method,
        amount_received_paise: req.amount_received_paise,
        subtotal_paise: totals.subtotal.paise(),
        membership_discount_paise: totals.membership_discount.paise(),
        gst_paise: totals.gst.paise(),
        grand_total_paise: totals.grand_total.paise(),
        change_due_paise: totals.change_due.paise(),
        loyalty_points_earned: totals.loyalty_points_earned,
        negative_total_clamped: totals.negative_total_clamped,
        created_at: Utc::now(),
    };

    // Bill + items land atomically; the draft is consumed only after.
    state.db.bills().insert(&bill, &items).await?;
    state.drafts.remove(&req.booking_id);

    info!(
        bill_id = %bill.id,
        booking_id = %bill.booking_id,
        grand_total_paise = bill.grand_total_paise,
        loyalty_points = bill.loyalty_points_earned,
        "Bill finalized"
    );

    Ok(Json(BillResponse { bill, items }))
}

/// Fetches a finalized bill with its line items.
pub async fn get_bill(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<BillResponse>, ApiError> {
    debug!(id = %id, "get_bill");

    let bill = state
        .db
        .bills()
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bill", &id))?;

    let items = state.db.bills().get_items(&id).await?;

    Ok(Json(BillResponse { bill, items }))
}
