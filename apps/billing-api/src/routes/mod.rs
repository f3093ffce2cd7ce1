//! # Route Layer
//!
//! One module per resource, each a thin shell: load state, call the core,
//! persist, map errors.
//!
//! ## Endpoint Map
//! ```text
//! GET    /health
//!
//! GET    /billing/rules                                  tenant approval rules
//! PUT    /billing/rules                                  administrative upsert
//! GET    /billing/config                                 GST + loyalty config
//! PUT    /billing/config
//! PUT    /billing/pins                                   enroll manager/owner PIN
//!
//! POST   /billing/drafts/{booking_id}/items              add service line
//! GET    /billing/drafts/{booking_id}                    inspect draft
//! DELETE /billing/drafts/{booking_id}/items/{service_id} remove line
//! DELETE /billing/drafts/{booking_id}                    abandon draft
//!
//! POST   /billing/overrides                              price override workflow
//!
//! POST   /billing/suggestions                            file suggestion
//! GET    /billing/suggestions?bookingId=                 list with effective status
//! GET    /billing/suggestions/{id}
//! POST   /billing/suggestions/{id}/approve
//! POST   /billing/suggestions/{id}/reject
//!
//! POST   /billing/bills                                  checkout
//! GET    /billing/bills/{id}
//! ```

pub mod bills;
pub mod drafts;
pub mod health;
pub mod overrides;
pub mod rules;
pub mod suggestions;

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::state::SharedState;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/billing/rules", get(rules::get_rules).put(rules::update_rules))
        .route(
            "/billing/config",
            get(rules::get_config).put(rules::update_config),
        )
        .route("/billing/pins", put(rules::enroll_pin))
        .route(
            "/billing/drafts/{booking_id}",
            get(drafts::get_draft).delete(drafts::clear_draft),
        )
        .route("/billing/drafts/{booking_id}/items", post(drafts::add_item))
        .route(
            "/billing/drafts/{booking_id}/items/{service_id}",
            delete(drafts::remove_item),
        )
        .route("/billing/overrides", post(overrides::create_override))
        .route(
            "/billing/suggestions",
            post(suggestions::submit_suggestion).get(suggestions::list_suggestions),
        )
        .route("/billing/suggestions/{id}", get(suggestions::get_suggestion))
        .route(
            "/billing/suggestions/{id}/approve",
            post(suggestions::approve_suggestion),
        )
        .route(
            "/billing/suggestions/{id}/reject",
            post(suggestions::reject_suggestion),
        )
        .route("/billing/bills", post(bills::create_bill))
        .route("/billing/bills/{id}", get(bills::get_bill))
        .with_state(state)
}
