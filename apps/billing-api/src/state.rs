//! Shared application state.
//!
//! One `AppState` per process, wrapped in an `Arc` and handed to every
//! handler through axum's `State` extractor. Handlers take what they need:
//! database repositories, draft storage, the PIN authorizer, the notifier.

use std::sync::Arc;

use crate::auth::PinAuthorizer;
use crate::config::ApiConfig;
use crate::draft::DraftState;
use crate::notify::Notifier;
use salon_db::Database;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database handle (pool + repositories).
    pub db: Database,

    /// In-progress draft bills, one per booking.
    pub drafts: DraftState,

    /// PIN verification against enrolled credentials.
    pub authorizer: PinAuthorizer,

    /// Fire-and-forget suggestion notifications.
    pub notifier: Notifier,

    /// Process configuration.
    pub config: ApiConfig,
}

/// Arc-wrapped state, as stored in the router.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Assembles the application state around a connected database.
    pub fn new(db: Database, config: ApiConfig) -> SharedState {
        let authorizer = PinAuthorizer::new(db.pins());
        Arc::new(AppState {
            db,
            drafts: DraftState::new(),
            authorizer,
            notifier: Notifier::new(),
            config,
        })
    }
}
