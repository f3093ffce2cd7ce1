//! # API Error Type
//!
//! Unified error type for HTTP responses.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow                                           │
//! │                                                                         │
//! │  Client                       Rust Backend                              │
//! │  ──────                       ────────────                              │
//! │                                                                         │
//! │  POST /billing/overrides                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Business error? ── CoreError::ReasonRequired ──┐                │  │
//! │  │         │                                       ▼                │  │
//! │  │  Database error? ── DbError::QueryFailed ───── ApiError ───────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 422 { "code": "REASON_REQUIRED", "message": "A discount..." }   │
//! │                                                                         │
//! │  Every business error keeps its specific code and message so the       │
//! │  operator can correct the input and retry. Only infrastructure         │
//! │  failures are logged and genericized.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use salon_core::CoreError;
use salon_db::DbError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "SUGGESTION_EXPIRED",
///   "message": "Suggestion 7f3a... expired before it was reviewed"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Override price outside the original price bound (400)
    InvalidPrice,

    /// Missing or too-short discount justification (422)
    ReasonRequired,

    /// Missing, malformed, or wrong PIN where approval is needed (401)
    AuthorizationRequired,

    /// Tenant has staff suggestions switched off (403)
    SuggestionsDisabled,

    /// Suggestion expired before it was resolved (409)
    SuggestionExpired,

    /// Suggestion already resolved by someone else (409)
    AlreadyResolved,

    /// Payment does not cover the grand total (422)
    InsufficientPayment,

    /// Daily discount budget exceeded (422)
    DailyLimitExceeded,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// HTTP status for this code.
    fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError | ErrorCode::InvalidPrice => StatusCode::BAD_REQUEST,
            ErrorCode::ReasonRequired
            | ErrorCode::InsufficientPayment
            | ErrorCode::DailyLimitExceeded => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::AuthorizationRequired => StatusCode::UNAUTHORIZED,
            ErrorCode::SuggestionsDisabled => StatusCode::FORBIDDEN,
            ErrorCode::SuggestionExpired | ErrorCode::AlreadyResolved => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Creates an authorization error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::AuthorizationRequired, message)
    }
}

/// Converts business logic errors to API errors.
///
/// Every variant keeps its specific code; the message comes from the
/// error's own Display impl so operator guidance stays in one place.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidInput { .. } => ErrorCode::ValidationError,
            CoreError::InvalidPrice { .. } => ErrorCode::InvalidPrice,
            CoreError::ReasonRequired { .. } => ErrorCode::ReasonRequired,
            CoreError::AuthorizationRequired { .. } => ErrorCode::AuthorizationRequired,
            CoreError::SuggestionsDisabled => ErrorCode::SuggestionsDisabled,
            CoreError::SuggestionExpired { .. } => ErrorCode::SuggestionExpired,
            CoreError::AlreadyResolved { .. } => ErrorCode::AlreadyResolved,
            CoreError::InsufficientPayment { .. } => ErrorCode::InsufficientPayment,
            CoreError::DailyLimitExceeded { .. } => ErrorCode::DailyLimitExceeded,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::CheckViolation { message } => {
                tracing::error!("Check constraint violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid value")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::policy::ApprovalTier;
    use salon_core::SuggestionStatus;

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::ReasonRequired { min_chars: 10 }.into();
        assert_eq!(err.code, ErrorCode::ReasonRequired);

        let err: ApiError = CoreError::AuthorizationRequired {
            tier: ApprovalTier::Manager,
        }
        .into();
        assert_eq!(err.code, ErrorCode::AuthorizationRequired);

        let err: ApiError = CoreError::AlreadyResolved {
            id: "s-1".to_string(),
            status: SuggestionStatus::Approved,
        }
        .into();
        assert_eq!(err.code, ErrorCode::AlreadyResolved);

        let err: ApiError = CoreError::InsufficientPayment {
            required_paise: 100,
            received_paise: 50,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientPayment);
    }

    #[test]
    fn test_specific_message_survives_conversion() {
        let err: ApiError = CoreError::SuggestionExpired {
            id: "s-42".to_string(),
        }
        .into();
        assert!(err.message.contains("s-42"));
    }

    #[test]
    fn test_db_not_found_maps_to_404_shape() {
        let err: ApiError = DbError::not_found("Suggestion", "s-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(err.message.contains("Suggestion"));
    }
}
