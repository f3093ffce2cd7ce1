//! # Error Types
//!
//! Domain-specific error types for salon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  salon-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  salon-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  billing-api errors (in app)                                           │
//! │  └── ApiError         - What HTTP clients see (serialized)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (prices, IDs, thresholds)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message the operator can act on

use thiserror::Error;

use crate::policy::ApprovalTier;
use crate::types::SuggestionStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is recoverable at the caller: the presentation layer
/// surfaces the specific message and the operator retries with corrected
/// input. None of these may be collapsed into a generic failure.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed numeric or string input.
    ///
    /// ## When This Occurs
    /// - Negative base amount handed to GST computation
    /// - A percentage above 100%
    /// - An empty draft handed to bill finalization
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Requested override price falls outside the original price bound.
    ///
    /// ## When This Occurs
    /// - Overriding above the original price (price increases are disallowed)
    /// - A negative override price
    #[error("Invalid override price {new_price_paise}: must be between 0 and {original_price_paise}")]
    InvalidPrice {
        new_price_paise: i64,
        original_price_paise: i64,
    },

    /// Discount justification is missing or too short.
    ///
    /// ## When This Occurs
    /// - A custom reason under the minimum character count
    /// - A tenant requiring reasons for every discount gets none
    /// - An empty staff-suggestion reason
    #[error("A discount reason of at least {min_chars} characters is required")]
    ReasonRequired { min_chars: usize },

    /// Approval is needed but no syntactically valid PIN was supplied.
    ///
    /// The core only gates on PIN *presence and shape*; verifying the PIN
    /// against a stored credential is the authorization collaborator's job.
    #[error("{tier} approval required: supply a PIN of at least 4 digits")]
    AuthorizationRequired { tier: ApprovalTier },

    /// Tenant has staff suggestions switched off.
    #[error("Staff suggestions are disabled for this salon")]
    SuggestionsDisabled,

    /// Suggestion passed its expiry deadline before it could be resolved.
    #[error("Suggestion {id} expired before it was reviewed")]
    SuggestionExpired { id: String },

    /// Suggestion already reached a terminal state.
    ///
    /// ## When This Occurs
    /// - Two managers race to resolve the same suggestion; the loser sees this
    /// - A retry against an already-approved suggestion
    #[error("Suggestion {id} is already {status:?}")]
    AlreadyResolved { id: String, status: SuggestionStatus },

    /// Payment received does not cover the grand total.
    #[error("Insufficient payment: received {received_paise} of {required_paise} paise")]
    InsufficientPayment {
        required_paise: i64,
        received_paise: i64,
    },

    /// The salon's configured daily discount budget would be exceeded.
    #[error("Daily discount limit reached: {attempted_paise} paise requested, {limit_paise} paise allowed per day")]
    DailyLimitExceeded {
        limit_paise: i64,
        attempted_paise: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed PIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Approval thresholds are not strictly ascending.
    #[error("approval thresholds must satisfy 0 <= auto < manager < owner <= 10000, got {auto_bps}/{manager_bps}/{owner_bps}")]
    ThresholdOrdering {
        auto_bps: u32,
        manager_bps: u32,
        owner_bps: u32,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidPrice {
            new_price_paise: 120000,
            original_price_paise: 100000,
        };
        assert_eq!(
            err.to_string(),
            "Invalid override price 120000: must be between 0 and 100000"
        );

        let err = CoreError::InsufficientPayment {
            required_paise: 98950,
            received_paise: 90000,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient payment: received 90000 of 98950 paise"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "reason".to_string(),
        };
        assert_eq!(err.to_string(), "reason is required");

        let err = ValidationError::ThresholdOrdering {
            auto_bps: 2500,
            manager_bps: 1000,
            owner_bps: 5000,
        };
        assert!(err.to_string().contains("2500/1000/5000"));
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reason".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
