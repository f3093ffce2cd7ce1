//! # Validation Module
//!
//! Input validation utilities for billing operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty, length, digit-only PIN field)         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: re-validation of everything the client claims        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK constraints                                                 │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Client-side checks are decoration; the server re-validates all of it. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, PIN_MAX_DIGITS, PIN_MIN_DIGITS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// PIN Handling
// =============================================================================

/// Normalizes raw PIN input: strips every non-digit character, then keeps
/// at most [`PIN_MAX_DIGITS`] digits.
///
/// Sanitization happens BEFORE length validation, so "1 2 3 4" and
/// "12-34" both normalize to "1234".
///
/// ## Example
/// ```rust
/// use salon_core::validation::sanitize_pin;
///
/// assert_eq!(sanitize_pin(" 12-34 "), "1234");
/// assert_eq!(sanitize_pin("12345678"), "123456"); // truncated to 6
/// ```
pub fn sanitize_pin(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PIN_MAX_DIGITS)
        .collect()
}

/// Validates that raw PIN input contains a usable PIN and returns the
/// sanitized digits.
///
/// ## Rules
/// - After stripping non-digits and truncating to [`PIN_MAX_DIGITS`],
///   at least [`PIN_MIN_DIGITS`] digits must remain
///
/// This checks *shape only*. Whether the PIN belongs to a principal with
/// the required role is the authorization collaborator's decision.
pub fn validate_pin(raw: &str) -> ValidationResult<String> {
    let pin = sanitize_pin(raw);

    if pin.len() < PIN_MIN_DIGITS {
        return Err(ValidationError::TooShort {
            field: "pin".to_string(),
            min: PIN_MIN_DIGITS,
        });
    }

    Ok(pin)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a justification text against a minimum length.
///
/// ## Rules
/// - Leading/trailing whitespace does not count
/// - Must be at least `min_chars` characters after trimming
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_reason;
///
/// assert!(validate_reason("regular client, 5th visit", 10).is_ok());
/// assert!(validate_reason("discount", 10).is_err()); // 8 chars: one-word excuse
/// ```
pub fn validate_reason(reason: &str, min_chars: usize) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "reason".to_string(),
        });
    }

    if reason.chars().count() < min_chars {
        return Err(ValidationError::TooShort {
            field: "reason".to_string(),
            min: min_chars,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in paise.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary services)
pub fn validate_price_paise(paise: i64) -> ValidationResult<()> {
    if paise < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a percentage in basis points (0% to 100%).
pub fn validate_percent_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "percent".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Approval Rules Validator
// =============================================================================

/// Validates the threshold ordering invariant and field ranges of a rules
/// update before it replaces the stored configuration.
///
/// ## Rules
/// - `0 <= auto < manager < owner <= 10000`
/// - `suggestion_expiry_minutes >= 1`
/// - `max_discount_per_day_paise >= 0`
pub fn validate_approval_rules(
    auto_bps: u32,
    manager_bps: u32,
    owner_bps: u32,
    max_discount_per_day_paise: i64,
    suggestion_expiry_minutes: i64,
) -> ValidationResult<()> {
    if !(auto_bps < manager_bps && manager_bps < owner_bps && owner_bps <= 10000) {
        return Err(ValidationError::ThresholdOrdering {
            auto_bps,
            manager_bps,
            owner_bps,
        });
    }

    if suggestion_expiry_minutes < 1 {
        return Err(ValidationError::OutOfRange {
            field: "suggestion_expiry_minutes".to_string(),
            min: 1,
            max: i64::MAX,
        });
    }

    if max_discount_per_day_paise < 0 {
        return Err(ValidationError::MustBePositive {
            field: "max_discount_per_day".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_pin() {
        assert_eq!(sanitize_pin("1234"), "1234");
        assert_eq!(sanitize_pin(" 12-34 "), "1234");
        assert_eq!(sanitize_pin("1a2b3c4d"), "1234");
        // Truncates after sanitizing, keeping the first six digits
        assert_eq!(sanitize_pin("12345678"), "123456");
        assert_eq!(sanitize_pin("1-2-3-4-5-6-7"), "123456");
        assert_eq!(sanitize_pin("abc"), "");
    }

    #[test]
    fn test_validate_pin() {
        assert_eq!(validate_pin("1234").unwrap(), "1234");
        assert_eq!(validate_pin("123456").unwrap(), "123456");
        // Strips before checking length
        assert_eq!(validate_pin("12 34").unwrap(), "1234");

        assert!(validate_pin("").is_err());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12a3").is_err()); // only 3 digits survive
    }

    #[test]
    fn test_validate_reason() {
        assert!(validate_reason("regular client, 5th visit", 10).is_ok());
        assert!(validate_reason("exactly 10", 10).is_ok());
        assert!(validate_reason("", 1).is_err());
        assert!(validate_reason("   ", 1).is_err());
        assert!(validate_reason("too short", 10).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price_paise() {
        assert!(validate_price_paise(0).is_ok());
        assert!(validate_price_paise(109900).is_ok());
        assert!(validate_price_paise(-100).is_err());
    }

    #[test]
    fn test_validate_approval_rules_ordering() {
        assert!(validate_approval_rules(1000, 2500, 5000, 500_000, 30).is_ok());

        // Equal thresholds break strict ascension
        assert!(validate_approval_rules(1000, 1000, 5000, 500_000, 30).is_err());
        // Descending
        assert!(validate_approval_rules(2500, 1000, 5000, 500_000, 30).is_err());
        // Owner above 100%
        assert!(validate_approval_rules(1000, 2500, 10001, 500_000, 30).is_err());
        // Zero expiry window
        assert!(validate_approval_rules(1000, 2500, 5000, 500_000, 0).is_err());
        // Negative daily budget
        assert!(validate_approval_rules(1000, 2500, 5000, -1, 30).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
