//! PIN authorization module.
//!
//! The override workflow in salon-core gates on PIN *shape* only. This
//! module is the verification side: the sanitized digits are checked
//! against the tenant's enrolled argon2 hash for the tier that the
//! discount classified into. Plaintext PINs are never stored or compared.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::warn;

use crate::error::ApiError;
use salon_core::policy::ApprovalTier;
use salon_db::PinRepository;

/// Hashes a PIN for enrollment.
pub fn hash_pin(pin: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Failed to hash PIN: {}", e)))
}

/// Verifies PINs against enrolled credentials.
#[derive(Debug, Clone)]
pub struct PinAuthorizer {
    pins: PinRepository,
}

impl PinAuthorizer {
    /// Creates a new authorizer over the PIN credential store.
    pub fn new(pins: PinRepository) -> Self {
        PinAuthorizer { pins }
    }

    /// Verifies a sanitized PIN for the given approval tier.
    ///
    /// ## Behavior
    /// - `none`/`auto` tiers need no verification
    /// - `manager`/`owner` tiers check the PIN against that role's hash
    /// - A tenant with no PIN enrolled for the role passes with a warning
    ///   (bootstrapping mode: the salon has not set up credentials yet)
    ///
    /// A wrong PIN maps to the same authorization error as a missing one,
    /// so a caller cannot probe which PINs exist.
    pub async fn verify(
        &self,
        tenant_id: &str,
        tier: ApprovalTier,
        pin: &str,
    ) -> Result<(), ApiError> {
        let role = match tier {
            ApprovalTier::None | ApprovalTier::Auto => return Ok(()),
            ApprovalTier::Manager => "manager",
            ApprovalTier::Owner => "owner",
        };

        let stored = self.pins.pin_hash(tenant_id, role).await?;

        let Some(stored) = stored else {
            warn!(
                tenant_id = %tenant_id,
                role = %role,
                "No PIN enrolled for role, allowing override without verification"
            );
            return Ok(());
        };

        let parsed = PasswordHash::new(&stored)
            .map_err(|e| ApiError::internal(format!("Stored PIN hash is malformed: {}", e)))?;

        Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .map_err(|_| ApiError::unauthorized(format!("PIN not valid for {} approval", role)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use salon_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_pin_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let authorizer = PinAuthorizer::new(db.pins());

        let hash = hash_pin("4321").unwrap();
        db.pins()
            .set_pin_hash("tenant-1", "manager", &hash)
            .await
            .unwrap();

        // Correct PIN passes
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Manager, "4321")
            .await
            .is_ok());

        // Wrong PIN fails
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Manager, "9999")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_lower_tiers_skip_verification() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let authorizer = PinAuthorizer::new(db.pins());

        assert!(authorizer
            .verify("tenant-1", ApprovalTier::None, "")
            .await
            .is_ok());
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Auto, "")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_unenrolled_tenant_passes_with_warning() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let authorizer = PinAuthorizer::new(db.pins());

        // Nothing enrolled: bootstrapping mode
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Owner, "4321")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_manager_pin_does_not_authorize_owner_tier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let authorizer = PinAuthorizer::new(db.pins());

        db.pins()
            .set_pin_hash("tenant-1", "manager", &hash_pin("4321").unwrap())
            .await
            .unwrap();
        db.pins()
            .set_pin_hash("tenant-1", "owner", &hash_pin("987654").unwrap())
            .await
            .unwrap();

        // The manager PIN against owner-tier verification fails
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Owner, "4321")
            .await
            .is_err());
        assert!(authorizer
            .verify("tenant-1", ApprovalTier::Owner, "987654")
            .await
            .is_ok());
    }
}
