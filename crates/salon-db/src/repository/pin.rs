//! # PIN Credential Repository
//!
//! Storage for manager/owner authorization PINs, kept as argon2 hashes.
//! Hashing and verification happen in the API layer's authorizer; this
//! module only moves opaque hash strings.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Repository for PIN credential storage.
#[derive(Debug, Clone)]
pub struct PinRepository {
    pool: SqlitePool,
}

impl PinRepository {
    /// Creates a new PinRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PinRepository { pool }
    }

    /// Fetches the stored PIN hash for a tenant role, if enrolled.
    ///
    /// `role` is "manager" or "owner".
    pub async fn pin_hash(&self, tenant_id: &str, role: &str) -> DbResult<Option<String>> {
        let hash: Option<String> = sqlx::query_scalar(
            r#"
            SELECT pin_hash FROM staff_pins
            WHERE tenant_id = ?1 AND role = ?2
            "#,
        )
        .bind(tenant_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    /// Enrolls or replaces the PIN hash for a tenant role.
    pub async fn set_pin_hash(&self, tenant_id: &str, role: &str, pin_hash: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO staff_pins (tenant_id, role, pin_hash, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (tenant_id, role) DO UPDATE SET
                pin_hash = excluded.pin_hash,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(role)
        .bind(pin_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(tenant_id = %tenant_id, role = %role, "PIN enrolled");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
