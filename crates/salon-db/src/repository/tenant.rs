//! # Tenant Configuration Repository
//!
//! Database operations for per-tenant approval rules and billing
//! configuration. Both are replace-only: the administrative upsert swaps
//! the whole row, nothing ever deletes one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use salon_core::{ApprovalRules, BillingConfig};

/// Repository for tenant configuration.
#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: SqlitePool,
}

impl TenantRepository {
    /// Creates a new TenantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TenantRepository { pool }
    }

    // =========================================================================
    // Approval Rules
    // =========================================================================

    /// Fetches the tenant's approval rules, if configured.
    pub async fn approval_rules(&self, tenant_id: &str) -> DbResult<Option<ApprovalRules>> {
        let rules = sqlx::query_as::<_, ApprovalRules>(
            r#"
            SELECT
                tenant_id,
                auto_approve_bps,
                manager_approval_bps,
                owner_approval_bps,
                max_discount_per_day_paise,
                require_reason_for_discount,
                allow_staff_suggestions,
                suggestion_expiry_minutes,
                updated_at
            FROM approval_rules
            WHERE tenant_id = ?1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rules)
    }

    /// Fetches the tenant's approval rules, seeding the defaults on first
    /// access so every later read sees a configured tenant.
    pub async fn approval_rules_or_default(&self, tenant_id: &str) -> DbResult<ApprovalRules> {
        if let Some(rules) = self.approval_rules(tenant_id).await? {
            return Ok(rules);
        }

        let defaults = ApprovalRules::sensible_defaults(tenant_id);
        self.upsert_approval_rules(&defaults).await?;
        info!(tenant_id = %tenant_id, "Seeded default approval rules");
        Ok(defaults)
    }

    /// Replaces the tenant's approval rules.
    ///
    /// Validation of the threshold ordering happens in the caller before
    /// this runs; the schema CHECK constraints back it up.
    pub async fn upsert_approval_rules(&self, rules: &ApprovalRules) -> DbResult<()> {
        debug!(tenant_id = %rules.tenant_id, "Upserting approval rules");

        sqlx::query(
            r#"
            INSERT INTO approval_rules (
                tenant_id, auto_approve_bps, manager_approval_bps, owner_approval_bps,
                max_discount_per_day_paise, require_reason_for_discount,
                allow_staff_suggestions, suggestion_expiry_minutes, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT (tenant_id) DO UPDATE SET
                auto_approve_bps = excluded.auto_approve_bps,
                manager_approval_bps = excluded.manager_approval_bps,
                owner_approval_bps = excluded.owner_approval_bps,
                max_discount_per_day_paise = excluded.max_discount_per_day_paise,
                require_reason_for_discount = excluded.require_reason_for_discount,
                allow_staff_suggestions = excluded.allow_staff_suggestions,
                suggestion_expiry_minutes = excluded.suggestion_expiry_minutes,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&rules.tenant_id)
        .bind(rules.auto_approve_bps)
        .bind(rules.manager_approval_bps)
        .bind(rules.owner_approval_bps)
        .bind(rules.max_discount_per_day_paise)
        .bind(rules.require_reason_for_discount)
        .bind(rules.allow_staff_suggestions)
        .bind(rules.suggestion_expiry_minutes)
        .bind(rules.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Billing Config
    // =========================================================================

    /// Fetches the tenant's billing configuration, if configured.
    pub async fn billing_config(&self, tenant_id: &str) -> DbResult<Option<BillingConfig>> {
        let config = sqlx::query_as::<_, BillingConfig>(
            r#"
            SELECT tenant_id, gst_bps, loyalty_paise_per_point, updated_at
            FROM billing_config
            WHERE tenant_id = ?1
            "#,
        )
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    /// Fetches the tenant's billing configuration, seeding the defaults
    /// (5% GST, one point per ₹10) on first access.
    pub async fn billing_config_or_default(&self, tenant_id: &str) -> DbResult<BillingConfig> {
        if let Some(config) = self.billing_config(tenant_id).await? {
            return Ok(config);
        }

        let defaults = BillingConfig::sensible_defaults(tenant_id);
        self.upsert_billing_config(&defaults).await?;
        info!(tenant_id = %tenant_id, "Seeded default billing config");
        Ok(defaults)
    }

    /// Replaces the tenant's billing configuration.
    pub async fn upsert_billing_config(&self, config: &BillingConfig) -> DbResult<()> {
        debug!(tenant_id = %config.tenant_id, gst_bps = config.gst_bps, "Upserting billing config");

        sqlx::query(
            r#"
            INSERT INTO billing_config (tenant_id, gst_bps, loyalty_paise_per_point, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (tenant_id) DO UPDATE SET
                gst_bps = excluded.gst_bps,
                loyalty_paise_per_point = excluded.loyalty_paise_per_point,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&config.tenant_id)
        .bind(config.gst_bps)
        .bind(config.loyalty_paise_per_point)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use salon_core::ApprovalRules;

    #[tokio::test]
    async fn test_rules_roundtrip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tenant();

        assert!(repo.approval_rules("tenant-1").await.unwrap().is_none());

        let mut rules = ApprovalRules::sensible_defaults("tenant-1");
        rules.auto_approve_bps = 500;
        repo.upsert_approval_rules(&rules).await.unwrap();

        let fetched = repo.approval_rules("tenant-1").await.unwrap().unwrap();
        assert_eq!(fetched.auto_approve_bps, 500);
        assert_eq!(fetched.manager_approval_bps, rules.manager_approval_bps);
        assert!(fetched.allow_staff_suggestions);
    }

    #[tokio::test]
    async fn test_rules_upsert_replaces() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tenant();

        let mut rules = ApprovalRules::sensible_defaults("tenant-1");
        repo.upsert_approval_rules(&rules).await.unwrap();

        rules.manager_approval_bps = 3000;
        rules.require_reason_for_discount = true;
        repo.upsert_approval_rules(&rules).await.unwrap();

        let fetched = repo.approval_rules("tenant-1").await.unwrap().unwrap();
        assert_eq!(fetched.manager_approval_bps, 3000);
        assert!(fetched.require_reason_for_discount);
    }

    #[tokio::test]
    async fn test_defaults_seeded_on_first_access() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.tenant();

        let rules = repo.approval_rules_or_default("tenant-1").await.unwrap();
        assert_eq!(rules.auto_approve_bps, 1000);

        // The seeded row is now durable
        assert!(repo.approval_rules("tenant-1").await.unwrap().is_some());

        let config = repo.billing_config_or_default("tenant-1").await.unwrap();
        assert_eq!(config.gst_bps, 500);
        assert_eq!(config.loyalty_paise_per_point, 1000);
    }
}
