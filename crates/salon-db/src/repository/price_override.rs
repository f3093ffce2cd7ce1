//! # Price Override Repository
//!
//! Write-once audit records for confirmed price overrides.
//!
//! There is deliberately no update or delete path in this module: an
//! override row is evidence of a pricing decision, and the daily discount
//! budget is computed from these rows, so they must never change after
//! insertion.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use salon_core::PriceOverride;

/// Repository for price override audit records.
#[derive(Debug, Clone)]
pub struct OverrideRepository {
    pool: SqlitePool,
}

impl OverrideRepository {
    /// Creates a new OverrideRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OverrideRepository { pool }
    }

    /// Persists one override audit record.
    pub async fn insert(&self, tenant_id: &str, record: &PriceOverride) -> DbResult<()> {
        debug!(
            id = %record.id,
            booking_id = %record.booking_id,
            discount_bps = record.discount_bps,
            "Recording price override"
        );

        sqlx::query(
            r#"
            INSERT INTO price_overrides (
                id, tenant_id, booking_id, service_id,
                original_price_paise, new_price_paise, discount_bps,
                tier, reason_code, reason_text,
                approved_by, approved_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&record.id)
        .bind(tenant_id)
        .bind(&record.booking_id)
        .bind(&record.service_id)
        .bind(record.original_price_paise)
        .bind(record.new_price_paise)
        .bind(record.discount_bps)
        .bind(record.tier)
        .bind(record.reason_code)
        .bind(&record.reason_text)
        .bind(&record.approved_by)
        .bind(record.approved_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an override record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PriceOverride>> {
        let record = sqlx::query_as::<_, PriceOverride>(
            r#"
            SELECT
                id, booking_id, service_id,
                original_price_paise, new_price_paise, discount_bps,
                tier, reason_code, reason_text,
                approved_by, approved_at
            FROM price_overrides
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Lists all override records for a booking, oldest first.
    pub async fn list_for_booking(&self, booking_id: &str) -> DbResult<Vec<PriceOverride>> {
        let records = sqlx::query_as::<_, PriceOverride>(
            r#"
            SELECT
                id, booking_id, service_id,
                original_price_paise, new_price_paise, discount_bps,
                tier, reason_code, reason_text,
                approved_by, approved_at
            FROM price_overrides
            WHERE booking_id = ?1
            ORDER BY approved_at
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Sums the discount amounts (original minus new price, in paise) the
    /// tenant has granted since the cutoff. Feeds the daily budget check.
    pub async fn discount_total_since(
        &self,
        tenant_id: &str,
        since: DateTime<Utc>,
    ) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(original_price_paise - new_price_paise)
            FROM price_overrides
            WHERE tenant_id = ?1 AND approved_at >= ?2
            "#,
        )
        .bind(tenant_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(total.unwrap_or(0))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::{Duration, Utc};
    use salon_core::{ApprovalTier, OverrideReason, PriceOverride};
    use uuid::Uuid;

    fn record(booking_id: &str, original: i64, new: i64) -> PriceOverride {
        PriceOverride {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            service_id: "svc-1".to_string(),
            original_price_paise: original,
            new_price_paise: new,
            discount_bps: 1500,
            tier: ApprovalTier::Manager,
            reason_code: OverrideReason::Loyalty,
            reason_text: Some("regular client".to_string()),
            approved_by: "mgr-1".to_string(),
            approved_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.overrides();

        let r = record("booking-1", 100000, 85000);
        repo.insert("tenant-1", &r).await.unwrap();

        let fetched = repo.get_by_id(&r.id).await.unwrap().unwrap();
        assert_eq!(fetched.new_price_paise, 85000);
        assert_eq!(fetched.tier, ApprovalTier::Manager);
        assert_eq!(fetched.reason_code, OverrideReason::Loyalty);
    }

    #[tokio::test]
    async fn test_list_for_booking() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.overrides();

        repo.insert("tenant-1", &record("booking-1", 100000, 85000))
            .await
            .unwrap();
        repo.insert("tenant-1", &record("booking-1", 50000, 45000))
            .await
            .unwrap();
        repo.insert("tenant-1", &record("booking-2", 30000, 30000))
            .await
            .unwrap();

        let records = repo.list_for_booking("booking-1").await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_discount_total_since() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.overrides();

        // ₹150 + ₹50 of discount today
        repo.insert("tenant-1", &record("booking-1", 100000, 85000))
            .await
            .unwrap();
        repo.insert("tenant-1", &record("booking-2", 50000, 45000))
            .await
            .unwrap();
        // Another tenant's discount must not count
        repo.insert("tenant-2", &record("booking-3", 50000, 0))
            .await
            .unwrap();

        let cutoff = Utc::now() - Duration::hours(1);
        let total = repo.discount_total_since("tenant-1", cutoff).await.unwrap();
        assert_eq!(total, 20000);

        // A future cutoff sees nothing
        let future = Utc::now() + Duration::hours(1);
        let total = repo.discount_total_since("tenant-1", future).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_schema_rejects_price_increase() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.overrides();

        // new above original violates the CHECK constraint
        let bad = record("booking-1", 100000, 120000);
        assert!(repo.insert("tenant-1", &bad).await.is_err());
    }
}
