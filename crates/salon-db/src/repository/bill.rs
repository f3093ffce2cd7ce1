//! # Bill Repository
//!
//! Write-once persistence for finalized bills.
//!
//! A bill and its line items are inserted in a single transaction: either
//! the whole bill lands, or none of it does. There is no update path;
//! re-billing a booking means creating a new bill.

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use salon_core::{Bill, BillLineItem};

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Creates a new BillRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository { pool }
    }

    /// Inserts a finalized bill with its line items, atomically.
    pub async fn insert(&self, bill: &Bill, items: &[BillLineItem]) -> DbResult<()> {
        debug!(
            id = %bill.id,
            booking_id = %bill.booking_id,
            grand_total_paise = bill.grand_total_paise,
            items = items.len(),
            "Inserting bill"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO bills (
                id, tenant_id, booking_id,
                membership_discount_bps, manual_adjustment_paise, gst_bps,
                payment_method, amount_received_paise,
                subtotal_paise, membership_discount_paise, gst_paise,
                grand_total_paise, change_due_paise, loyalty_points_earned,
                negative_total_clamped, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
        )
        .bind(&bill.id)
        .bind(&bill.tenant_id)
        .bind(&bill.booking_id)
        .bind(bill.membership_discount_bps)
        .bind(bill.manual_adjustment_paise)
        .bind(bill.gst_bps)
        .bind(bill.payment_method)
        .bind(bill.amount_received_paise)
        .bind(bill.subtotal_paise)
        .bind(bill.membership_discount_paise)
        .bind(bill.gst_paise)
        .bind(bill.grand_total_paise)
        .bind(bill.change_due_paise)
        .bind(bill.loyalty_points_earned)
        .bind(bill.negative_total_clamped)
        .bind(bill.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO bill_items (
                    id, bill_id, position,
                    service_id, service_name, original_price_paise,
                    staff_id, quantity,
                    override_price_paise, override_reason_code, override_reason_text
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&bill.id)
            .bind(position as i64)
            .bind(&item.service_id)
            .bind(&item.service_name)
            .bind(item.original_price_paise)
            .bind(&item.staff_id)
            .bind(item.quantity)
            .bind(item.override_price_paise)
            .bind(item.override_reason_code)
            .bind(&item.override_reason_text)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %bill.id, grand_total_paise = bill.grand_total_paise, "Bill persisted");
        Ok(())
    }

    /// Gets a bill by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Bill>> {
        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT
                id, tenant_id, booking_id,
                membership_discount_bps, manual_adjustment_paise, gst_bps,
                payment_method, amount_received_paise,
                subtotal_paise, membership_discount_paise, gst_paise,
                grand_total_paise, change_due_paise, loyalty_points_earned,
                negative_total_clamped, created_at
            FROM bills
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bill)
    }

    /// Gets the line items of a bill in their original order.
    pub async fn get_items(&self, bill_id: &str) -> DbResult<Vec<BillLineItem>> {
        let items = sqlx::query_as::<_, BillLineItem>(
            r#"
            SELECT
                service_id, service_name, original_price_paise,
                staff_id, quantity,
                override_price_paise, override_reason_code, override_reason_text
            FROM bill_items
            WHERE bill_id = ?1
            ORDER BY position
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists all bills for a booking, newest first.
    pub async fn list_for_booking(&self, booking_id: &str) -> DbResult<Vec<Bill>> {
        let bills = sqlx::query_as::<_, Bill>(
            r#"
            SELECT
                id, tenant_id, booking_id,
                membership_discount_bps, manual_adjustment_paise, gst_bps,
                payment_method, amount_received_paise,
                subtotal_paise, membership_discount_paise, gst_paise,
                grand_total_paise, change_due_paise, loyalty_points_earned,
                negative_total_clamped, created_at
            FROM bills
            WHERE booking_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bills)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use salon_core::{Bill, BillLineItem, Money, OverrideReason, PaymentMethod};
    use uuid::Uuid;

    fn sample_bill() -> (Bill, Vec<BillLineItem>) {
        let mut discounted =
            BillLineItem::new("svc-1", "Haircut", Money::from_paise(50000), "staff-1", 1);
        discounted.override_price_paise = Some(45000);
        discounted.override_reason_code = Some(OverrideReason::Loyalty);

        let items = vec![
            discounted,
            BillLineItem::new("svc-2", "Head Massage", Money::from_paise(30000), "staff-2", 2),
        ];

        let bill = Bill {
            id: Uuid::new_v4().to_string(),
            tenant_id: "tenant-1".to_string(),
            booking_id: "booking-1".to_string(),
            membership_discount_bps: 0,
            manual_adjustment_paise: 0,
            gst_bps: 500,
            payment_method: PaymentMethod::Upi,
            amount_received_paise: 120000,
            subtotal_paise: 105000,
            membership_discount_paise: 0,
            gst_paise: 5250,
            grand_total_paise: 110250,
            change_due_paise: 9750,
            loyalty_points_earned: 110,
            negative_total_clamped: false,
            created_at: Utc::now(),
        };

        (bill, items)
    }

    #[tokio::test]
    async fn test_insert_and_fetch_with_items() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bills();

        let (bill, items) = sample_bill();
        repo.insert(&bill, &items).await.unwrap();

        let fetched = repo.get_by_id(&bill.id).await.unwrap().unwrap();
        assert_eq!(fetched.grand_total_paise, 110250);
        assert_eq!(fetched.payment_method, PaymentMethod::Upi);
        assert!(!fetched.negative_total_clamped);

        let fetched_items = repo.get_items(&bill.id).await.unwrap();
        assert_eq!(fetched_items.len(), 2);
        // Order preserved, override snapshot intact
        assert_eq!(fetched_items[0].service_id, "svc-1");
        assert_eq!(fetched_items[0].override_price_paise, Some(45000));
        assert_eq!(
            fetched_items[0].override_reason_code,
            Some(OverrideReason::Loyalty)
        );
        assert_eq!(fetched_items[1].quantity, 2);
    }

    #[tokio::test]
    async fn test_duplicate_bill_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bills();

        let (bill, items) = sample_bill();
        repo.insert(&bill, &items).await.unwrap();

        // Same primary key again: the write-once rule holds
        assert!(repo.insert(&bill, &items).await.is_err());
    }

    #[tokio::test]
    async fn test_list_for_booking() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.bills();

        let (bill, items) = sample_bill();
        repo.insert(&bill, &items).await.unwrap();

        let bills = repo.list_for_booking("booking-1").await.unwrap();
        assert_eq!(bills.len(), 1);
        assert!(repo.list_for_booking("booking-2").await.unwrap().is_empty());
    }
}
