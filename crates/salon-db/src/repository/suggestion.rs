//! # Staff Suggestion Repository
//!
//! Persistence for the suggestion lifecycle, including the conditional
//! update that guarantees at-most-one-resolution.
//!
//! ## Why Conditional Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two managers race to resolve the same suggestion:                     │
//! │                                                                         │
//! │  Manager A: approve ──► UPDATE ... WHERE status = 'pending'  (1 row)   │
//! │  Manager B: reject  ──► UPDATE ... WHERE status = 'pending'  (0 rows)  │
//! │                                                                         │
//! │  The status guard makes the write a compare-and-swap: exactly one      │
//! │  UPDATE matches the pending row. The loser re-reads the row and        │
//! │  reports the winner's decision instead of overwriting it.              │
//! │                                                                         │
//! │  Expiry uses the same mechanism: a lapsed deadline settles the row     │
//! │  to 'expired' first, so a late approval can never match.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use salon_core::{StaffSuggestion, SuggestionStatus};

/// Outcome of a conditional resolution attempt.
#[derive(Debug, Clone)]
pub enum ResolveOutcome {
    /// This caller won the race; the returned row carries the new state.
    Applied(StaffSuggestion),

    /// Someone else resolved the suggestion first (or it expired). The
    /// returned row is what this caller observed; the caller classifies
    /// it into the right conflict error.
    Conflict(StaffSuggestion),
}

/// Repository for staff suggestion database operations.
#[derive(Debug, Clone)]
pub struct SuggestionRepository {
    pool: SqlitePool,
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, booking_id, staff_id, suggestion_type,
        original_price_paise, suggested_price_paise, discount_bps,
        reason, status, created_at, expires_at,
        reviewed_by, reviewed_at, rejection_reason
    FROM staff_suggestions
"#;

impl SuggestionRepository {
    /// Creates a new SuggestionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SuggestionRepository { pool }
    }

    /// Persists a freshly submitted suggestion.
    pub async fn insert(&self, tenant_id: &str, suggestion: &StaffSuggestion) -> DbResult<()> {
        debug!(
            id = %suggestion.id,
            booking_id = %suggestion.booking_id,
            discount_bps = suggestion.discount_bps,
            "Inserting staff suggestion"
        );

        sqlx::query(
            r#"
            INSERT INTO staff_suggestions (
                id, tenant_id, booking_id, staff_id, suggestion_type,
                original_price_paise, suggested_price_paise, discount_bps,
                reason, status, created_at, expires_at,
                reviewed_by, reviewed_at, rejection_reason
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&suggestion.id)
        .bind(tenant_id)
        .bind(&suggestion.booking_id)
        .bind(&suggestion.staff_id)
        .bind(suggestion.suggestion_type)
        .bind(suggestion.original_price_paise)
        .bind(suggestion.suggested_price_paise)
        .bind(suggestion.discount_bps)
        .bind(&suggestion.reason)
        .bind(suggestion.status)
        .bind(suggestion.created_at)
        .bind(suggestion.expires_at)
        .bind(&suggestion.reviewed_by)
        .bind(suggestion.reviewed_at)
        .bind(&suggestion.rejection_reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a suggestion by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StaffSuggestion>> {
        let suggestion =
            sqlx::query_as::<_, StaffSuggestion>(&format!("{} WHERE id = ?1", SELECT_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(suggestion)
    }

    /// Lists all suggestions for a booking, oldest first.
    ///
    /// Rows come back with their *persisted* status; readers present
    /// effective status by re-deriving expiry from `expires_at`.
    pub async fn list_for_booking(&self, booking_id: &str) -> DbResult<Vec<StaffSuggestion>> {
        let suggestions = sqlx::query_as::<_, StaffSuggestion>(&format!(
            "{} WHERE booking_id = ?1 ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(suggestions)
    }

    /// Lists the tenant's pending suggestions (persisted status), oldest
    /// first. Some may be effectively expired; callers re-derive.
    pub async fn list_pending(&self, tenant_id: &str) -> DbResult<Vec<StaffSuggestion>> {
        let suggestions = sqlx::query_as::<_, StaffSuggestion>(&format!(
            "{} WHERE tenant_id = ?1 AND status = 'pending' ORDER BY created_at",
            SELECT_COLUMNS
        ))
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(suggestions)
    }

    /// Attempts to approve a pending, unexpired suggestion.
    ///
    /// Compare-and-swap: succeeds only if the row is still `pending` and
    /// the deadline has not lapsed at the moment of the write.
    pub async fn approve(
        &self,
        id: &str,
        reviewer_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<ResolveOutcome> {
        self.resolve(id, SuggestionStatus::Approved, reviewer_id, None, now)
            .await
    }

    /// Attempts to reject a pending, unexpired suggestion. Same CAS
    /// semantics as [`Self::approve`].
    pub async fn reject(
        &self,
        id: &str,
        reviewer_id: &str,
        rejection_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<ResolveOutcome> {
        self.resolve(id, SuggestionStatus::Rejected, reviewer_id, rejection_reason, now)
            .await
    }

    async fn resolve(
        &self,
        id: &str,
        target: SuggestionStatus,
        reviewer_id: &str,
        rejection_reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> DbResult<ResolveOutcome> {
        // Settle a lapsed deadline first. Also guarded on 'pending', so it
        // never disturbs an already-resolved row.
        sqlx::query(
            r#"
            UPDATE staff_suggestions SET status = 'expired'
            WHERE id = ?1 AND status = 'pending' AND expires_at <= ?2
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        // The compare-and-swap itself: only a still-pending, still-live row
        // can transition.
        let result = sqlx::query(
            r#"
            UPDATE staff_suggestions SET
                status = ?2,
                reviewed_by = ?3,
                reviewed_at = ?4,
                rejection_reason = ?5
            WHERE id = ?1 AND status = 'pending' AND expires_at > ?4
            "#,
        )
        .bind(id)
        .bind(target)
        .bind(reviewer_id)
        .bind(now)
        .bind(rejection_reason)
        .execute(&self.pool)
        .await?;

        let row = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Suggestion", id))?;

        if result.rows_affected() == 1 {
            info!(id = %id, status = ?target, reviewer = %reviewer_id, "Suggestion resolved");
            Ok(ResolveOutcome::Applied(row))
        } else {
            debug!(id = %id, observed = ?row.status, "Suggestion resolution lost the race");
            Ok(ResolveOutcome::Conflict(row))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use salon_core::suggestion::{submit, NewSuggestion};
    use salon_core::{ApprovalRules, Money, SuggestionType};

    fn pending_suggestion(expiry_minutes: i64) -> StaffSuggestion {
        let mut rules = ApprovalRules::sensible_defaults("tenant-1");
        rules.suggestion_expiry_minutes = expiry_minutes;

        submit(
            NewSuggestion {
                booking_id: "booking-1".to_string(),
                staff_id: "staff-1".to_string(),
                suggestion_type: SuggestionType::Discount,
                original_price: Money::from_paise(100000),
                suggested_price: Money::from_paise(80000),
                reason: "regular client, asked politely".to_string(),
            },
            &rules,
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let s = pending_suggestion(30);
        repo.insert("tenant-1", &s).await.unwrap();

        let fetched = repo.get_by_id(&s.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, SuggestionStatus::Pending);
        assert_eq!(fetched.discount_bps, 2000);
        assert_eq!(fetched.suggestion_type, SuggestionType::Discount);
    }

    #[tokio::test]
    async fn test_approve_applies_once() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let s = pending_suggestion(30);
        repo.insert("tenant-1", &s).await.unwrap();

        let outcome = repo.approve(&s.id, "mgr-1", Utc::now()).await.unwrap();
        match outcome {
            ResolveOutcome::Applied(row) => {
                assert_eq!(row.status, SuggestionStatus::Approved);
                assert_eq!(row.reviewed_by.as_deref(), Some("mgr-1"));
            }
            ResolveOutcome::Conflict(_) => panic!("first resolution must apply"),
        }
    }

    /// The loser of an approve/reject race observes the winner's decision
    /// and never overwrites it.
    #[tokio::test]
    async fn test_reject_after_approve_conflicts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let s = pending_suggestion(30);
        repo.insert("tenant-1", &s).await.unwrap();

        let now = Utc::now();
        assert!(matches!(
            repo.approve(&s.id, "mgr-1", now).await.unwrap(),
            ResolveOutcome::Applied(_)
        ));

        match repo.reject(&s.id, "mgr-2", Some("too generous"), now).await.unwrap() {
            ResolveOutcome::Conflict(row) => {
                assert_eq!(row.status, SuggestionStatus::Approved);
                assert_eq!(row.reviewed_by.as_deref(), Some("mgr-1"));
                assert!(row.rejection_reason.is_none());
            }
            ResolveOutcome::Applied(_) => panic!("second resolution must conflict"),
        }
    }

    #[tokio::test]
    async fn test_late_approval_settles_expired() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        // Five minute window, approval arrives six minutes later
        let s = pending_suggestion(5);
        repo.insert("tenant-1", &s).await.unwrap();

        let late = s.created_at + Duration::minutes(6);
        match repo.approve(&s.id, "mgr-1", late).await.unwrap() {
            ResolveOutcome::Conflict(row) => {
                // The lazy-expire write settled the row
                assert_eq!(row.status, SuggestionStatus::Expired);
                assert!(row.reviewed_by.is_none());
            }
            ResolveOutcome::Applied(_) => panic!("late approval must not apply"),
        }
    }

    #[tokio::test]
    async fn test_reject_records_note() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let s = pending_suggestion(30);
        repo.insert("tenant-1", &s).await.unwrap();

        match repo
            .reject(&s.id, "mgr-1", Some("already discounted package"), Utc::now())
            .await
            .unwrap()
        {
            ResolveOutcome::Applied(row) => {
                assert_eq!(row.status, SuggestionStatus::Rejected);
                assert_eq!(row.rejection_reason.as_deref(), Some("already discounted package"));
            }
            ResolveOutcome::Conflict(_) => panic!("first resolution must apply"),
        }
    }

    #[tokio::test]
    async fn test_resolve_missing_id_is_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let err = repo.approve("no-such-id", "mgr-1", Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_for_booking_in_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.suggestions();

        let a = pending_suggestion(30);
        let mut b = pending_suggestion(30);
        b.created_at = a.created_at + Duration::seconds(5);

        repo.insert("tenant-1", &a).await.unwrap();
        repo.insert("tenant-1", &b).await.unwrap();

        let listed = repo.list_for_booking("booking-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[1].id, b.id);
    }
}
