//! Repository layer for database operations
//!
//! CRUD operations for every entity, grouped by area in submodules.
//! Balance mutations always run inside a single SQLite transaction.

mod achievements;
mod goals;
mod learning;
mod rules;
mod shop;

pub use achievements::{BadgeRow, NewQuizResult};

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::path::Path;
use uuid::Uuid;

/// Ledger rows joined with rule name, rule category and cancellation state
const TRANSACTION_ENTRY_SELECT: &str = r#"
    SELECT t.id, t.rule_id, r.name AS rule_name, r.category AS rule_category,
           t.amount, t.balance_after, t.note, t.created_by, t.reverses_id,
           EXISTS (SELECT 1 FROM point_transactions c WHERE c.reverses_id = t.id) AS is_cancelled,
           t.created_at
    FROM point_transactions t
    LEFT JOIN point_rules r ON r.id = t.rule_id
"#;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Profile =====

    /// Create the child profile if it does not exist yet
    pub async fn ensure_profile(&self, name: &str) -> Result<Profile> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO profile (id, name, current_points, created_at, updated_at)
            VALUES (1, ?, 0, ?, ?)
            "#,
        )
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_profile().await
    }

    pub async fn get_profile(&self) -> Result<Profile> {
        sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ProfileMissing)
    }

    pub async fn get_balance(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT current_points FROM profile WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ProfileMissing)
    }

    // ===== Ledger =====

    /// Apply a signed change to the balance and append the ledger row atomically
    pub async fn apply_point_change(&self, change: &NewPointChange) -> Result<PointTransaction> {
        let mut tx = self.pool.begin().await?;
        let transaction = write_point_change(&mut *tx, change).await?;
        tx.commit().await?;

        tracing::debug!(
            "Applied point change {} -> balance {} (transaction {})",
            transaction.amount,
            transaction.balance_after,
            transaction.id
        );
        Ok(transaction)
    }

    pub async fn get_transaction(&self, id: i64) -> Result<PointTransaction> {
        sqlx::query_as::<_, PointTransaction>("SELECT * FROM point_transactions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::TransactionNotFound(id))
    }

    /// Append a reversing row for `id`. The original row is left untouched.
    pub async fn cancel_transaction(&self, id: i64, created_by: &str) -> Result<PointTransaction> {
        let mut tx = self.pool.begin().await?;

        // Take the write lock before reading so a concurrent cancel waits
        // on busy_timeout and then sees our reversal.
        sqlx::query("UPDATE profile SET current_points = current_points WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        let original =
            sqlx::query_as::<_, PointTransaction>("SELECT * FROM point_transactions WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(AppError::TransactionNotFound(id))?;

        if original.reverses_id.is_some() {
            return Err(AppError::AlreadyCancelled(id));
        }

        let already: Option<i64> =
            sqlx::query_scalar("SELECT id FROM point_transactions WHERE reverses_id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if already.is_some() {
            return Err(AppError::AlreadyCancelled(id));
        }

        let original_note = original
            .note
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("ID {}", id));

        let change = NewPointChange {
            amount: -original.amount,
            note: Some(format!("취소: {}", original_note)),
            rule_id: None,
            created_by: created_by.to_string(),
            reverses_id: Some(id),
        };
        let reversal = write_point_change(&mut *tx, &change).await?;
        tx.commit().await?;

        tracing::debug!("Cancelled transaction {} with {}", id, reversal.id);
        Ok(reversal)
    }

    /// Most recent ledger rows, newest first
    pub async fn list_transactions(&self, limit: i64) -> Result<Vec<TransactionEntry>> {
        let query = format!(
            "{} ORDER BY t.created_at DESC, t.id DESC LIMIT ?",
            TRANSACTION_ENTRY_SELECT
        );
        let entries = sqlx::query_as::<_, TransactionEntry>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Ledger rows created at or after `since` (all rows when `None`), oldest first
    pub async fn transactions_since(
        &self,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionEntry>> {
        let entries = match since {
            Some(since) => {
                let query = format!(
                    "{} WHERE t.created_at >= ? ORDER BY t.created_at ASC, t.id ASC",
                    TRANSACTION_ENTRY_SELECT
                );
                sqlx::query_as::<_, TransactionEntry>(&query)
                    .bind(since)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query = format!(
                    "{} ORDER BY t.created_at ASC, t.id ASC",
                    TRANSACTION_ENTRY_SELECT
                );
                sqlx::query_as::<_, TransactionEntry>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(entries)
    }

    /// Sum of every positive ledger amount
    pub async fn total_earned(&self) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM point_transactions WHERE amount > 0",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    /// Creation timestamps of every ledger row
    pub async fn transaction_timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let stamps = sqlx::query_scalar("SELECT created_at FROM point_transactions")
            .fetch_all(&self.pool)
            .await?;

        Ok(stamps)
    }

    // ===== Backups =====

    /// Write a consistent copy of the live database to `path`
    pub async fn snapshot_into(&self, path: &Path) -> Result<()> {
        sqlx::query("VACUUM INTO ?")
            .bind(path.to_string_lossy().to_string())
            .execute(&self.pool)
            .await?;

        tracing::debug!("Database snapshot written to {:?}", path);
        Ok(())
    }

    /// Record a backup
    pub async fn record_backup(&self, path: &str, size: i64, manifest_hash: &str) -> Result<Backup> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let backup = sqlx::query_as::<_, Backup>(
            r#"
            INSERT INTO backups (id, timestamp, path, size, manifest_hash)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(now)
        .bind(path)
        .bind(size)
        .bind(manifest_hash)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Recorded backup: {}", id);
        Ok(backup)
    }

    /// List backups, newest first
    pub async fn list_backups(&self) -> Result<Vec<Backup>> {
        let backups = sqlx::query_as::<_, Backup>("SELECT * FROM backups ORDER BY timestamp DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(backups)
    }
}

/// Add `change.amount` to the balance and append the ledger row on `conn`.
///
/// The profile row is written first so the transaction holds the write lock
/// before the new balance is computed and recorded as `balance_after`.
pub(crate) async fn write_point_change(
    conn: &mut SqliteConnection,
    change: &NewPointChange,
) -> Result<PointTransaction> {
    let now = Utc::now();

    let balance_after: i64 = sqlx::query_scalar(
        r#"
        UPDATE profile
        SET current_points = current_points + ?, updated_at = ?
        WHERE id = 1
        RETURNING current_points
        "#,
    )
    .bind(change.amount)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::ProfileMissing)?;

    let transaction = sqlx::query_as::<_, PointTransaction>(
        r#"
        INSERT INTO point_transactions
            (rule_id, amount, balance_after, note, created_by, reverses_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(change.rule_id)
    .bind(change.amount)
    .bind(balance_after)
    .bind(&change.note)
    .bind(&change.created_by)
    .bind(change.reverses_id)
    .bind(now)
    .fetch_one(&mut *conn)
    .await?;

    Ok(transaction)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::initialize_database;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();
        let repo = Repository::new(pool);
        repo.ensure_profile("주우").await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_ensure_profile_is_idempotent() {
        let repo = create_test_repo().await;

        repo.apply_point_change(&NewPointChange::new(100, "test", "parent"))
            .await
            .unwrap();
        let profile = repo.ensure_profile("다른 이름").await.unwrap();

        assert_eq!(profile.name, "주우");
        assert_eq!(profile.current_points, 100);
    }

    #[tokio::test]
    async fn test_point_change_records_balance_after() {
        let repo = create_test_repo().await;

        let first = repo
            .apply_point_change(&NewPointChange::new(500, "reward", "parent"))
            .await
            .unwrap();
        let second = repo
            .apply_point_change(&NewPointChange::new(-200, "penalty", "parent"))
            .await
            .unwrap();

        assert_eq!(first.balance_after, 500);
        assert_eq!(second.balance_after, 300);
        assert_eq!(repo.get_balance().await.unwrap(), 300);
    }

    #[tokio::test]
    async fn test_cancel_appends_reversal() {
        let repo = create_test_repo().await;

        let original = repo
            .apply_point_change(&NewPointChange::new(700, "숙제 완료", "parent"))
            .await
            .unwrap();
        let reversal = repo.cancel_transaction(original.id, "parent").await.unwrap();

        assert_eq!(reversal.amount, -700);
        assert_eq!(reversal.balance_after, 0);
        assert_eq!(reversal.reverses_id, Some(original.id));
        assert_eq!(reversal.note.as_deref(), Some("취소: 숙제 완료"));

        // Original row is untouched
        let stored = repo.get_transaction(original.id).await.unwrap();
        assert_eq!(stored.amount, 700);
        assert_eq!(stored.balance_after, 700);

        let entries = repo.list_transactions(10).await.unwrap();
        assert_eq!(entries.len(), 2);
        let original_entry = entries.iter().find(|e| e.id == original.id).unwrap();
        assert!(original_entry.is_cancelled);
    }

    #[tokio::test]
    async fn test_cancel_without_note_uses_id() {
        let repo = create_test_repo().await;

        let change = NewPointChange {
            amount: 50,
            note: None,
            rule_id: None,
            created_by: "parent".to_string(),
            reverses_id: None,
        };
        let original = repo.apply_point_change(&change).await.unwrap();
        let reversal = repo.cancel_transaction(original.id, "parent").await.unwrap();

        assert_eq!(
            reversal.note.unwrap(),
            format!("취소: ID {}", original.id)
        );
    }

    #[tokio::test]
    async fn test_cancel_twice_is_rejected() {
        let repo = create_test_repo().await;

        let original = repo
            .apply_point_change(&NewPointChange::new(100, "x", "parent"))
            .await
            .unwrap();
        let reversal = repo.cancel_transaction(original.id, "parent").await.unwrap();

        assert!(matches!(
            repo.cancel_transaction(original.id, "parent").await,
            Err(AppError::AlreadyCancelled(_))
        ));
        assert!(matches!(
            repo.cancel_transaction(reversal.id, "parent").await,
            Err(AppError::AlreadyCancelled(_))
        ));
        assert_eq!(repo.get_balance().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_cancels_reverse_once() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let pool = crate::database::create_pool(&temp_dir.path().join("points.db"))
            .await
            .unwrap();
        let repo = Repository::new(pool);
        repo.ensure_profile("주우").await.unwrap();
        let original = repo
            .apply_point_change(&NewPointChange::new(700, "설거지", "parent"))
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            repo.cancel_transaction(original.id, "엄마"),
            repo.cancel_transaction(original.id, "아빠"),
        );

        let results = [first, second];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(AppError::AlreadyCancelled(id)) if *id == original.id)));
        assert_eq!(repo.get_balance().await.unwrap(), 0);
        repo.pool().close().await;
    }

    #[tokio::test]
    async fn test_cancel_missing_transaction() {
        let repo = create_test_repo().await;

        assert!(matches!(
            repo.cancel_transaction(999, "parent").await,
            Err(AppError::TransactionNotFound(999))
        ));
    }

    #[tokio::test]
    async fn test_total_earned_ignores_spending() {
        let repo = create_test_repo().await;

        for amount in [300, -100, 200] {
            repo.apply_point_change(&NewPointChange::new(amount, "x", "parent"))
                .await
                .unwrap();
        }

        assert_eq!(repo.total_earned().await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_backup_records() {
        let repo = create_test_repo().await;

        repo.record_backup("/tmp/a.zip", 10, "hash-a").await.unwrap();
        repo.record_backup("/tmp/b.zip", 20, "hash-b").await.unwrap();

        let backups = repo.list_backups().await.unwrap();
        assert_eq!(backups.len(), 2);
    }
}
