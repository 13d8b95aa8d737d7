//! Vocabulary, learning sessions and e-book reading progress

use super::Repository;
use crate::config::MAX_MASTERY_LEVEL;
use crate::database::models::*;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};

impl Repository {
    // ===== Words =====

    pub async fn insert_word(
        &self,
        word: &str,
        meaning: &str,
        category: &str,
        pronunciation: Option<&str>,
        difficulty: Difficulty,
    ) -> Result<EnglishWord> {
        let inserted = sqlx::query_as::<_, EnglishWord>(
            r#"
            INSERT INTO english_words (word, meaning, category, pronunciation, difficulty)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(word)
        .bind(meaning)
        .bind(category)
        .bind(pronunciation)
        .bind(difficulty)
        .fetch_one(self.pool())
        .await?;

        Ok(inserted)
    }

    pub async fn count_words(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM english_words")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    pub async fn get_word(&self, id: i64) -> Result<EnglishWord> {
        sqlx::query_as::<_, EnglishWord>("SELECT * FROM english_words WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AppError::WordNotFound(id))
    }

    pub async fn list_words(
        &self,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Result<Vec<EnglishWord>> {
        let words = sqlx::query_as::<_, EnglishWord>(
            r#"
            SELECT * FROM english_words
            WHERE (?1 IS NULL OR category = ?1)
              AND (?2 IS NULL OR difficulty = ?2)
            ORDER BY category, id
            "#,
        )
        .bind(category)
        .bind(difficulty)
        .fetch_all(self.pool())
        .await?;

        Ok(words)
    }

    pub async fn category_summaries(&self) -> Result<Vec<CategorySummary>> {
        let summaries = sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT w.category AS category,
                   COUNT(*) AS word_count,
                   COUNT(p.word_id) AS learned_count,
                   COALESCE(SUM(CASE WHEN p.mastery_level >= ? THEN 1 ELSE 0 END), 0) AS mastered_count
            FROM english_words w
            LEFT JOIN word_progress p ON p.word_id = w.id
            GROUP BY w.category
            ORDER BY w.category
            "#,
        )
        .bind(MAX_MASTERY_LEVEL)
        .fetch_all(self.pool())
        .await?;

        Ok(summaries)
    }

    // ===== Word progress =====

    /// Count one review. Mastery moves up on a correct answer and down on a
    /// wrong one, clamped to 0..=MAX_MASTERY_LEVEL.
    pub async fn record_word_review(
        &self,
        word_id: i64,
        correct: bool,
        reviewed_at: DateTime<Utc>,
    ) -> Result<WordProgress> {
        let delta: i64 = if correct { 1 } else { -1 };
        let correct_inc: i64 = i64::from(correct);

        let progress = sqlx::query_as::<_, WordProgress>(
            r#"
            INSERT INTO word_progress
                (word_id, mastery_level, review_count, correct_count, last_reviewed_at, created_at)
            VALUES (?1, ?2, 1, ?2, ?3, ?3)
            ON CONFLICT(word_id) DO UPDATE SET
                mastery_level = MAX(0, MIN(?4, mastery_level + ?5)),
                review_count = review_count + 1,
                correct_count = correct_count + ?2,
                last_reviewed_at = ?3
            RETURNING *
            "#,
        )
        .bind(word_id)
        .bind(correct_inc)
        .bind(reviewed_at)
        .bind(MAX_MASTERY_LEVEL)
        .bind(delta)
        .fetch_one(self.pool())
        .await?;

        tracing::debug!(
            "Word {} reviewed (correct: {}), mastery {}",
            word_id,
            correct,
            progress.mastery_level
        );
        Ok(progress)
    }

    pub async fn list_word_progress(&self) -> Result<Vec<WordProgress>> {
        let progress = sqlx::query_as::<_, WordProgress>("SELECT * FROM word_progress")
            .fetch_all(self.pool())
            .await?;
        Ok(progress)
    }

    // ===== Sessions =====

    pub async fn record_session(
        &self,
        kind: &str,
        item_count: i64,
        correct_count: i64,
    ) -> Result<LearningSession> {
        let session = sqlx::query_as::<_, LearningSession>(
            r#"
            INSERT INTO learning_sessions (kind, item_count, correct_count, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(kind)
        .bind(item_count)
        .bind(correct_count)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(session)
    }

    pub async fn count_sessions(&self, kind: &str) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM learning_sessions WHERE kind = ?")
            .bind(kind)
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Timestamps of every review and session, used for streaks
    pub async fn learning_timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let stamps = sqlx::query_scalar(
            r#"
            SELECT last_reviewed_at FROM word_progress
            UNION ALL
            SELECT created_at FROM learning_sessions
            "#,
        )
        .fetch_all(self.pool())
        .await?;
        Ok(stamps)
    }

    // ===== E-books =====

    pub async fn get_ebook_progress(&self, book_id: &str) -> Result<Option<EbookProgress>> {
        let progress =
            sqlx::query_as::<_, EbookProgress>("SELECT * FROM ebook_progress WHERE book_id = ?")
                .bind(book_id)
                .fetch_optional(self.pool())
                .await?;
        Ok(progress)
    }

    pub async fn list_ebook_progress(&self) -> Result<Vec<EbookProgress>> {
        let progress = sqlx::query_as::<_, EbookProgress>("SELECT * FROM ebook_progress")
            .fetch_all(self.pool())
            .await?;
        Ok(progress)
    }

    /// Save the current page. Returns the row and whether this save completed
    /// the book for the first time. Completion is never undone.
    pub async fn save_ebook_progress(
        &self,
        book_id: &str,
        current_page: i64,
        total_pages: i64,
    ) -> Result<(EbookProgress, bool)> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO ebook_progress (book_id, current_page, total_pages, is_completed, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            ON CONFLICT(book_id) DO UPDATE SET
                current_page = ?2,
                total_pages = ?3,
                updated_at = ?4
            "#,
        )
        .bind(book_id)
        .bind(current_page)
        .bind(total_pages)
        .bind(now)
        .execute(self.pool())
        .await?;

        let mut newly_completed = false;
        if current_page >= total_pages - 1 {
            newly_completed = sqlx::query(
                r#"
                UPDATE ebook_progress SET is_completed = 1, completed_at = ?
                WHERE book_id = ? AND is_completed = 0
                "#,
            )
            .bind(now)
            .bind(book_id)
            .execute(self.pool())
            .await?
            .rows_affected()
                == 1;
        }

        let progress = self
            .get_ebook_progress(book_id)
            .await?
            .ok_or_else(|| AppError::BookNotFound(book_id.to_string()))?;

        Ok((progress, newly_completed))
    }

    pub async fn count_completed_books(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM ebook_progress WHERE is_completed = 1")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
