//! Badges, e-book quiz progress and quiz results

use super::Repository;
use crate::database::models::*;
use crate::error::Result;
use chrono::{DateTime, Utc};

/// Badge row as stored in the `badges` table
#[derive(Debug, Clone)]
pub struct BadgeRow<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub icon: &'a str,
    pub category: &'a str,
    pub rarity: &'a str,
    pub requirement: &'a str,
}

/// Fields of a finished standalone quiz
#[derive(Debug, Clone)]
pub struct NewQuizResult<'a> {
    pub quiz_kind: &'a str,
    pub total_questions: i64,
    pub correct_count: i64,
    pub score_percent: i64,
    pub stars: i64,
    pub max_streak: i64,
    pub points_awarded: i64,
    pub ticket_minutes: i64,
}

impl Repository {
    // ===== Badges =====

    /// Insert or refresh a badge definition
    pub async fn upsert_badge(&self, badge: &BadgeRow<'_>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO badges (code, name, description, icon, category, rarity, requirement)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(code) DO UPDATE SET
                name = ?2, description = ?3, icon = ?4,
                category = ?5, rarity = ?6, requirement = ?7
            "#,
        )
        .bind(badge.code)
        .bind(badge.name)
        .bind(badge.description)
        .bind(badge.icon)
        .bind(badge.category)
        .bind(badge.rarity)
        .bind(badge.requirement)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn list_earned_badges(&self) -> Result<Vec<EarnedBadge>> {
        let earned =
            sqlx::query_as::<_, EarnedBadge>("SELECT * FROM user_badges ORDER BY earned_at")
                .fetch_all(self.pool())
                .await?;
        Ok(earned)
    }

    /// Record a badge as earned. Returns false when it was already earned.
    pub async fn award_badge(&self, code: &str, earned_at: DateTime<Utc>) -> Result<bool> {
        let rows = sqlx::query("INSERT OR IGNORE INTO user_badges (badge_code, earned_at) VALUES (?, ?)")
            .bind(code)
            .bind(earned_at)
            .execute(self.pool())
            .await?
            .rows_affected();

        if rows == 1 {
            tracing::debug!("Badge earned: {}", code);
        }
        Ok(rows == 1)
    }

    // ===== E-book quiz progress =====

    pub async fn get_quiz_progress(
        &self,
        book_id: &str,
        tier: QuizTier,
    ) -> Result<Option<EbookQuizProgress>> {
        let progress = sqlx::query_as::<_, EbookQuizProgress>(
            "SELECT * FROM ebook_quiz_progress WHERE book_id = ? AND quiz_tier = ?",
        )
        .bind(book_id)
        .bind(tier)
        .fetch_optional(self.pool())
        .await?;
        Ok(progress)
    }

    pub async fn list_quiz_progress(&self, book_id: Option<&str>) -> Result<Vec<EbookQuizProgress>> {
        let progress = sqlx::query_as::<_, EbookQuizProgress>(
            "SELECT * FROM ebook_quiz_progress WHERE (?1 IS NULL OR book_id = ?1) ORDER BY book_id",
        )
        .bind(book_id)
        .fetch_all(self.pool())
        .await?;
        Ok(progress)
    }

    pub async fn unlock_quiz_tier(&self, book_id: &str, tier: QuizTier) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ebook_quiz_progress (book_id, quiz_tier, is_unlocked)
            VALUES (?, ?, 1)
            ON CONFLICT(book_id, quiz_tier) DO UPDATE SET is_unlocked = 1
            "#,
        )
        .bind(book_id)
        .bind(tier)
        .execute(self.pool())
        .await?;

        tracing::debug!("Unlocked quiz tier {} for {}", tier.as_str(), book_id);
        Ok(())
    }

    /// Store every answer of one attempt and fold it into the tier progress.
    /// A pass marks the tier completed and unlocks the next tier.
    pub async fn record_quiz_tier_attempt(
        &self,
        book_id: &str,
        tier: QuizTier,
        answers: &[NewQuizAttempt],
        score_percent: i64,
        passed: bool,
    ) -> Result<EbookQuizProgress> {
        let now = Utc::now();
        let mut tx = self.pool().begin().await?;

        for answer in answers {
            sqlx::query(
                r#"
                INSERT INTO quiz_attempts
                    (book_id, quiz_tier, question_id, user_answer, is_correct,
                     hints_used, base_points, earned_points, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(book_id)
            .bind(tier)
            .bind(&answer.question_id)
            .bind(&answer.user_answer)
            .bind(answer.is_correct)
            .bind(answer.hints_used)
            .bind(answer.base_points)
            .bind(answer.earned_points)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let progress = sqlx::query_as::<_, EbookQuizProgress>(
            r#"
            UPDATE ebook_quiz_progress SET
                total_attempts = total_attempts + 1,
                best_score = MAX(best_score, ?1),
                last_attempt_at = ?2,
                is_completed = MAX(is_completed, ?3),
                completed_at = CASE
                    WHEN completed_at IS NULL AND ?3 = 1 THEN ?2
                    ELSE completed_at
                END
            WHERE book_id = ?4 AND quiz_tier = ?5
            RETURNING *
            "#,
        )
        .bind(score_percent)
        .bind(now)
        .bind(passed)
        .bind(book_id)
        .bind(tier)
        .fetch_one(&mut *tx)
        .await?;

        if passed {
            if let Some(next) = tier.next() {
                sqlx::query(
                    r#"
                    INSERT INTO ebook_quiz_progress (book_id, quiz_tier, is_unlocked)
                    VALUES (?, ?, 1)
                    ON CONFLICT(book_id, quiz_tier) DO UPDATE SET is_unlocked = 1
                    "#,
                )
                .bind(book_id)
                .bind(next)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(progress)
    }

    pub async fn list_quiz_attempts(&self, book_id: &str, tier: QuizTier) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            "SELECT * FROM quiz_attempts WHERE book_id = ? AND quiz_tier = ? ORDER BY id",
        )
        .bind(book_id)
        .bind(tier)
        .fetch_all(self.pool())
        .await?;
        Ok(attempts)
    }

    // ===== Standalone quiz results =====

    pub async fn record_quiz_result(&self, result: &NewQuizResult<'_>) -> Result<QuizResult> {
        let stored = sqlx::query_as::<_, QuizResult>(
            r#"
            INSERT INTO quiz_results
                (quiz_kind, total_questions, correct_count, score_percent, stars,
                 max_streak, points_awarded, ticket_minutes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(result.quiz_kind)
        .bind(result.total_questions)
        .bind(result.correct_count)
        .bind(result.score_percent)
        .bind(result.stars)
        .bind(result.max_streak)
        .bind(result.points_awarded)
        .bind(result.ticket_minutes)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(stored)
    }

    pub async fn list_quiz_results(&self, limit: i64) -> Result<Vec<QuizResult>> {
        let results = sqlx::query_as::<_, QuizResult>(
            "SELECT * FROM quiz_results ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;
        Ok(results)
    }

    /// (quizzes taken, perfect quizzes) over standalone quiz results
    pub async fn quiz_counts(&self) -> Result<(i64, i64)> {
        let (taken, perfect): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(CASE WHEN score_percent = 100 THEN 1 ELSE 0 END), 0)
            FROM quiz_results
            "#,
        )
        .fetch_one(self.pool())
        .await?;

        Ok((taken, perfect))
    }
}
