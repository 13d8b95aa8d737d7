//! Badge evaluation and awarding

use crate::catalog::badges::{find_badge, BadgeCondition, BadgeDefinition, BADGES};
use crate::config::MAX_MASTERY_LEVEL;
use crate::database::Repository;
use crate::error::{AppError, Result};
use crate::services::activity::{ActivityEvent, ActivityHub};
use crate::services::statistics::{current_streak, local_days, longest_streak};
use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use serde::Serialize;
use std::collections::HashMap;

/// Snapshot of everything badge conditions look at
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub current_points: i64,
    pub total_points_earned: i64,
    pub words_learned: i64,
    pub words_mastered: i64,
    pub total_reviews: i64,
    pub accuracy: i64,
    pub streak: i64,
    pub max_streak: i64,
    pub days_active: i64,
    pub flashcard_sessions: i64,
    pub quizzes_taken: i64,
    pub perfect_quizzes: i64,
    pub books_completed: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BadgeStatus {
    #[serde(flatten)]
    pub badge: BadgeDefinition,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
    /// 0..=100 for counted conditions, 0 or 100 for time-of-day ones
    pub progress: i64,
}

/// Value and threshold a counted condition compares
fn measure(condition: BadgeCondition, stats: &UserStats) -> Option<(i64, i64)> {
    use BadgeCondition::*;

    match condition {
        Points(n) => Some((stats.current_points, n)),
        WordsLearned(n) => Some((stats.words_learned, n)),
        WordsMastered(n) => Some((stats.words_mastered, n)),
        Accuracy { percent, min_reviews } => {
            if stats.total_reviews < min_reviews {
                Some((stats.total_reviews.min(min_reviews - 1), min_reviews))
            } else {
                Some((stats.accuracy, percent))
            }
        }
        Reviews(n) => Some((stats.total_reviews, n)),
        Streak(n) => Some((stats.streak, n)),
        MaxStreak(n) => Some((stats.max_streak, n)),
        FlashcardSessions(n) => Some((stats.flashcard_sessions, n)),
        PerfectQuizzes(n) => Some((stats.perfect_quizzes, n)),
        DaysActive(n) => Some((stats.days_active, n)),
        BooksCompleted(n) => Some((stats.books_completed, n)),
        EarlyBird | NightOwl | Weekend => None,
    }
}

/// Whether a condition holds for `stats` at local time `local_now`
pub fn is_met(condition: BadgeCondition, stats: &UserStats, local_now: DateTime<FixedOffset>) -> bool {
    let hour = local_now.hour();

    match condition {
        BadgeCondition::EarlyBird => (5..9).contains(&hour),
        BadgeCondition::NightOwl => hour >= 21 || hour < 5,
        BadgeCondition::Weekend => matches!(local_now.weekday(), Weekday::Sat | Weekday::Sun),
        BadgeCondition::Accuracy { percent, min_reviews } => {
            stats.total_reviews >= min_reviews && stats.accuracy >= percent
        }
        counted => measure(counted, stats).is_some_and(|(value, target)| value >= target),
    }
}

fn progress_percent(condition: BadgeCondition, stats: &UserStats, local_now: DateTime<FixedOffset>) -> i64 {
    if is_met(condition, stats, local_now) {
        return 100;
    }
    match measure(condition, stats) {
        Some((value, target)) if target > 0 => (value.max(0) * 100 / target).min(99),
        _ => 0,
    }
}

#[derive(Clone)]
pub struct BadgesService {
    repo: Repository,
    hub: ActivityHub,
    tz: FixedOffset,
}

impl BadgesService {
    pub fn new(repo: Repository, hub: ActivityHub, tz: FixedOffset) -> Self {
        Self { repo, hub, tz }
    }

    pub async fn user_stats(&self, now: DateTime<Utc>) -> Result<UserStats> {
        let progress = self.repo.list_word_progress().await?;
        let total_reviews: i64 = progress.iter().map(|p| p.review_count).sum();
        let total_correct: i64 = progress.iter().map(|p| p.correct_count).sum();
        let accuracy = if total_reviews > 0 {
            (total_correct as f64 * 100.0 / total_reviews as f64).round() as i64
        } else {
            0
        };

        let learning_days = local_days(&self.repo.learning_timestamps().await?, self.tz);
        let mut active_days = local_days(&self.repo.transaction_timestamps().await?, self.tz);
        active_days.extend(learning_days.iter().copied());
        let today = now.with_timezone(&self.tz).date_naive();

        let (quizzes_taken, perfect_quizzes) = self.repo.quiz_counts().await?;

        Ok(UserStats {
            current_points: self.repo.get_balance().await?,
            total_points_earned: self.repo.total_earned().await?,
            words_learned: progress.len() as i64,
            words_mastered: progress
                .iter()
                .filter(|p| p.mastery_level >= MAX_MASTERY_LEVEL)
                .count() as i64,
            total_reviews,
            accuracy,
            streak: current_streak(&learning_days, today),
            max_streak: longest_streak(&learning_days),
            days_active: active_days.len() as i64,
            flashcard_sessions: self.repo.count_sessions("flashcard").await?,
            quizzes_taken,
            perfect_quizzes,
            books_completed: self.repo.count_completed_books().await?,
        })
    }

    /// Award every badge whose condition now holds and return the new ones
    pub async fn check_and_award(&self, now: DateTime<Utc>) -> Result<Vec<BadgeDefinition>> {
        let stats = self.user_stats(now).await?;
        let local_now = now.with_timezone(&self.tz);
        let earned: Vec<String> = self
            .repo
            .list_earned_badges()
            .await?
            .into_iter()
            .map(|b| b.badge_code)
            .collect();

        let mut newly_earned = Vec::new();
        for badge in BADGES {
            if earned.iter().any(|code| code == badge.code) {
                continue;
            }
            if !is_met(badge.condition, &stats, local_now) {
                continue;
            }
            if self.repo.award_badge(badge.code, now).await? {
                self.announce(badge);
                newly_earned.push(*badge);
            }
        }

        if !newly_earned.is_empty() {
            tracing::info!("Earned {} new badge(s)", newly_earned.len());
        }
        Ok(newly_earned)
    }

    pub async fn list(&self, now: DateTime<Utc>) -> Result<Vec<BadgeStatus>> {
        let stats = self.user_stats(now).await?;
        let local_now = now.with_timezone(&self.tz);
        let earned: HashMap<String, DateTime<Utc>> = self
            .repo
            .list_earned_badges()
            .await?
            .into_iter()
            .map(|b| (b.badge_code, b.earned_at))
            .collect();

        Ok(BADGES
            .iter()
            .map(|badge| {
                let earned_at = earned.get(badge.code).copied();
                BadgeStatus {
                    badge: *badge,
                    earned: earned_at.is_some(),
                    earned_at,
                    progress: if earned_at.is_some() {
                        100
                    } else {
                        progress_percent(badge.condition, &stats, local_now)
                    },
                }
            })
            .collect())
    }

    /// Caregiver grants a badge regardless of its condition
    pub async fn award(&self, code: &str, now: DateTime<Utc>) -> Result<bool> {
        let badge = find_badge(code).ok_or_else(|| AppError::BadgeNotFound(code.to_string()))?;

        let newly = self.repo.award_badge(badge.code, now).await?;
        if newly {
            tracing::info!("Badge {} awarded manually", code);
            self.announce(badge);
        }
        Ok(newly)
    }

    fn announce(&self, badge: &BadgeDefinition) {
        self.hub.publish(ActivityEvent::BadgeEarned {
            code: badge.code.to_string(),
            name: badge.name.to_string(),
            icon: badge.icon.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::tests::create_test_repo;
    use crate::database::seed::seed_defaults;
    use crate::database::NewPointChange;

    fn kst() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    fn local(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_time_of_day_conditions() {
        let stats = UserStats::default();

        // 2026-03-10 is a Tuesday
        assert!(is_met(BadgeCondition::EarlyBird, &stats, local("2026-03-10T06:00:00+09:00")));
        assert!(!is_met(BadgeCondition::EarlyBird, &stats, local("2026-03-10T09:00:00+09:00")));
        assert!(is_met(BadgeCondition::NightOwl, &stats, local("2026-03-10T22:00:00+09:00")));
        assert!(is_met(BadgeCondition::NightOwl, &stats, local("2026-03-10T03:00:00+09:00")));
        assert!(!is_met(BadgeCondition::Weekend, &stats, local("2026-03-10T12:00:00+09:00")));
        assert!(is_met(BadgeCondition::Weekend, &stats, local("2026-03-14T12:00:00+09:00")));
    }

    #[test]
    fn test_accuracy_needs_enough_reviews() {
        let noon = local("2026-03-10T12:00:00+09:00");
        let condition = BadgeCondition::Accuracy {
            percent: 80,
            min_reviews: 20,
        };
        let few = UserStats {
            accuracy: 100,
            total_reviews: 5,
            ..Default::default()
        };
        let enough = UserStats {
            accuracy: 85,
            total_reviews: 20,
            ..Default::default()
        };

        assert!(!is_met(condition, &few, noon));
        assert!(is_met(condition, &enough, noon));
    }

    #[test]
    fn test_progress_percent() {
        let noon = local("2026-03-10T12:00:00+09:00");
        let stats = UserStats {
            current_points: 250,
            ..Default::default()
        };

        assert_eq!(progress_percent(BadgeCondition::Points(500), &stats, noon), 50);
        assert_eq!(progress_percent(BadgeCondition::Points(100), &stats, noon), 100);
    }

    #[tokio::test]
    async fn test_check_and_award_is_idempotent() {
        let repo = create_test_repo().await;
        seed_defaults(&repo, "주우").await.unwrap();
        repo.apply_point_change(&NewPointChange::new(600, "보상", "엄마"))
            .await
            .unwrap();
        let service = BadgesService::new(repo, ActivityHub::new(), kst());
        // Tuesday noon KST, no time-of-day badge applies
        let now = local("2026-03-10T12:00:00+09:00").with_timezone(&Utc);

        let first = service.check_and_award(now).await.unwrap();
        let codes: Vec<&str> = first.iter().map(|b| b.code).collect();
        assert_eq!(codes, vec!["points_100", "points_500"]);

        let second = service.check_and_award(now).await.unwrap();
        assert!(second.is_empty());

        let listed = service.list(now).await.unwrap();
        let points_1000 = listed.iter().find(|b| b.badge.code == "points_1000").unwrap();
        assert!(!points_1000.earned);
        assert_eq!(points_1000.progress, 60);
    }

    #[tokio::test]
    async fn test_manual_award() {
        let repo = create_test_repo().await;
        seed_defaults(&repo, "주우").await.unwrap();
        let service = BadgesService::new(repo, ActivityHub::new(), kst());
        let now = Utc::now();

        assert!(service.award("perfect_quiz", now).await.unwrap());
        assert!(!service.award("perfect_quiz", now).await.unwrap());
        assert!(matches!(
            service.award("no_such_badge", now).await,
            Err(AppError::BadgeNotFound(_))
        ));
    }
}
