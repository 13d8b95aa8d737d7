//! Points and learning statistics
//!
//! The analytics are pure functions over rows already fetched from the
//! repository. `StatisticsService` only selects the rows and the local
//! timezone used for day boundaries.

use crate::config::{
    DASHBOARD_RECENT_COUNT, DEFAULT_DAILY_DAYS, MAX_DAILY_DAYS, MAX_MASTERY_LEVEL,
    TREND_STABLE_BAND_PERCENT,
};
use crate::database::{
    EbookQuizProgress, PurchaseEntry, PurchaseStatus, QuizTier, Repository, TransactionEntry,
    WordProgress,
};
use crate::error::{AppError, Result};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

const WEEKDAY_NAMES: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];
const UNCATEGORIZED: &str = "기타";

// ===== Time ranges =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Today,
    Week,
    Month,
    Year,
    All,
}

impl TimeRange {
    /// Inclusive lower bound of the range, `None` for all time
    pub fn start(self, now: DateTime<Utc>, tz: FixedOffset) -> Option<DateTime<Utc>> {
        match self {
            TimeRange::Today => {
                let local_midnight = now.with_timezone(&tz).date_naive().and_hms_opt(0, 0, 0)?;
                tz.from_local_datetime(&local_midnight)
                    .single()
                    .map(|dt| dt.with_timezone(&Utc))
            }
            TimeRange::Week => Some(now - Duration::days(7)),
            TimeRange::Month => Some(now - Duration::days(30)),
            TimeRange::Year => Some(now - Duration::days(365)),
            TimeRange::All => None,
        }
    }
}

impl FromStr for TimeRange {
    type Err = AppError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "today" => Ok(TimeRange::Today),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(AppError::Validation(format!("Unknown time range: {}", other))),
        }
    }
}

// ===== Report types =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PointsSummary {
    pub total_earned: i64,
    pub total_spent: i64,
    pub net_change: i64,
    pub earn_count: i64,
    pub spend_count: i64,
    pub avg_earn: i64,
    pub avg_spend: i64,
    pub biggest_earn: i64,
    pub biggest_spend: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub earned: i64,
    pub spent: i64,
    pub net: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: i64,
    pub count: i64,
}

/// Keyword category with earnings and spending kept apart, so a
/// reversal shows up as spending instead of inflating the category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeywordTotal {
    pub category: String,
    pub earned: i64,
    pub spent: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayBucket {
    pub day: &'static str,
    pub earned: i64,
    pub spent: i64,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyBucket {
    pub hour: u32,
    pub count: i64,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub recent_earned: i64,
    pub previous_earned: i64,
    pub percent: i64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointsReport {
    pub range: TimeRange,
    pub summary: PointsSummary,
    pub keyword_categories: Vec<KeywordTotal>,
    pub rule_categories: Vec<CategoryTotal>,
    pub weekdays: Vec<WeekdayBucket>,
    pub hours: Vec<HourlyBucket>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierCompletion {
    pub tier: QuizTier,
    pub completed: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningAnalytics {
    pub total_words: i64,
    pub mastered_words: i64,
    pub total_reviews: i64,
    pub accuracy: i64,
    pub mastery_rate: i64,
    /// Word counts per mastery level 0..=3
    pub mastery_distribution: Vec<i64>,
    pub completed_quizzes: i64,
    pub total_attempts: i64,
    pub avg_score: i64,
    pub quiz_by_tier: Vec<TierCompletion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseAnalytics {
    pub total_purchases: i64,
    pub total_spent: i64,
    pub completed_purchases: i64,
    pub avg_purchase: i64,
    pub by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub balance: i64,
    pub week_earned: i64,
    pub week_spent: i64,
    pub recent: Vec<TransactionEntry>,
}

// ===== Pure analytics =====

fn round_div(numerator: i64, denominator: i64) -> i64 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64).round() as i64
}

pub fn summarize(entries: &[TransactionEntry]) -> PointsSummary {
    let earned: Vec<i64> = entries.iter().map(|t| t.amount).filter(|a| *a > 0).collect();
    let spent: Vec<i64> = entries
        .iter()
        .map(|t| t.amount)
        .filter(|a| *a < 0)
        .map(i64::abs)
        .collect();

    let total_earned: i64 = earned.iter().sum();
    let total_spent: i64 = spent.iter().sum();

    PointsSummary {
        total_earned,
        total_spent,
        net_change: total_earned - total_spent,
        earn_count: earned.len() as i64,
        spend_count: spent.len() as i64,
        avg_earn: round_div(total_earned, earned.len() as i64),
        avg_spend: round_div(total_spent, spent.len() as i64),
        biggest_earn: earned.iter().copied().max().unwrap_or(0),
        biggest_spend: spent.iter().copied().max().unwrap_or(0),
    }
}

/// One bucket per local day for the `days` days ending today, zero-filled
pub fn daily_buckets(
    entries: &[TransactionEntry],
    days: i64,
    now: DateTime<Utc>,
    tz: FixedOffset,
) -> Vec<DailyBucket> {
    let today = now.with_timezone(&tz).date_naive();
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = (0..days.max(1))
        .map(|offset| (today - Duration::days(offset), (0, 0)))
        .collect();

    for entry in entries {
        let day = entry.created_at.with_timezone(&tz).date_naive();
        if let Some((earned, spent)) = buckets.get_mut(&day) {
            if entry.amount > 0 {
                *earned += entry.amount;
            } else {
                *spent += entry.amount.abs();
            }
        }
    }

    buckets
        .into_iter()
        .map(|(date, (earned, spent))| DailyBucket {
            date,
            earned,
            spent,
            net: earned - spent,
        })
        .collect()
}

/// Classify a ledger note by keyword, first match wins
pub fn keyword_category(note: Option<&str>, amount: i64) -> &'static str {
    let note = note.unwrap_or_default().to_lowercase();
    let has = |keys: &[&str]| keys.iter().any(|k| note.contains(k));

    if has(&["퀴즈", "quiz"]) {
        "퀴즈"
    } else if has(&["플래시", "단어", "학습"]) {
        "학습"
    } else if has(&["책", "읽기"]) {
        "읽기"
    } else if has(&["상점", "구매"]) {
        "상점"
    } else if amount > 0 {
        "생활습관"
    } else {
        UNCATEGORIZED
    }
}

fn sorted_totals(map: BTreeMap<String, (i64, i64)>) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = map
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals
}

/// Earned and spent points per keyword category, busiest first
pub fn keyword_breakdown(entries: &[TransactionEntry]) -> Vec<KeywordTotal> {
    let mut map: BTreeMap<&'static str, KeywordTotal> = BTreeMap::new();
    for entry in entries {
        let category = keyword_category(entry.note.as_deref(), entry.amount);
        let slot = map.entry(category).or_insert_with(|| KeywordTotal {
            category: category.to_string(),
            ..Default::default()
        });
        if entry.amount > 0 {
            slot.earned += entry.amount;
        } else {
            slot.spent += entry.amount.abs();
        }
        slot.count += 1;
    }

    let mut totals: Vec<KeywordTotal> = map.into_values().collect();
    totals.sort_by(|a, b| {
        (b.earned + b.spent)
            .cmp(&(a.earned + a.spent))
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// Positive amounts grouped by the rule's category
pub fn rule_category_totals(entries: &[TransactionEntry]) -> Vec<CategoryTotal> {
    let mut map: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for entry in entries.iter().filter(|t| t.amount > 0) {
        let category = entry
            .rule_category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let slot = map.entry(category).or_default();
        slot.0 += entry.amount;
        slot.1 += 1;
    }
    sorted_totals(map)
}

pub fn weekday_distribution(entries: &[TransactionEntry], tz: FixedOffset) -> Vec<WeekdayBucket> {
    let mut buckets: Vec<WeekdayBucket> = WEEKDAY_NAMES
        .iter()
        .map(|day| WeekdayBucket {
            day,
            earned: 0,
            spent: 0,
            count: 0,
        })
        .collect();

    for entry in entries {
        let index = entry
            .created_at
            .with_timezone(&tz)
            .weekday()
            .num_days_from_sunday() as usize;
        let bucket = &mut buckets[index];
        if entry.amount > 0 {
            bucket.earned += entry.amount;
        } else {
            bucket.spent += entry.amount.abs();
        }
        bucket.count += 1;
    }

    buckets
}

pub fn hourly_distribution(entries: &[TransactionEntry], tz: FixedOffset) -> Vec<HourlyBucket> {
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour,
            count: 0,
            points: 0,
        })
        .collect();

    for entry in entries {
        let bucket = &mut buckets[entry.created_at.with_timezone(&tz).hour() as usize];
        bucket.count += 1;
        if entry.amount > 0 {
            bucket.points += entry.amount;
        }
    }

    buckets
}

/// Earnings of the last 7 days against the 7 days before
pub fn trend(entries: &[TransactionEntry], now: DateTime<Utc>) -> Trend {
    let mut recent_earned = 0;
    let mut previous_earned = 0;

    for entry in entries.iter().filter(|t| t.amount > 0) {
        let age_days = (now - entry.created_at).num_days();
        if (0..7).contains(&age_days) {
            recent_earned += entry.amount;
        } else if (7..14).contains(&age_days) {
            previous_earned += entry.amount;
        }
    }

    let percent = if previous_earned > 0 {
        round_div((recent_earned - previous_earned) * 100, previous_earned)
    } else {
        0
    };
    let direction = if percent > TREND_STABLE_BAND_PERCENT {
        TrendDirection::Up
    } else if percent < -TREND_STABLE_BAND_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    Trend {
        recent_earned,
        previous_earned,
        percent,
        direction,
    }
}

pub fn learning_analytics(
    progress: &[WordProgress],
    quiz_progress: &[EbookQuizProgress],
) -> LearningAnalytics {
    let total_words = progress.len() as i64;
    let mastered_words = progress
        .iter()
        .filter(|p| p.mastery_level >= MAX_MASTERY_LEVEL)
        .count() as i64;
    let total_reviews: i64 = progress.iter().map(|p| p.review_count).sum();
    let total_correct: i64 = progress.iter().map(|p| p.correct_count).sum();

    let mut mastery_distribution = vec![0; MAX_MASTERY_LEVEL as usize + 1];
    for p in progress {
        mastery_distribution[p.mastery_level.clamp(0, MAX_MASTERY_LEVEL) as usize] += 1;
    }

    let quiz_by_tier = QuizTier::ALL
        .iter()
        .map(|tier| {
            let rows = quiz_progress.iter().filter(|q| q.quiz_tier == *tier);
            TierCompletion {
                tier: *tier,
                completed: rows.clone().filter(|q| q.is_completed).count() as i64,
                total: rows.count() as i64,
            }
        })
        .collect();

    LearningAnalytics {
        total_words,
        mastered_words,
        total_reviews,
        accuracy: round_div(total_correct * 100, total_reviews),
        mastery_rate: round_div(mastered_words * 100, total_words),
        mastery_distribution,
        completed_quizzes: quiz_progress.iter().filter(|q| q.is_completed).count() as i64,
        total_attempts: quiz_progress.iter().map(|q| q.total_attempts).sum(),
        avg_score: round_div(
            quiz_progress.iter().map(|q| q.best_score).sum(),
            quiz_progress.len() as i64,
        ),
        quiz_by_tier,
    }
}

pub fn purchase_analytics(purchases: &[PurchaseEntry]) -> PurchaseAnalytics {
    let total_purchases = purchases.len() as i64;
    let total_spent: i64 = purchases.iter().map(|p| p.point_cost).sum();

    let mut map: BTreeMap<String, (i64, i64)> = BTreeMap::new();
    for purchase in purchases {
        let slot = map.entry(purchase.item_category.clone()).or_default();
        slot.0 += purchase.point_cost;
        slot.1 += 1;
    }

    PurchaseAnalytics {
        total_purchases,
        total_spent,
        completed_purchases: purchases
            .iter()
            .filter(|p| p.status == PurchaseStatus::Completed)
            .count() as i64,
        avg_purchase: round_div(total_spent, total_purchases),
        by_category: sorted_totals(map),
    }
}

// ===== Streaks =====

/// Distinct local calendar days of the given instants
pub fn local_days(stamps: &[DateTime<Utc>], tz: FixedOffset) -> BTreeSet<NaiveDate> {
    stamps
        .iter()
        .map(|s| s.with_timezone(&tz).date_naive())
        .collect()
}

/// Consecutive days ending today. A run ending yesterday still counts
/// so the streak does not reset before today's session.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> i64 {
    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> i64 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in days {
        run = match previous {
            Some(prev) if *day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }
    longest
}

// ===== Service =====

#[derive(Clone)]
pub struct StatisticsService {
    repo: Repository,
    tz: FixedOffset,
}

impl StatisticsService {
    pub fn new(repo: Repository, tz: FixedOffset) -> Self {
        Self { repo, tz }
    }

    pub async fn points_report(&self, range: TimeRange, now: DateTime<Utc>) -> Result<PointsReport> {
        let entries = self
            .repo
            .transactions_since(range.start(now, self.tz))
            .await?;
        // Trend always compares the last two weeks
        let trend_rows = self
            .repo
            .transactions_since(Some(now - Duration::days(14)))
            .await?;

        Ok(PointsReport {
            range,
            summary: summarize(&entries),
            keyword_categories: keyword_breakdown(&entries),
            rule_categories: rule_category_totals(&entries),
            weekdays: weekday_distribution(&entries, self.tz),
            hours: hourly_distribution(&entries, self.tz),
            trend: trend(&trend_rows, now),
        })
    }

    pub async fn daily(&self, days: Option<i64>, now: DateTime<Utc>) -> Result<Vec<DailyBucket>> {
        let days = days.unwrap_or(DEFAULT_DAILY_DAYS);
        if !(1..=MAX_DAILY_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "Days must be between 1 and {}",
                MAX_DAILY_DAYS
            )));
        }

        let since = now - Duration::days(days + 1);
        let entries = self.repo.transactions_since(Some(since)).await?;
        Ok(daily_buckets(&entries, days, now, self.tz))
    }

    pub async fn learning(&self) -> Result<LearningAnalytics> {
        let progress = self.repo.list_word_progress().await?;
        let quiz_progress = self.repo.list_quiz_progress(None).await?;
        Ok(learning_analytics(&progress, &quiz_progress))
    }

    pub async fn purchases(&self) -> Result<PurchaseAnalytics> {
        let purchases = self.repo.list_purchases(None).await?;
        Ok(purchase_analytics(&purchases))
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<Dashboard> {
        let balance = self.repo.get_balance().await?;
        let week = self
            .repo
            .transactions_since(Some(now - Duration::days(7)))
            .await?;
        let summary = summarize(&week);
        let recent = self.repo.list_transactions(DASHBOARD_RECENT_COUNT).await?;

        Ok(Dashboard {
            balance,
            week_earned: summary.total_earned,
            week_spent: summary.total_spent,
            recent,
        })
    }

    /// Current and longest learning streaks in local days
    pub async fn learning_streaks(&self, now: DateTime<Utc>) -> Result<(i64, i64)> {
        let stamps = self.repo.learning_timestamps().await?;
        let days = local_days(&stamps, self.tz);
        let today = now.with_timezone(&self.tz).date_naive();
        Ok((current_streak(&days, today), longest_streak(&days)))
    }
}
