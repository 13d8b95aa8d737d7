//! Database models
//!
//! Rust structs representing database entities.
//! All models use serde for serialization to API clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single child profile and running balance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub current_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ===== Rules =====

/// A named fixed-amount action a caregiver can apply
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointRule {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    /// Signed: positive rewards, negative penalties
    pub point_amount: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRuleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub point_amount: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRuleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub point_amount: Option<i64>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

// ===== Ledger =====

/// One immutable ledger row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PointTransaction {
    pub id: i64,
    pub rule_id: Option<i64>,
    pub amount: i64,
    pub balance_after: i64,
    pub note: Option<String>,
    pub created_by: String,
    /// Set on cancellation rows: the transaction being reversed
    pub reverses_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Ledger row joined with its rule and cancellation state for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TransactionEntry {
    pub id: i64,
    pub rule_id: Option<i64>,
    pub rule_name: Option<String>,
    pub rule_category: Option<String>,
    pub amount: i64,
    pub balance_after: i64,
    pub note: Option<String>,
    pub created_by: String,
    pub reverses_id: Option<i64>,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
}

/// Input to the atomic balance mutation
#[derive(Debug, Clone)]
pub struct NewPointChange {
    pub amount: i64,
    pub note: Option<String>,
    pub rule_id: Option<i64>,
    pub created_by: String,
    pub reverses_id: Option<i64>,
}

impl NewPointChange {
    pub fn new(amount: i64, note: impl Into<String>, created_by: impl Into<String>) -> Self {
        Self {
            amount,
            note: Some(note.into()),
            rule_id: None,
            created_by: created_by.into(),
            reverses_id: None,
        }
    }
}

// ===== Shop =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShopItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub point_cost: i64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShopItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub point_cost: i64,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateShopItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub point_cost: Option<i64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl PurchaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Approved => "approved",
            PurchaseStatus::Rejected => "rejected",
            PurchaseStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Purchase {
    pub id: i64,
    pub item_id: i64,
    /// Cost captured when the request was made
    pub point_cost: i64,
    pub status: PurchaseStatus,
    pub note: Option<String>,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseEntry {
    pub id: i64,
    pub item_id: i64,
    pub item_name: String,
    pub item_category: String,
    pub point_cost: i64,
    pub status: PurchaseStatus,
    pub note: Option<String>,
    pub decided_by: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
    pub transaction_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

// ===== Goals =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Goal {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub target_points: i64,
    pub current_progress: i64,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub target_points: i64,
}

// ===== Badges =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EarnedBadge {
    pub badge_code: String,
    pub earned_at: DateTime<Utc>,
}

// ===== Vocabulary =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnglishWord {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub category: String,
    pub pronunciation: Option<String>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WordProgress {
    pub word_id: i64,
    /// 0..=3, three means mastered
    pub mastery_level: i64,
    pub review_count: i64,
    pub correct_count: i64,
    pub last_reviewed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategorySummary {
    pub category: String,
    pub word_count: i64,
    pub learned_count: i64,
    pub mastered_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LearningSession {
    pub id: i64,
    pub kind: String,
    pub item_count: i64,
    pub correct_count: i64,
    pub created_at: DateTime<Utc>,
}

// ===== E-books and quizzes =====

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EbookProgress {
    pub book_id: String,
    pub current_page: i64,
    pub total_pages: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum QuizTier {
    Basic,
    Intermediate,
    Master,
}

impl QuizTier {
    pub const ALL: [QuizTier; 3] = [QuizTier::Basic, QuizTier::Intermediate, QuizTier::Master];

    pub fn as_str(self) -> &'static str {
        match self {
            QuizTier::Basic => "basic",
            QuizTier::Intermediate => "intermediate",
            QuizTier::Master => "master",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuizTier::Basic => "기초 퀴즈",
            QuizTier::Intermediate => "실력 퀴즈",
            QuizTier::Master => "마스터 퀴즈",
        }
    }

    /// Points per correct answer before hint penalties
    pub fn base_points(self) -> i64 {
        match self {
            QuizTier::Basic => 10,
            QuizTier::Intermediate => 15,
            QuizTier::Master => 20,
        }
    }

    /// Bonus added when the tier is passed
    pub fn completion_bonus(self) -> i64 {
        match self {
            QuizTier::Basic => 50,
            QuizTier::Intermediate => 100,
            QuizTier::Master => 200,
        }
    }

    pub fn next(self) -> Option<QuizTier> {
        match self {
            QuizTier::Basic => Some(QuizTier::Intermediate),
            QuizTier::Intermediate => Some(QuizTier::Master),
            QuizTier::Master => None,
        }
    }
}

impl std::str::FromStr for QuizTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(QuizTier::Basic),
            "intermediate" => Ok(QuizTier::Intermediate),
            "master" => Ok(QuizTier::Master),
            other => Err(format!("Unknown quiz tier: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EbookQuizProgress {
    pub book_id: String,
    pub quiz_tier: QuizTier,
    pub is_unlocked: bool,
    pub is_completed: bool,
    pub best_score: i64,
    pub total_attempts: i64,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// One answered e-book quiz question
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub book_id: String,
    pub quiz_tier: QuizTier,
    pub question_id: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub hints_used: i64,
    pub base_points: i64,
    pub earned_points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuizAttempt {
    pub question_id: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub hints_used: i64,
    pub base_points: i64,
    pub earned_points: i64,
}

/// A finished standalone quiz (Pokémon, Dragon Village, English)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizResult {
    pub id: i64,
    pub quiz_kind: String,
    pub total_questions: i64,
    pub correct_count: i64,
    pub score_percent: i64,
    pub stars: i64,
    pub max_streak: i64,
    pub points_awarded: i64,
    pub ticket_minutes: i64,
    pub created_at: DateTime<Utc>,
}

// ===== Backups =====

/// Backup record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Backup {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub path: String,
    pub size: i64,
    pub manifest_hash: String,
}
