//! Application configuration constants
//!
//! Central location for configuration constants, reward amounts,
//! and validation boundaries used throughout the server.

// ===== Server =====

/// Default listen address for the HTTP API
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default UTC offset in hours used for day boundaries (KST)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Database file name inside the data directory
pub const DB_FILE_NAME: &str = "db.sqlite";

/// Staged database waiting to replace the live one on next startup
pub const PENDING_RESTORE_FILE_NAME: &str = "restore_pending.sqlite";

/// Settings file name inside the data directory
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Staged settings file applied together with a pending restore
pub const PENDING_SETTINGS_FILE_NAME: &str = "settings_pending.json";

/// Directory holding backup archives inside the data directory
pub const BACKUPS_DIR_NAME: &str = "backups";

/// Name of the single child profile created on first start
pub const DEFAULT_PROFILE_NAME: &str = "주우";

/// Capacity of the activity broadcast channel
pub const ACTIVITY_CHANNEL_CAPACITY: usize = 100;

// ===== Ledger Limits =====

/// Largest absolute amount a caregiver may adjust in one manual entry
pub const MAX_MANUAL_ADJUSTMENT: i64 = 100_000;

/// Maximum length for rule names, item names, goal titles and notes
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum length for a transaction note
pub const MAX_NOTE_LENGTH: usize = 500;

/// Maximum number of transactions returned by a single listing
pub const MAX_TRANSACTION_PAGE: i64 = 500;

/// Number of transactions shown on the dashboard
pub const DASHBOARD_RECENT_COUNT: i64 = 5;

// ===== Learning Rewards =====

/// Reward for finishing a flashcard deck
pub const FLASHCARD_DECK_REWARD: i64 = 500;

/// Reward for finishing every word in a vocabulary category
pub const WORD_CATEGORY_REWARD: i64 = 300;

/// Reward for finishing a voice learning session
pub const VOICE_LEARNING_REWARD: i64 = 500;

/// Points per level for a correct word-game answer
pub const WORD_GAME_POINTS_PER_LEVEL: i64 = 100;

/// Highest word-game level
pub const MAX_WORD_GAME_LEVEL: i64 = 5;

/// Mastery level at which a word counts as mastered
pub const MAX_MASTERY_LEVEL: i64 = 3;

/// Reward for reading an e-book to the last page the first time
pub const EBOOK_COMPLETION_REWARD: i64 = 500;

/// Number of questions in a generated English meaning quiz
pub const ENGLISH_QUIZ_QUESTIONS: usize = 10;

/// Number of answer options per English quiz question
pub const ENGLISH_QUIZ_OPTIONS: usize = 4;

/// Number of questions drawn for the Pokémon and Dragon Village quizzes
pub const STANDALONE_QUIZ_QUESTIONS: usize = 10;

/// Percentage of correct answers needed to pass an e-book tier quiz
pub const EBOOK_QUIZ_PASS_PERCENT: i64 = 60;

// ===== Statistics =====

/// Default number of days in the daily chart
pub const DEFAULT_DAILY_DAYS: i64 = 7;

/// Largest number of days the daily chart may span
pub const MAX_DAILY_DAYS: i64 = 366;

/// Trend changes within this many percent are reported as stable
pub const TREND_STABLE_BAND_PERCENT: i64 = 5;

// ===== Auto-Backup Settings Limits =====

/// Minimum number of backup files kept on disk
pub const MIN_BACKUP_RETENTION_COUNT: u32 = 1;

/// Maximum number of backup files kept on disk
pub const MAX_BACKUP_RETENTION_COUNT: u32 = 365;

/// Default number of backup files kept on disk
pub const DEFAULT_BACKUP_RETENTION_COUNT: u32 = 10;

// ===== Caregiver PIN =====

/// Minimum caregiver PIN length
pub const MIN_PIN_LENGTH: usize = 4;

/// Maximum caregiver PIN length
pub const MAX_PIN_LENGTH: usize = 32;
