//! Error types for the points server
//!
//! All errors use thiserror for structured error handling.
//! They serialize to their display string and map onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Profile not initialized")]
    ProfileMissing,

    #[error("Rule not found: {0}")]
    RuleNotFound(i64),

    #[error("Rule is not active: {0}")]
    RuleInactive(i64),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(i64),

    #[error("Transaction already cancelled or is itself a cancellation: {0}")]
    AlreadyCancelled(i64),

    #[error("Shop item not found: {0}")]
    ShopItemNotFound(i64),

    #[error("Shop item is not available: {0}")]
    ShopItemUnavailable(i64),

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(i64),

    #[error("Purchase {id} is {status}, expected {expected}")]
    InvalidPurchaseState {
        id: i64,
        status: String,
        expected: String,
    },

    #[error("Insufficient points: balance {balance}, required {required}")]
    InsufficientPoints { balance: i64, required: i64 },

    #[error("Goal not found: {0}")]
    GoalNotFound(i64),

    #[error("Word not found: {0}")]
    WordNotFound(i64),

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Quiz not found: {0}")]
    QuizNotFound(String),

    #[error("Quiz tier is locked: {book_id}/{tier}")]
    TierLocked { book_id: String, tier: String },

    #[error("Badge not found: {0}")]
    BadgeNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Caregiver PIN required")]
    Unauthorized,

    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Restore error: {0}")]
    Restore(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RuleNotFound(_)
            | AppError::TransactionNotFound(_)
            | AppError::ShopItemNotFound(_)
            | AppError::PurchaseNotFound(_)
            | AppError::GoalNotFound(_)
            | AppError::WordNotFound(_)
            | AppError::BookNotFound(_)
            | AppError::QuizNotFound(_)
            | AppError::BadgeNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::InsufficientPoints { .. }
            | AppError::RuleInactive(_)
            | AppError::ShopItemUnavailable(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyCancelled(_)
            | AppError::InvalidPurchaseState { .. }
            | AppError::TierLocked { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(serde_json::json!({ "error": self }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
