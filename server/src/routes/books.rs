//! E-book library, reading progress and the tiered book quizzes

use super::SharedState;
use crate::database::{EbookProgress, EbookQuizProgress, QuizAttempt, QuizTier};
use crate::error::Result;
use crate::services::ebooks::{BookPage, BookSummary, ReadingOutcome};
use crate::services::quiz::{PublicQuestion, TierAnswer, TierQuizOutcome};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/books", get(library))
        .route("/api/books/:book_id/pages/:page", get(page))
        .route(
            "/api/books/:book_id/progress",
            get(progress).put(save_progress),
        )
        .route("/api/books/:book_id/quizzes", get(tier_progress))
        .route(
            "/api/books/:book_id/quizzes/:tier",
            get(tier_questions).post(submit_tier),
        )
        .route(
            "/api/books/:book_id/quizzes/:tier/attempts",
            get(tier_attempts),
        )
}

async fn library(State(state): State<SharedState>) -> Result<Json<Vec<BookSummary>>> {
    Ok(Json(state.ebooks.library().await?))
}

async fn page(
    State(state): State<SharedState>,
    Path((book_id, page)): Path<(String, i64)>,
) -> Result<Json<BookPage>> {
    Ok(Json(state.ebooks.page(&book_id, page)?))
}

async fn progress(
    State(state): State<SharedState>,
    Path(book_id): Path<String>,
) -> Result<Json<Option<EbookProgress>>> {
    Ok(Json(state.ebooks.progress(&book_id).await?))
}

#[derive(Deserialize)]
pub struct SaveProgressRequest {
    pub current_page: i64,
}

async fn save_progress(
    State(state): State<SharedState>,
    Path(book_id): Path<String>,
    Json(req): Json<SaveProgressRequest>,
) -> Result<Json<ReadingOutcome>> {
    Ok(Json(
        state
            .ebooks
            .save_progress(&book_id, req.current_page, Utc::now())
            .await?,
    ))
}

async fn tier_progress(
    State(state): State<SharedState>,
    Path(book_id): Path<String>,
) -> Result<Json<Vec<EbookQuizProgress>>> {
    Ok(Json(state.quiz.tier_progress(&book_id).await?))
}

async fn tier_questions(
    State(state): State<SharedState>,
    Path((book_id, tier)): Path<(String, QuizTier)>,
) -> Result<Json<Vec<PublicQuestion>>> {
    Ok(Json(state.quiz.tier_questions(&book_id, tier).await?))
}

#[derive(Deserialize)]
pub struct TierSubmission {
    pub answers: Vec<TierAnswer>,
}

async fn submit_tier(
    State(state): State<SharedState>,
    Path((book_id, tier)): Path<(String, QuizTier)>,
    Json(req): Json<TierSubmission>,
) -> Result<Json<TierQuizOutcome>> {
    Ok(Json(
        state
            .quiz
            .submit_tier(&book_id, tier, &req.answers, Utc::now())
            .await?,
    ))
}

async fn tier_attempts(
    State(state): State<SharedState>,
    Path((book_id, tier)): Path<(String, QuizTier)>,
) -> Result<Json<Vec<QuizAttempt>>> {
    Ok(Json(state.quiz.tier_attempts(&book_id, tier).await?))
}
