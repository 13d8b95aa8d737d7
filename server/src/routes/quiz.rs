//! Standalone quizzes: Pokémon, Dragon Village and the English word quiz

use super::{LimitQuery, SharedState};
use crate::catalog::QuizDifficulty;
use crate::database::QuizResult;
use crate::error::Result;
use crate::services::quiz::{QuizKind, QuizOutcome, QuizSheet, SubmittedAnswer};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

const DEFAULT_RESULT_LIMIT: i64 = 20;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/quizzes/results", get(recent_results))
        .route("/api/quizzes/:kind/start", post(start_quiz))
        .route("/api/quizzes/:kind/submit", post(submit_quiz))
}

#[derive(Deserialize)]
pub struct StartQuery {
    pub difficulty: Option<QuizDifficulty>,
}

async fn start_quiz(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    Query(query): Query<StartQuery>,
) -> Result<Json<QuizSheet>> {
    let kind: QuizKind = kind.parse()?;
    Ok(Json(state.quiz.start(kind, query.difficulty).await?))
}

#[derive(Deserialize)]
pub struct QuizSubmission {
    /// Level the sheet was drawn at
    #[serde(default)]
    pub difficulty: Option<QuizDifficulty>,
    pub answers: Vec<SubmittedAnswer>,
}

async fn submit_quiz(
    State(state): State<SharedState>,
    Path(kind): Path<String>,
    Json(req): Json<QuizSubmission>,
) -> Result<Json<QuizOutcome>> {
    let kind: QuizKind = kind.parse()?;
    Ok(Json(
        state
            .quiz
            .submit(kind, req.difficulty, &req.answers, Utc::now())
            .await?,
    ))
}

async fn recent_results(
    State(state): State<SharedState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<QuizResult>>> {
    Ok(Json(
        state
            .quiz
            .recent_results(query.limit.unwrap_or(DEFAULT_RESULT_LIMIT))
            .await?,
    ))
}
