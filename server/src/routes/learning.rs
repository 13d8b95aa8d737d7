//! Vocabulary, flashcards, voice practice and the word game

use super::SharedState;
use crate::database::{CategorySummary, Difficulty, EnglishWord, WordProgress};
use crate::error::Result;
use crate::services::learning::{CardResult, GameMode, GameOutcome, LearningReward};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/words", get(list_words))
        .route("/api/words/categories", get(categories))
        .route("/api/words/random", get(random_word))
        .route("/api/words/progress", get(progress))
        .route("/api/words/:id/review", post(record_review))
        .route("/api/learning/flashcards", post(complete_flashcards))
        .route("/api/learning/category", post(complete_category))
        .route("/api/learning/voice", post(complete_voice))
        .route("/api/learning/game", post(answer_word_game))
}

#[derive(Debug, Default, Deserialize)]
pub struct WordQuery {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

async fn list_words(
    State(state): State<SharedState>,
    Query(query): Query<WordQuery>,
) -> Result<Json<Vec<EnglishWord>>> {
    Ok(Json(
        state
            .learning
            .list_words(query.category.as_deref(), query.difficulty)
            .await?,
    ))
}

async fn categories(State(state): State<SharedState>) -> Result<Json<Vec<CategorySummary>>> {
    Ok(Json(state.learning.categories().await?))
}

async fn random_word(
    State(state): State<SharedState>,
    Query(query): Query<WordQuery>,
) -> Result<Json<EnglishWord>> {
    Ok(Json(state.learning.random_word(query.difficulty).await?))
}

async fn progress(State(state): State<SharedState>) -> Result<Json<Vec<WordProgress>>> {
    Ok(Json(state.learning.progress().await?))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub correct: bool,
}

async fn record_review(
    State(state): State<SharedState>,
    Path(word_id): Path<i64>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<WordProgress>> {
    Ok(Json(
        state
            .learning
            .record_review(word_id, req.correct, Utc::now())
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct FlashcardRequest {
    pub cards: Vec<CardResult>,
}

async fn complete_flashcards(
    State(state): State<SharedState>,
    Json(req): Json<FlashcardRequest>,
) -> Result<Json<LearningReward>> {
    Ok(Json(
        state
            .learning
            .complete_flashcards(&req.cards, Utc::now())
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

async fn complete_category(
    State(state): State<SharedState>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<LearningReward>> {
    Ok(Json(
        state
            .learning
            .complete_category(&req.category, Utc::now())
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct VoiceRequest {
    pub item_count: i64,
}

async fn complete_voice(
    State(state): State<SharedState>,
    Json(req): Json<VoiceRequest>,
) -> Result<Json<LearningReward>> {
    Ok(Json(
        state
            .learning
            .complete_voice(req.item_count, Utc::now())
            .await?,
    ))
}

#[derive(Deserialize)]
pub struct GameAnswerRequest {
    pub word_id: i64,
    pub mode: GameMode,
    pub level: i64,
    pub answer: String,
}

async fn answer_word_game(
    State(state): State<SharedState>,
    Json(req): Json<GameAnswerRequest>,
) -> Result<Json<GameOutcome>> {
    Ok(Json(
        state
            .learning
            .answer_word_game(req.word_id, req.mode, req.level, &req.answer, Utc::now())
            .await?,
    ))
}
