//! Savings goals and badges

use super::{Caregiver, SharedState};
use crate::catalog::BadgeDefinition;
use crate::database::{CreateGoalRequest, Goal};
use crate::error::Result;
use crate::services::badges::BadgeStatus;
use crate::services::goals::GoalView;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/:id", get(get_goal).delete(delete_goal))
        .route("/api/goals/:id/progress", put(update_progress))
        .route("/api/goals/:id/cancel", post(cancel_goal))
        .route("/api/badges", get(list_badges))
        .route("/api/badges/check", post(check_badges))
        .route("/api/badges/:code/award", post(award_badge))
}

async fn list_goals(State(state): State<SharedState>) -> Result<Json<Vec<GoalView>>> {
    Ok(Json(state.goals.list().await?))
}

async fn create_goal(
    State(state): State<SharedState>,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<Goal>> {
    Ok(Json(state.goals.create(req).await?))
}

async fn get_goal(State(state): State<SharedState>, Path(id): Path<i64>) -> Result<Json<GoalView>> {
    Ok(Json(state.goals.get(id).await?))
}

#[derive(Deserialize)]
pub struct ProgressRequest {
    pub progress: i64,
}

async fn update_progress(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<Goal>> {
    Ok(Json(state.goals.update_progress(id, req.progress).await?))
}

async fn cancel_goal(State(state): State<SharedState>, Path(id): Path<i64>) -> Result<Json<Goal>> {
    Ok(Json(state.goals.cancel(id).await?))
}

async fn delete_goal(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.goals.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_badges(State(state): State<SharedState>) -> Result<Json<Vec<BadgeStatus>>> {
    Ok(Json(state.badges.list(Utc::now()).await?))
}

async fn check_badges(State(state): State<SharedState>) -> Result<Json<Vec<BadgeDefinition>>> {
    Ok(Json(state.badges.check_and_award(Utc::now()).await?))
}

#[derive(Serialize)]
pub struct AwardResponse {
    pub code: String,
    /// False when the badge was already earned
    pub newly_awarded: bool,
}

async fn award_badge(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(code): Path<String>,
) -> Result<Json<AwardResponse>> {
    let newly_awarded = state.badges.award(&code, Utc::now()).await?;
    Ok(Json(AwardResponse {
        code,
        newly_awarded,
    }))
}
