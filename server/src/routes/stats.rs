//! Statistics and the dashboard overview

use super::SharedState;
use crate::error::Result;
use crate::services::statistics::{
    Dashboard, DailyBucket, LearningAnalytics, PointsReport, PurchaseAnalytics, TimeRange,
};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/stats/dashboard", get(dashboard))
        .route("/api/stats/points", get(points_report))
        .route("/api/stats/daily", get(daily))
        .route("/api/stats/learning", get(learning))
        .route("/api/stats/purchases", get(purchases))
        .route("/api/stats/streaks", get(streaks))
}

async fn dashboard(State(state): State<SharedState>) -> Result<Json<Dashboard>> {
    Ok(Json(state.statistics.dashboard(Utc::now()).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    /// today, week, month, year or all
    pub range: Option<String>,
}

async fn points_report(
    State(state): State<SharedState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<PointsReport>> {
    let range = match query.range.as_deref() {
        Some(raw) => raw.parse()?,
        None => TimeRange::Week,
    };
    Ok(Json(state.statistics.points_report(range, Utc::now()).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyQuery {
    pub days: Option<i64>,
}

async fn daily(
    State(state): State<SharedState>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<Vec<DailyBucket>>> {
    Ok(Json(state.statistics.daily(query.days, Utc::now()).await?))
}

async fn learning(State(state): State<SharedState>) -> Result<Json<LearningAnalytics>> {
    Ok(Json(state.statistics.learning().await?))
}

async fn purchases(State(state): State<SharedState>) -> Result<Json<PurchaseAnalytics>> {
    Ok(Json(state.statistics.purchases().await?))
}

#[derive(Serialize)]
pub struct StreakResponse {
    pub current: i64,
    pub longest: i64,
}

async fn streaks(State(state): State<SharedState>) -> Result<Json<StreakResponse>> {
    let (current, longest) = state.statistics.learning_streaks(Utc::now()).await?;
    Ok(Json(StreakResponse { current, longest }))
}
