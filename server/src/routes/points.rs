//! Profile, ledger and rule endpoints

use super::{Caregiver, SharedState};
use crate::database::{
    CreateRuleRequest, PointRule, PointTransaction, Profile, TransactionEntry, UpdateRuleRequest,
};
use crate::error::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_TRANSACTION_LIMIT: i64 = 50;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/balance", get(get_balance))
        .route("/api/transactions", get(list_transactions))
        .route("/api/transactions/apply-rule", post(apply_rule))
        .route("/api/transactions/adjust", post(adjust))
        .route("/api/transactions/:id/cancel", post(cancel_transaction))
        .route("/api/rules", get(list_rules).post(create_rule))
        .route("/api/rules/categories", get(rule_categories))
        .route(
            "/api/rules/:id",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
}

async fn get_profile(State(state): State<SharedState>) -> Result<Json<Profile>> {
    Ok(Json(state.ledger.profile().await?))
}

#[derive(Serialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

async fn get_balance(State(state): State<SharedState>) -> Result<Json<BalanceResponse>> {
    let balance = state.ledger.balance().await?;
    Ok(Json(BalanceResponse { balance }))
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Newest first by default; a `from` bound switches to an oldest-first range
async fn list_transactions(
    State(state): State<SharedState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionEntry>>> {
    let entries = match query.from {
        Some(from) => {
            let to = query.to.unwrap_or_else(Utc::now);
            state.ledger.transactions_between(from, to).await?
        }
        None => {
            state
                .ledger
                .transactions(query.limit.unwrap_or(DEFAULT_TRANSACTION_LIMIT))
                .await?
        }
    };
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct ApplyRuleRequest {
    pub rule_id: i64,
}

async fn apply_rule(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Json(req): Json<ApplyRuleRequest>,
) -> Result<Json<PointTransaction>> {
    Ok(Json(state.ledger.apply_rule(req.rule_id, &caregiver.name).await?))
}

#[derive(Deserialize)]
pub struct AdjustRequest {
    pub amount: i64,
    pub note: String,
}

async fn adjust(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Json(req): Json<AdjustRequest>,
) -> Result<Json<PointTransaction>> {
    Ok(Json(
        state
            .ledger
            .adjust(req.amount, &req.note, &caregiver.name)
            .await?,
    ))
}

async fn cancel_transaction(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<Json<PointTransaction>> {
    Ok(Json(state.ledger.cancel(id, &caregiver.name).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct RuleQuery {
    #[serde(default)]
    pub active_only: bool,
}

async fn list_rules(
    State(state): State<SharedState>,
    Query(query): Query<RuleQuery>,
) -> Result<Json<Vec<PointRule>>> {
    Ok(Json(state.rules.list(query.active_only).await?))
}

async fn rule_categories(State(state): State<SharedState>) -> Json<&'static [&'static str]> {
    Json(state.rules.categories())
}

async fn get_rule(State(state): State<SharedState>, Path(id): Path<i64>) -> Result<Json<PointRule>> {
    Ok(Json(state.rules.get(id).await?))
}

async fn create_rule(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Json(req): Json<CreateRuleRequest>,
) -> Result<Json<PointRule>> {
    Ok(Json(state.rules.create(req).await?))
}

async fn update_rule(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRuleRequest>,
) -> Result<Json<PointRule>> {
    Ok(Json(state.rules.update(id, req).await?))
}

async fn delete_rule(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.rules.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
