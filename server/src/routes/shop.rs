//! Shop items and the purchase approval flow

use super::{Caregiver, SharedState};
use crate::database::{
    CreateShopItemRequest, PointTransaction, Purchase, PurchaseEntry, PurchaseStatus, ShopItem,
    UpdateShopItemRequest,
};
use crate::error::Result;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/shop/items", get(list_items).post(create_item))
        .route("/api/shop/items/:id", put(update_item))
        .route("/api/shop/purchases", get(list_purchases).post(request_purchase))
        .route("/api/shop/purchases/:id", get(get_purchase))
        .route("/api/shop/purchases/:id/approve", post(approve_purchase))
        .route("/api/shop/purchases/:id/reject", post(reject_purchase))
        .route("/api/shop/purchases/:id/complete", post(complete_purchase))
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemQuery {
    #[serde(default)]
    pub available_only: bool,
}

async fn list_items(
    State(state): State<SharedState>,
    Query(query): Query<ItemQuery>,
) -> Result<Json<Vec<ShopItem>>> {
    Ok(Json(state.shop.list_items(query.available_only).await?))
}

async fn create_item(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Json(req): Json<CreateShopItemRequest>,
) -> Result<Json<ShopItem>> {
    Ok(Json(state.shop.create_item(req).await?))
}

async fn update_item(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<i64>,
    Json(req): Json<UpdateShopItemRequest>,
) -> Result<Json<ShopItem>> {
    Ok(Json(state.shop.update_item(id, req).await?))
}

#[derive(Deserialize)]
pub struct PurchaseRequest {
    pub item_id: i64,
    #[serde(default)]
    pub note: Option<String>,
}

/// The child asks for an item; nothing is deducted until approval
async fn request_purchase(
    State(state): State<SharedState>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<Purchase>> {
    Ok(Json(
        state
            .shop
            .request_purchase(req.item_id, req.note.as_deref())
            .await?,
    ))
}

#[derive(Debug, Default, Deserialize)]
pub struct PurchaseQuery {
    pub status: Option<PurchaseStatus>,
}

async fn list_purchases(
    State(state): State<SharedState>,
    Query(query): Query<PurchaseQuery>,
) -> Result<Json<Vec<PurchaseEntry>>> {
    Ok(Json(state.shop.list_purchases(query.status).await?))
}

async fn get_purchase(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<PurchaseEntry>> {
    Ok(Json(state.shop.get_purchase(id).await?))
}

#[derive(Serialize)]
pub struct ApprovalResponse {
    pub purchase: PurchaseEntry,
    pub transaction: PointTransaction,
}

async fn approve_purchase(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<Json<ApprovalResponse>> {
    let (purchase, transaction) = state.shop.approve(id, &caregiver.name).await?;
    Ok(Json(ApprovalResponse {
        purchase,
        transaction,
    }))
}

async fn reject_purchase(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<Json<PurchaseEntry>> {
    Ok(Json(state.shop.reject(id, &caregiver.name).await?))
}

async fn complete_purchase(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<i64>,
) -> Result<Json<PurchaseEntry>> {
    Ok(Json(state.shop.complete(id).await?))
}
