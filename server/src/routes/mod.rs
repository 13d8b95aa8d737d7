//! HTTP routes exposed to the household apps
//!
//! All handlers follow the pattern:
//! - Take `State<Arc<AppState>>` first
//! - Return `Result<Json<T>>` so `AppError` picks the status code
//! - Take the `Caregiver` extractor when only a parent may act

mod activity;
mod auth;
mod books;
mod goals;
mod learning;
mod points;
mod quiz;
mod shop;
mod stats;
mod system;

pub use auth::{Caregiver, CAREGIVER_NAME_HEADER, CAREGIVER_PIN_HEADER};

use crate::app::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

type SharedState = Arc<AppState>;

/// Build the full API router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .merge(system::routes())
        .merge(points::routes())
        .merge(shop::routes())
        .merge(goals::routes())
        .merge(learning::routes())
        .merge(books::routes())
        .merge(quiz::routes())
        .merge(stats::routes())
        .merge(activity::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Query helper shared by listing endpoints
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<i64>,
}
