//! Health, app info, caregiver PIN, backups and auto-backup settings

use super::{Caregiver, SharedState};
use crate::database::Backup;
use crate::error::Result;
use crate::services::backup::StagedRestore;
use crate::services::settings::AutoBackupSettings;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/info", get(app_info))
        .route("/api/settings/pin", put(set_pin).delete(clear_pin))
        .route(
            "/api/settings/auto-backup",
            get(get_auto_backup).put(update_auto_backup),
        )
        .route("/api/backups", get(list_backups).post(create_backup))
        .route("/api/backups/:id/restore", post(restore_backup))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Serialize)]
pub struct AppInfo {
    pub version: String,
    pub profile_name: String,
    pub data_dir: String,
    pub utc_offset_seconds: i32,
    /// True when no caregiver PIN is configured
    pub open_household: bool,
    pub uptime_secs: u64,
}

async fn app_info(State(state): State<SharedState>) -> Result<Json<AppInfo>> {
    let profile = state.ledger.profile().await?;
    Ok(Json(AppInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        profile_name: profile.name,
        data_dir: state.data_dir.to_string_lossy().to_string(),
        utc_offset_seconds: state.tz.local_minus_utc(),
        open_household: !state.settings.has_caregiver_pin().await?,
        uptime_secs: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Deserialize)]
pub struct PinRequest {
    pub pin: String,
}

async fn set_pin(
    State(state): State<SharedState>,
    caregiver: Caregiver,
    Json(req): Json<PinRequest>,
) -> Result<StatusCode> {
    tracing::info!("Caregiver PIN change requested by {}", caregiver.name);
    state.settings.set_caregiver_pin(&req.pin).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_pin(State(state): State<SharedState>, _caregiver: Caregiver) -> Result<StatusCode> {
    state.settings.clear_caregiver_pin().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_auto_backup(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
) -> Result<Json<AutoBackupSettings>> {
    Ok(Json(state.settings.get_auto_backup().await?))
}

/// Save auto-backup settings and reschedule the backup job
async fn update_auto_backup(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Json(settings): Json<AutoBackupSettings>,
) -> Result<Json<AutoBackupSettings>> {
    state.settings.update_auto_backup(settings.clone()).await?;
    state.scheduler.apply_settings(&settings).await?;
    Ok(Json(settings))
}

async fn list_backups(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
) -> Result<Json<Vec<Backup>>> {
    Ok(Json(state.backup.list_backups().await?))
}

async fn create_backup(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
) -> Result<Json<Backup>> {
    Ok(Json(state.backup.create_backup().await?))
}

async fn restore_backup(
    State(state): State<SharedState>,
    _caregiver: Caregiver,
    Path(id): Path<String>,
) -> Result<Json<StagedRestore>> {
    Ok(Json(state.backup.stage_restore_by_id(&id).await?))
}
