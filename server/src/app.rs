//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::{BACKUPS_DIR_NAME, DB_FILE_NAME, DEFAULT_PROFILE_NAME};
use crate::database::{create_pool, seed::seed_defaults, Repository};
use crate::error::{AppError, Result};
use crate::services::backup::apply_pending_restore;
use crate::services::{
    ActivityHub, BackupService, BadgesService, EbooksService, GoalsService, LearningService,
    LedgerService, QuizService, RulesService, SchedulerService, SettingsService, ShopService,
    StatisticsService,
};
use chrono::FixedOffset;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Central application state holding all services
pub struct AppState {
    pub repo: Repository,
    pub data_dir: PathBuf,
    pub tz: FixedOffset,
    pub started_at: Instant,
    pub hub: ActivityHub,
    pub ledger: LedgerService,
    pub rules: RulesService,
    pub shop: ShopService,
    pub goals: GoalsService,
    pub badges: BadgesService,
    pub learning: LearningService,
    pub ebooks: EbooksService,
    pub quiz: QuizService,
    pub statistics: StatisticsService,
    pub settings: SettingsService,
    pub backup: BackupService,
    pub scheduler: SchedulerService,
}

impl AppState {
    /// Wire every service around one repository and one activity hub
    pub async fn new(repo: Repository, data_dir: PathBuf, tz: FixedOffset) -> Result<Self> {
        let hub = ActivityHub::new();
        let ledger = LedgerService::new(repo.clone(), hub.clone());
        let badges = BadgesService::new(repo.clone(), hub.clone(), tz);
        let settings = SettingsService::new(data_dir.clone());
        let backup = BackupService::new(repo.clone(), data_dir.clone(), settings.clone());
        let scheduler = SchedulerService::new(backup.clone()).await?;

        Ok(Self {
            tz,
            started_at: Instant::now(),
            rules: RulesService::new(repo.clone()),
            shop: ShopService::new(repo.clone(), ledger.clone(), hub.clone()),
            goals: GoalsService::new(repo.clone()),
            learning: LearningService::new(repo.clone(), ledger.clone(), badges.clone()),
            ebooks: EbooksService::new(repo.clone(), ledger.clone(), badges.clone()),
            quiz: QuizService::new(repo.clone(), ledger.clone(), badges.clone()),
            statistics: StatisticsService::new(repo.clone(), tz),
            repo,
            data_dir,
            hub,
            ledger,
            badges,
            settings,
            backup,
            scheduler,
        })
    }

    /// Stop scheduled jobs and close the pool so a staged restore can be
    /// swapped in safely
    pub async fn shutdown(&self) -> Result<()> {
        self.scheduler.shutdown().await?;
        self.repo.pool().close().await;
        tracing::info!("Application shut down");
        Ok(())
    }
}

/// Parse an hour offset such as 9 or -5 into a fixed timezone
pub fn utc_offset(hours: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(hours * 3600)
        .ok_or_else(|| AppError::Validation(format!("Invalid UTC offset: {} hours", hours)))
}

/// Application setup - called once on startup
pub async fn setup(data_dir: &Path, tz: FixedOffset) -> Result<Arc<AppState>> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", data_dir);

    tokio::fs::create_dir_all(data_dir).await?;
    tokio::fs::create_dir_all(data_dir.join(BACKUPS_DIR_NAME)).await?;

    if apply_pending_restore(data_dir).await? {
        tracing::info!("Started from a restored backup");
    }

    let pool = create_pool(&data_dir.join(DB_FILE_NAME)).await?;
    let repo = Repository::new(pool);
    seed_defaults(&repo, DEFAULT_PROFILE_NAME).await?;

    let state = AppState::new(repo, data_dir.to_path_buf(), tz).await?;

    let settings = state.settings.load().await?;
    if settings.caregiver_pin_hash.is_none() {
        tracing::warn!("No caregiver PIN set; caregiver actions are open to everyone");
    }

    state.scheduler.start().await?;
    if let Err(e) = state.scheduler.apply_settings(&settings.auto_backup).await {
        // A bad schedule must not keep the household from using the app
        tracing::error!("Failed to schedule automatic backups: {}", e);
    }

    tracing::info!("Application initialized successfully");
    Ok(Arc::new(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_utc_offset() {
        assert_eq!(utc_offset(9).unwrap().local_minus_utc(), 9 * 3600);
        assert_eq!(utc_offset(-5).unwrap().local_minus_utc(), -5 * 3600);
        assert!(utc_offset(30).is_err());
    }

    #[tokio::test]
    async fn test_setup_seeds_fresh_data_dir() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("juwoo");

        let state = setup(&data_dir, utc_offset(9).unwrap()).await.unwrap();

        assert!(data_dir.join(DB_FILE_NAME).exists());
        assert!(data_dir.join(BACKUPS_DIR_NAME).is_dir());
        assert_eq!(state.ledger.profile().await.unwrap().name, DEFAULT_PROFILE_NAME);
        assert!(!state.rules.list(true).await.unwrap().is_empty());
        assert!(!state.scheduler.is_scheduled().await);

        state.shutdown().await.unwrap();
        assert!(state.repo.pool().is_closed());
    }
}
