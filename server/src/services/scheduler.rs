//! Scheduler service
//!
//! Runs automatic backups on a cron schedule derived from the auto-backup
//! settings. At most one backup job is registered at a time.

use crate::error::{AppError, Result};
use crate::services::backup::BackupService;
use crate::services::settings::AutoBackupSettings;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use uuid::Uuid;

/// Auto-backup frequency options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupFrequency {
    Minutes(u32),
    Hours(u32),
    Days(u32),
}

impl BackupFrequency {
    /// Six-field cron expression (seconds first)
    pub fn to_cron(self) -> String {
        match self {
            BackupFrequency::Minutes(1) => "0 * * * * *".to_string(),
            BackupFrequency::Minutes(m) => format!("0 */{} * * * *", m),
            BackupFrequency::Hours(1) => "0 0 * * * *".to_string(),
            BackupFrequency::Hours(h) => format!("0 0 */{} * * *", h),
            // Daily runs happen at 03:00, after bedtime rewards are in
            BackupFrequency::Days(1) => "0 0 3 * * *".to_string(),
            BackupFrequency::Days(d) => format!("0 0 3 */{} * *", d),
        }
    }
}

impl FromStr for BackupFrequency {
    type Err = AppError;

    /// Accepts "5m", "2h", "3d" or "daily", "weekly", "monthly"
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = |reason: String| AppError::Validation(reason);

        match s.as_str() {
            "daily" => return Ok(BackupFrequency::Days(1)),
            "weekly" => return Ok(BackupFrequency::Days(7)),
            "monthly" => return Ok(BackupFrequency::Days(30)),
            _ => {}
        }

        let Some(unit) = s.chars().last() else {
            return Err(invalid("Empty frequency string".to_string()));
        };
        let number_part = &s[..s.len() - unit.len_utf8()];

        let value: u32 = number_part
            .parse()
            .map_err(|_| invalid(format!("Invalid number in frequency: {}", s)))?;

        if value == 0 {
            return Err(invalid(
                "Frequency value must be greater than 0".to_string(),
            ));
        }

        match unit {
            'm' if value < 60 => Ok(BackupFrequency::Minutes(value)),
            'h' if value < 24 => Ok(BackupFrequency::Hours(value)),
            'd' if value <= 31 => Ok(BackupFrequency::Days(value)),
            'm' | 'h' | 'd' => Err(invalid(format!("Frequency out of range: {}", s))),
            _ => Err(invalid(format!(
                "Invalid frequency unit '{}'. Use 'm' (minutes), 'h' (hours), or 'd' (days)",
                unit
            ))),
        }
    }
}

/// Scheduler service for automatic backups
pub struct SchedulerService {
    scheduler: Arc<RwLock<JobScheduler>>,
    backup_service: BackupService,
    current_job_id: Arc<RwLock<Option<Uuid>>>,
}

impl SchedulerService {
    pub async fn new(backup_service: BackupService) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::Backup(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler: Arc::new(RwLock::new(scheduler)),
            backup_service,
            current_job_id: Arc::new(RwLock::new(None)),
        })
    }

    pub async fn start(&self) -> Result<()> {
        let scheduler = self.scheduler.read().await;
        scheduler
            .start()
            .await
            .map_err(|e| AppError::Backup(format!("Failed to start scheduler: {}", e)))?;
        tracing::info!("Backup scheduler started");
        Ok(())
    }

    /// Replace the current job according to `settings`
    pub async fn apply_settings(&self, settings: &AutoBackupSettings) -> Result<()> {
        let frequency = BackupFrequency::from_str(&settings.frequency)?;
        self.schedule_backup(frequency, settings.enabled).await
    }

    pub async fn schedule_backup(&self, frequency: BackupFrequency, enabled: bool) -> Result<()> {
        self.cancel_backup().await?;

        if !enabled {
            tracing::info!("Automatic backups disabled");
            return Ok(());
        }

        let cron_expr = frequency.to_cron();
        let backup_service = self.backup_service.clone();

        let job = Job::new_async(cron_expr.clone(), move |_uuid, _l| {
            let backup_service = backup_service.clone();
            Box::pin(async move {
                tracing::info!("Running scheduled automatic backup");

                match backup_service.create_backup().await {
                    Ok(backup) => tracing::info!("Automatic backup created: {}", backup.path),
                    Err(e) => tracing::error!("Automatic backup failed: {}", e),
                }
            })
        })
        .map_err(|e| AppError::Backup(format!("Failed to create backup job: {}", e)))?;

        let job_id = job.guid();

        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job)
            .await
            .map_err(|e| AppError::Backup(format!("Failed to schedule job: {}", e)))?;

        *self.current_job_id.write().await = Some(job_id);

        tracing::info!(
            "Automatic backup scheduled: {:?} ({})",
            frequency,
            cron_expr
        );
        Ok(())
    }

    pub async fn cancel_backup(&self) -> Result<()> {
        let mut current_job = self.current_job_id.write().await;

        if let Some(job_id) = *current_job {
            let scheduler = self.scheduler.write().await;
            scheduler
                .remove(&job_id)
                .await
                .map_err(|e| AppError::Backup(format!("Failed to remove job: {}", e)))?;

            *current_job = None;
            tracing::info!("Automatic backup schedule cancelled");
        }

        Ok(())
    }

    pub async fn is_scheduled(&self) -> bool {
        self.current_job_id.read().await.is_some()
    }

    pub async fn shutdown(&self) -> Result<()> {
        let mut scheduler = self.scheduler.write().await;
        scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::Backup(format!("Failed to shutdown scheduler: {}", e)))?;
        tracing::info!("Backup scheduler shutdown");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequencies() {
        assert_eq!("daily".parse::<BackupFrequency>().unwrap(), BackupFrequency::Days(1));
        assert_eq!("Weekly".parse::<BackupFrequency>().unwrap(), BackupFrequency::Days(7));
        assert_eq!("30m".parse::<BackupFrequency>().unwrap(), BackupFrequency::Minutes(30));
        assert_eq!(" 6h ".parse::<BackupFrequency>().unwrap(), BackupFrequency::Hours(6));
        assert_eq!("2d".parse::<BackupFrequency>().unwrap(), BackupFrequency::Days(2));
    }

    #[test]
    fn test_reject_bad_frequencies() {
        for bad in ["", "0h", "5x", "h", "90m", "48h", "일d"] {
            assert!(bad.parse::<BackupFrequency>().is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_cron_expressions() {
        assert_eq!(BackupFrequency::Minutes(15).to_cron(), "0 */15 * * * *");
        assert_eq!(BackupFrequency::Hours(1).to_cron(), "0 0 * * * *");
        assert_eq!(BackupFrequency::Days(1).to_cron(), "0 0 3 * * *");
        assert_eq!(BackupFrequency::Days(7).to_cron(), "0 0 3 */7 * *");
    }
}
