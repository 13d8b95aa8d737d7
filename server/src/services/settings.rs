//! Settings service
//!
//! Household settings persisted as a JSON file in the data directory.
//! Missing fields fall back to defaults so older files keep loading.

use crate::config::{
    DEFAULT_BACKUP_RETENTION_COUNT, MAX_BACKUP_RETENTION_COUNT, MIN_BACKUP_RETENTION_COUNT,
    SETTINGS_FILE_NAME,
};
use crate::crypto;
use crate::error::{AppError, Result};
use crate::services::scheduler::BackupFrequency;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::fs;

/// Auto-backup configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoBackupSettings {
    #[serde(default)]
    pub enabled: bool,
    /// "30m", "6h", "1d", "daily", "weekly" or "monthly"
    #[serde(default = "default_backup_frequency")]
    pub frequency: String,
    /// Number of backup files kept on disk
    #[serde(default = "default_backup_retention")]
    pub retention_count: u32,
}

fn default_backup_frequency() -> String {
    "daily".to_string()
}

fn default_backup_retention() -> u32 {
    DEFAULT_BACKUP_RETENTION_COUNT
}

impl Default for AutoBackupSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            frequency: default_backup_frequency(),
            retention_count: default_backup_retention(),
        }
    }
}

impl AutoBackupSettings {
    pub fn validate(&self) -> Result<()> {
        BackupFrequency::from_str(&self.frequency)?;
        if !(MIN_BACKUP_RETENTION_COUNT..=MAX_BACKUP_RETENTION_COUNT).contains(&self.retention_count) {
            return Err(AppError::Validation(format!(
                "Retention count must be between {} and {}",
                MIN_BACKUP_RETENTION_COUNT, MAX_BACKUP_RETENTION_COUNT
            )));
        }
        Ok(())
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Argon2 PHC string of the caregiver PIN. `None` means open household mode.
    #[serde(default)]
    pub caregiver_pin_hash: Option<String>,
    #[serde(default)]
    pub auto_backup: AutoBackupSettings,
}

/// Service for managing application settings
#[derive(Clone)]
pub struct SettingsService {
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            settings_path: data_dir.join(SETTINGS_FILE_NAME),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.settings_path
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<AppSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = AppSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: AppSettings = serde_json::from_str(&content)
            .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?;

        Ok(settings)
    }

    pub async fn save(&self, settings: &AppSettings) -> Result<()> {
        let content = serde_json::to_string_pretty(settings)?;

        fs::write(&self.settings_path, content).await?;
        tracing::debug!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    pub async fn get_auto_backup(&self) -> Result<AutoBackupSettings> {
        Ok(self.load().await?.auto_backup)
    }

    pub async fn update_auto_backup(&self, auto_backup: AutoBackupSettings) -> Result<()> {
        auto_backup.validate()?;

        let mut settings = self.load().await?;
        settings.auto_backup = auto_backup;
        self.save(&settings).await
    }

    pub async fn has_caregiver_pin(&self) -> Result<bool> {
        Ok(self.load().await?.caregiver_pin_hash.is_some())
    }

    /// Hash and store a new caregiver PIN
    pub async fn set_caregiver_pin(&self, pin: &str) -> Result<()> {
        let hash = crypto::hash_pin(pin)?;

        let mut settings = self.load().await?;
        settings.caregiver_pin_hash = Some(hash);
        self.save(&settings).await?;

        tracing::info!("Caregiver PIN updated");
        Ok(())
    }

    pub async fn clear_caregiver_pin(&self) -> Result<()> {
        let mut settings = self.load().await?;
        settings.caregiver_pin_hash = None;
        self.save(&settings).await?;

        tracing::warn!("Caregiver PIN removed, caregiver endpoints are open");
        Ok(())
    }

    /// Check a presented PIN. Always true when no PIN is configured.
    pub async fn verify_caregiver_pin(&self, pin: Option<&str>) -> Result<bool> {
        match (self.load().await?.caregiver_pin_hash, pin) {
            (None, _) => Ok(true),
            (Some(_), None) => Ok(false),
            (Some(hash), Some(pin)) => crypto::verify_pin(pin, &hash),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, _temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert!(settings.caregiver_pin_hash.is_none());
        assert!(!settings.auto_backup.enabled);
        assert_eq!(settings.auto_backup.frequency, "daily");
        assert_eq!(
            settings.auto_backup.retention_count,
            DEFAULT_BACKUP_RETENTION_COUNT
        );
        assert!(service.path().exists());
    }

    #[tokio::test]
    async fn test_auto_backup_update_and_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let updated = AutoBackupSettings {
            enabled: true,
            frequency: "6h".to_string(),
            retention_count: 5,
        };

        {
            let service = SettingsService::new(temp_dir.path().to_path_buf());
            service.update_auto_backup(updated.clone()).await.unwrap();
        }

        let service = SettingsService::new(temp_dir.path().to_path_buf());
        assert_eq!(service.get_auto_backup().await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_auto_backup_validation() {
        let (service, _temp) = create_test_service();

        let bad_frequency = AutoBackupSettings {
            frequency: "sometimes".to_string(),
            ..Default::default()
        };
        assert!(service.update_auto_backup(bad_frequency).await.is_err());

        let bad_retention = AutoBackupSettings {
            retention_count: 0,
            ..Default::default()
        };
        assert!(service.update_auto_backup(bad_retention).await.is_err());
    }

    #[tokio::test]
    async fn test_caregiver_pin_lifecycle() {
        let (service, _temp) = create_test_service();

        assert!(service.verify_caregiver_pin(None).await.unwrap());

        service.set_caregiver_pin("2468").await.unwrap();
        assert!(service.has_caregiver_pin().await.unwrap());
        assert!(service.verify_caregiver_pin(Some("2468")).await.unwrap());
        assert!(!service.verify_caregiver_pin(Some("0000")).await.unwrap());
        assert!(!service.verify_caregiver_pin(None).await.unwrap());

        service.clear_caregiver_pin().await.unwrap();
        assert!(service.verify_caregiver_pin(None).await.unwrap());
    }

    #[tokio::test]
    async fn test_partial_file_uses_defaults() {
        let (service, _temp) = create_test_service();
        tokio::fs::write(service.path(), r#"{"auto_backup": {"enabled": true}}"#)
            .await
            .unwrap();

        let settings = service.load().await.unwrap();

        assert!(settings.auto_backup.enabled);
        assert_eq!(settings.auto_backup.frequency, "daily");
        assert!(settings.caregiver_pin_hash.is_none());
    }
}
