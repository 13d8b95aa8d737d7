//! Backup service
//!
//! Creates consistent snapshots of the database and settings file.
//! Packages backups as ZIP files with a manifest and SHA-256 checksums.
//! Restores are staged next to the live database and swapped in on the
//! next startup, before the connection pool opens.

use crate::config::{
    BACKUPS_DIR_NAME, DB_FILE_NAME, PENDING_RESTORE_FILE_NAME, PENDING_SETTINGS_FILE_NAME,
    SETTINGS_FILE_NAME,
};
use crate::database::{Backup, Repository};
use crate::error::{AppError, Result};
use crate::services::settings::SettingsService;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MANIFEST_NAME: &str = "manifest.json";
const SQLITE_HEADER: &[u8] = b"SQLite format 3\0";

/// Backup manifest structure
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupManifest {
    pub version: String,
    pub timestamp: String,
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
    pub checksum: String,
}

/// Result of staging a restore
#[derive(Debug, Clone, Serialize)]
pub struct StagedRestore {
    pub backup_timestamp: String,
    pub files: Vec<String>,
    /// Restores take effect when the server next starts
    pub restart_required: bool,
}

/// Backup service
#[derive(Clone)]
pub struct BackupService {
    repo: Repository,
    data_dir: PathBuf,
    backups_dir: PathBuf,
    settings: SettingsService,
}

impl BackupService {
    pub fn new(repo: Repository, data_dir: PathBuf, settings: SettingsService) -> Self {
        let backups_dir = data_dir.join(BACKUPS_DIR_NAME);
        Self {
            repo,
            data_dir,
            backups_dir,
            settings,
        }
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Snapshot the database and settings into a new ZIP archive
    pub async fn create_backup(&self) -> Result<Backup> {
        tracing::info!("Creating backup");

        fs::create_dir_all(&self.backups_dir).await?;

        let stamp = Utc::now().format("%Y%m%d_%H%M%S_%3f").to_string();
        let backup_path = self.backups_dir.join(format!("backup_{}.zip", stamp));
        let snapshot_path = self.backups_dir.join(format!("snapshot_{}.sqlite.tmp", stamp));

        self.repo
            .snapshot_into(&snapshot_path)
            .await
            .map_err(|e| AppError::Backup(format!("Database snapshot failed: {}", e)))?;

        let db_data = fs::read(&snapshot_path).await;
        let _ = fs::remove_file(&snapshot_path).await;
        let db_data = db_data?;

        let mut entries = vec![(DB_FILE_NAME.to_string(), db_data)];

        let settings_path = self.settings.path();
        if settings_path.exists() {
            entries.push((SETTINGS_FILE_NAME.to_string(), fs::read(settings_path).await?));
        }

        let archive_path = backup_path.clone();
        let manifest_hash =
            tokio::task::spawn_blocking(move || write_archive(&archive_path, &entries))
                .await
                .map_err(|e| AppError::Backup(format!("Backup task failed: {}", e)))??;

        let size = fs::metadata(&backup_path).await?.len() as i64;

        let backup = self
            .repo
            .record_backup(backup_path.to_string_lossy().as_ref(), size, &manifest_hash)
            .await?;

        tracing::info!("Backup created: {:?} ({} bytes)", backup_path, size);

        self.apply_retention_policy().await?;

        Ok(backup)
    }

    /// Keep only the newest N backup files; records stay for history
    async fn apply_retention_policy(&self) -> Result<()> {
        let retention_count = self.settings.get_auto_backup().await?.retention_count as usize;

        let backups = self.repo.list_backups().await?;
        if backups.len() <= retention_count {
            return Ok(());
        }

        for backup in backups.iter().skip(retention_count) {
            if !Path::new(&backup.path).exists() {
                continue;
            }
            tracing::info!("Deleting old backup: {}", backup.path);
            if let Err(e) = fs::remove_file(&backup.path).await {
                tracing::warn!("Failed to delete backup file {}: {}", backup.path, e);
            }
        }

        Ok(())
    }

    /// List recorded backups, newest first
    pub async fn list_backups(&self) -> Result<Vec<Backup>> {
        self.repo.list_backups().await
    }

    /// Stage a recorded backup for restore on next startup
    pub async fn stage_restore_by_id(&self, backup_id: &str) -> Result<StagedRestore> {
        let backup = self
            .repo
            .list_backups()
            .await?
            .into_iter()
            .find(|b| b.id == backup_id)
            .ok_or_else(|| AppError::Restore(format!("Unknown backup: {}", backup_id)))?;

        self.stage_restore(Path::new(&backup.path)).await
    }

    pub async fn stage_restore(&self, backup_path: &Path) -> Result<StagedRestore> {
        stage_restore(&self.data_dir, backup_path).await
    }
}

/// Write entries plus manifest into a ZIP file, returning the manifest hash
fn write_archive(path: &Path, entries: &[(String, Vec<u8>)]) -> Result<String> {
    let file = std::fs::File::create(path)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut manifest = BackupManifest {
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        files: Vec::with_capacity(entries.len()),
    };

    for (name, data) in entries {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(data)?;

        manifest.files.push(FileEntry {
            path: name.clone(),
            size: data.len() as u64,
            checksum: calculate_checksum(data),
        });
        tracing::debug!("Added {} to backup", name);
    }

    let manifest_json = serde_json::to_string_pretty(&manifest)?;
    zip.start_file(MANIFEST_NAME, options)?;
    zip.write_all(manifest_json.as_bytes())?;
    zip.finish()?;

    Ok(calculate_checksum(manifest_json.as_bytes()))
}

/// Read and verify every manifest entry of a backup archive
fn read_verified(path: &Path) -> Result<(BackupManifest, Vec<(String, Vec<u8>)>)> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let manifest: BackupManifest = {
        let mut manifest_file = archive
            .by_name(MANIFEST_NAME)
            .map_err(|_| AppError::Restore("Backup has no manifest".to_string()))?;
        let mut manifest_data = String::new();
        manifest_file.read_to_string(&mut manifest_data)?;
        serde_json::from_str(&manifest_data)?
    };

    let mut files = Vec::with_capacity(manifest.files.len());
    for entry in &manifest.files {
        let mut contents = Vec::new();
        archive
            .by_name(&entry.path)
            .map_err(|_| AppError::Restore(format!("Backup is missing {}", entry.path)))?
            .read_to_end(&mut contents)?;

        let actual = calculate_checksum(&contents);
        if actual != entry.checksum {
            return Err(AppError::Restore(format!(
                "Checksum mismatch for {}: expected {}, got {}",
                entry.path, entry.checksum, actual
            )));
        }
        files.push((entry.path.clone(), contents));
    }

    Ok((manifest, files))
}

/// Verify a backup and stage its files in `data_dir` for the next startup
pub async fn stage_restore(data_dir: &Path, backup_path: &Path) -> Result<StagedRestore> {
    tracing::info!("Staging restore from backup: {:?}", backup_path);

    let path = backup_path.to_path_buf();
    let (manifest, files) = tokio::task::spawn_blocking(move || read_verified(&path))
        .await
        .map_err(|e| AppError::Restore(format!("Restore task failed: {}", e)))??;

    let db = files
        .iter()
        .find(|(name, _)| name == DB_FILE_NAME)
        .ok_or_else(|| AppError::Restore("Backup contains no database".to_string()))?;
    if !db.1.starts_with(SQLITE_HEADER) {
        return Err(AppError::Restore(
            "Backup database is not a SQLite file".to_string(),
        ));
    }

    fs::create_dir_all(data_dir).await?;
    let mut staged = Vec::new();
    for (name, contents) in &files {
        let target = match name.as_str() {
            DB_FILE_NAME => PENDING_RESTORE_FILE_NAME,
            SETTINGS_FILE_NAME => PENDING_SETTINGS_FILE_NAME,
            other => {
                tracing::warn!("Ignoring unknown backup entry: {}", other);
                continue;
            }
        };
        fs::write(data_dir.join(target), contents).await?;
        staged.push(name.clone());
    }

    tracing::info!(
        "Restore staged from backup {} ({} files); restart to apply",
        manifest.timestamp,
        staged.len()
    );

    Ok(StagedRestore {
        backup_timestamp: manifest.timestamp,
        files: staged,
        restart_required: true,
    })
}

/// Swap a staged restore into place. Must run before the pool opens.
///
/// Returns `true` when a restore was applied. The replaced database is kept
/// beside the new one with a timestamp suffix.
pub async fn apply_pending_restore(data_dir: &Path) -> Result<bool> {
    let pending_db = data_dir.join(PENDING_RESTORE_FILE_NAME);
    if !pending_db.exists() {
        return Ok(false);
    }

    tracing::info!("Applying pending restore");

    let suffix = Utc::now().format("%Y%m%d_%H%M%S").to_string();
    let db_path = data_dir.join(DB_FILE_NAME);

    if db_path.exists() {
        let replaced = data_dir.join(format!("{}.before_restore_{}", DB_FILE_NAME, suffix));
        fs::rename(&db_path, &replaced).await?;
        tracing::info!("Previous database kept at {:?}", replaced);
    }
    for sidecar in ["-wal", "-shm"] {
        let path = data_dir.join(format!("{}{}", DB_FILE_NAME, sidecar));
        if path.exists() {
            fs::remove_file(&path).await?;
        }
    }
    fs::rename(&pending_db, &db_path).await?;

    let pending_settings = data_dir.join(PENDING_SETTINGS_FILE_NAME);
    if pending_settings.exists() {
        fs::rename(&pending_settings, data_dir.join(SETTINGS_FILE_NAME)).await?;
        tracing::info!("Settings restored");
    }

    tracing::info!("Restore completed successfully");
    Ok(true)
}

fn calculate_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_pool, NewPointChange};
    use crate::services::settings::AutoBackupSettings;
    use tempfile::TempDir;

    async fn create_test_service() -> (BackupService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().to_path_buf();

        let pool = create_pool(&data_dir.join(DB_FILE_NAME)).await.unwrap();
        let repo = Repository::new(pool);
        repo.ensure_profile("주우").await.unwrap();

        let settings = SettingsService::new(data_dir.clone());
        let service = BackupService::new(repo, data_dir, settings);

        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_create_backup() {
        let (service, _temp) = create_test_service().await;

        let backup = service.create_backup().await.unwrap();

        assert!(Path::new(&backup.path).exists());
        assert!(backup.path.contains("backup_"));
        assert!(backup.path.ends_with(".zip"));
        assert!(backup.size > 0);

        let listed = service.list_backups().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].manifest_hash, backup.manifest_hash);
    }

    #[tokio::test]
    async fn test_backup_manifest_checksums() {
        let (service, _temp) = create_test_service().await;
        service.settings.load().await.unwrap();

        let backup = service.create_backup().await.unwrap();
        let (manifest, files) = read_verified(Path::new(&backup.path)).unwrap();

        let names: Vec<&str> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert!(names.contains(&DB_FILE_NAME));
        assert!(names.contains(&SETTINGS_FILE_NAME));
        assert_eq!(files.len(), manifest.files.len());
    }

    #[tokio::test]
    async fn test_retention_removes_old_files() {
        let (service, _temp) = create_test_service().await;
        service
            .settings
            .update_auto_backup(AutoBackupSettings {
                retention_count: 2,
                ..AutoBackupSettings::default()
            })
            .await
            .unwrap();

        for _ in 0..3 {
            service.create_backup().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let records = service.list_backups().await.unwrap();
        assert_eq!(records.len(), 3);
        let on_disk = records.iter().filter(|b| Path::new(&b.path).exists()).count();
        assert_eq!(on_disk, 2);
        assert!(!Path::new(&records[2].path).exists());
    }

    #[tokio::test]
    async fn test_stage_and_apply_restore() {
        let (service, temp) = create_test_service().await;
        let data_dir = temp.path().to_path_buf();

        service
            .repo
            .apply_point_change(&NewPointChange::new(700, "before backup", "test"))
            .await
            .unwrap();
        let backup = service.create_backup().await.unwrap();

        let staged = service.stage_restore_by_id(&backup.id).await.unwrap();
        assert!(staged.restart_required);
        assert!(staged.files.contains(&DB_FILE_NAME.to_string()));
        assert!(data_dir.join(PENDING_RESTORE_FILE_NAME).exists());

        service.repo.pool().close().await;

        assert!(apply_pending_restore(&data_dir).await.unwrap());
        assert!(!data_dir.join(PENDING_RESTORE_FILE_NAME).exists());
        assert!(!apply_pending_restore(&data_dir).await.unwrap());

        let repo = Repository::new(create_pool(&data_dir.join(DB_FILE_NAME)).await.unwrap());
        assert_eq!(repo.get_profile().await.unwrap().current_points, 700);
    }

    #[tokio::test]
    async fn test_tampered_backup_is_rejected() {
        let (service, temp) = create_test_service().await;
        let bad_path = temp.path().join("tampered.zip");

        let manifest = BackupManifest {
            version: "1.0.0".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            files: vec![FileEntry {
                path: DB_FILE_NAME.to_string(),
                size: 4,
                checksum: "0".repeat(64),
            }],
        };
        {
            let mut zip = ZipWriter::new(std::fs::File::create(&bad_path).unwrap());
            let options = SimpleFileOptions::default();
            zip.start_file(DB_FILE_NAME, options).unwrap();
            zip.write_all(b"junk").unwrap();
            zip.start_file(MANIFEST_NAME, options).unwrap();
            zip.write_all(serde_json::to_string(&manifest).unwrap().as_bytes())
                .unwrap();
            zip.finish().unwrap();
        }

        let err = service.stage_restore(&bad_path).await.unwrap_err();
        assert!(matches!(err, AppError::Restore(_)));
        assert!(!temp.path().join(PENDING_RESTORE_FILE_NAME).exists());
    }

    #[tokio::test]
    async fn test_unknown_backup_id() {
        let (service, _temp) = create_test_service().await;
        assert!(service.stage_restore_by_id("missing").await.is_err());
    }
}
