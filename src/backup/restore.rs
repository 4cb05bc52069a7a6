//! Backup restoration for dockproxy
//!
//! Puts a previous snapshot of the config back in place. The current
//! config is itself rotated into the backup set first.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::{DockProxyError, DockProxyResult};
use crate::storage::{write_bytes_atomic, PROXIES_KEY};

use super::rotator::{BackupEntry, BackupRotator};

/// Result of checking a backup before restoring it
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Number of top-level keys in the backed-up document
    pub key_count: usize,
    /// Whether the backup has a `proxies` entry
    pub has_proxy: bool,
    /// Size in bytes
    pub size_bytes: u64,
}

impl ValidationResult {
    pub fn summary(&self) -> String {
        format!(
            "{} top-level key(s), proxy {}",
            self.key_count,
            if self.has_proxy { "set" } else { "not set" }
        )
    }
}

/// Outcome of a restore
#[derive(Debug, Clone)]
pub struct RestoreResult {
    /// Backup that was restored
    pub restored_from: PathBuf,
    /// Snapshot of the config as it was just before the restore
    pub pre_restore_backup: Option<PathBuf>,
    /// Backups pruned while taking that snapshot
    pub pruned: Vec<PathBuf>,
}

/// Handles restoring the config from backups
pub struct RestoreManager {
    config_path: PathBuf,
    rotator: BackupRotator,
}

impl RestoreManager {
    /// Create a RestoreManager for `config_path`, snapshotting through `rotator`
    pub fn new(config_path: impl Into<PathBuf>, rotator: BackupRotator) -> Self {
        Self {
            config_path: config_path.into(),
            rotator,
        }
    }

    /// Check that a backup holds a JSON object
    pub fn validate_backup(&self, backup_path: &Path) -> DockProxyResult<ValidationResult> {
        let bytes = fs::read(backup_path)
            .map_err(|e| DockProxyError::Io(format!("Failed to read backup file: {}", e)))?;
        validate_bytes(&bytes)
    }

    /// Restore the config from `backup`
    ///
    /// The backup is read before the pre-restore snapshot is taken, because
    /// that snapshot may prune the very file being restored.
    pub fn restore(&self, backup: &BackupEntry) -> DockProxyResult<RestoreResult> {
        let bytes = fs::read(&backup.path)
            .map_err(|e| DockProxyError::Io(format!("Failed to read backup file: {}", e)))?;
        validate_bytes(&bytes)?;

        let (pre_restore_backup, pruned) = if self.config_path.exists() {
            let outcome = self.rotator.rotate(&self.config_path)?;
            (outcome.backup, outcome.pruned)
        } else {
            (None, Vec::new())
        };

        write_bytes_atomic(&self.config_path, &bytes)?;
        info!(
            from = %backup.path.display(),
            to = %self.config_path.display(),
            "config restored"
        );

        Ok(RestoreResult {
            restored_from: backup.path.clone(),
            pre_restore_backup,
            pruned,
        })
    }
}

fn validate_bytes(bytes: &[u8]) -> DockProxyResult<ValidationResult> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| DockProxyError::Json(format!("Failed to parse backup file: {}", e)))?;

    match value {
        Value::Object(map) => Ok(ValidationResult {
            key_count: map.len(),
            has_proxy: map.contains_key(PROXIES_KEY),
            size_bytes: bytes.len() as u64,
        }),
        _ => Err(DockProxyError::Validation(
            "Backup does not contain a JSON object".into(),
        )),
    }
}
