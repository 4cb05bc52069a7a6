//! Backup service
//!
//! Lists the config backups and restores one of them under the config lock.

use tracing::warn;

use crate::audit::{AuditAction, AuditEntry, AuditLogger};
use crate::backup::{
    BackupEntry, BackupRotator, BackupSet, RestoreManager, RestoreResult, ValidationResult,
};
use crate::config::{DockerPaths, Settings};
use crate::error::{DockProxyError, DockProxyResult};
use crate::storage::ConfigLock;

/// Service for config backup management
pub struct BackupService<'a> {
    paths: &'a DockerPaths,
    settings: &'a Settings,
}

impl<'a> BackupService<'a> {
    /// Create a new backup service
    pub fn new(paths: &'a DockerPaths, settings: &'a Settings) -> Self {
        Self { paths, settings }
    }

    fn rotator(&self) -> BackupRotator {
        BackupRotator::from_policy(self.paths.backup_dir(), &self.settings.backup)
    }

    fn restore_manager(&self) -> RestoreManager {
        RestoreManager::new(self.paths.config_file(), self.rotator())
    }

    /// Backups of the config, oldest first
    pub fn list(&self) -> DockProxyResult<BackupSet> {
        BackupSet::scan(&self.paths.backup_dir(), "config.json")
    }

    /// Find a backup by filename, or `latest`
    pub fn find(&self, name: &str) -> DockProxyResult<BackupEntry> {
        self.list()?
            .find(name)
            .cloned()
            .ok_or_else(|| DockProxyError::backup_not_found(name))
    }

    /// Check a backup without restoring it
    pub fn inspect(&self, name: &str) -> DockProxyResult<(BackupEntry, ValidationResult)> {
        let entry = self.find(name)?;
        let validation = self.restore_manager().validate_backup(&entry.path)?;
        Ok((entry, validation))
    }

    /// Restore the config from a backup
    pub fn restore(&self, name: &str) -> DockProxyResult<RestoreResult> {
        let mut lock = ConfigLock::open(self.paths.lock_file())?;
        let _guard = lock.acquire()?;

        let entry = self.find(name)?;
        let result = self.restore_manager().restore(&entry)?;

        if self.settings.audit_enabled {
            let audit = AuditEntry::new(AuditAction::Restore, &self.paths.config_file())
                .with_restored_from(result.restored_from.clone())
                .with_backup(result.pre_restore_backup.clone());
            if let Err(e) = AuditLogger::new(self.paths.audit_log()).log(&audit) {
                warn!(error = %e, "could not write audit entry");
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProxySettings, ProxySwitch};
    use crate::services::ProxyService;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DockerPaths) {
        let temp_dir = TempDir::new().unwrap();
        let paths = DockerPaths::with_dirs(
            temp_dir.path().join(".docker"),
            temp_dir.path().join("settings"),
        );
        (temp_dir, paths)
    }

    #[test]
    fn test_list_empty() {
        let (_temp, paths) = setup();
        let settings = Settings::default();
        assert!(BackupService::new(&paths, &settings).list().unwrap().is_empty());
    }

    #[test]
    fn test_restore_latest_undoes_toggle() {
        let (_temp, paths) = setup();
        fs::create_dir_all(paths.docker_dir()).unwrap();
        fs::write(paths.config_file(), r#"{"credsStore": "desktop"}"#).unwrap();

        let settings = Settings::default();
        ProxyService::new(&paths, &settings)
            .apply(ProxySwitch::On, &ProxySettings::default())
            .unwrap();

        let service = BackupService::new(&paths, &settings);
        let (entry, validation) = service.inspect("latest").unwrap();
        assert!(!validation.has_proxy);

        let result = service.restore("latest").unwrap();
        assert_eq!(result.restored_from, entry.path);
        assert!(result.pre_restore_backup.is_some());
        assert_eq!(
            fs::read_to_string(paths.config_file()).unwrap(),
            r#"{"credsStore": "desktop"}"#
        );

        let audit = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        let last = audit.last().unwrap();
        assert_eq!(last.action, AuditAction::Restore);
        assert_eq!(last.restored_from.as_ref(), Some(&entry.path));
        assert_eq!(last.backup, result.pre_restore_backup);
    }

    #[test]
    fn test_restore_unknown_backup() {
        let (_temp, paths) = setup();
        let settings = Settings::default();

        let err = BackupService::new(&paths, &settings)
            .restore("config.json.nope")
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
