//! User settings for dockproxy
//!
//! Manages the default proxy values, backup retention policy, and audit
//! preferences. Command-line flags override these per invocation.

use serde::{Deserialize, Serialize};

use super::paths::DockerPaths;
use crate::error::DockProxyError;
use crate::models::ProxySettings;

/// What to do when the file to back up does not exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingSourcePolicy {
    /// Report a read error for the missing file
    #[default]
    Fail,
    /// Create no backup and leave existing backups alone
    Skip,
}

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupPolicy {
    /// Maximum number of backups to keep per file
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,

    /// Behaviour when the file to back up is absent
    #[serde(default)]
    pub missing_source: MissingSourcePolicy,
}

fn default_max_backups() -> usize {
    5
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self {
            max_backups: default_max_backups(),
            missing_source: MissingSourcePolicy::default(),
        }
    }
}

/// User settings for dockproxy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Proxy values used when flags are not given
    #[serde(default)]
    pub default_proxy: ProxySettings,

    /// Backup retention policy
    #[serde(default)]
    pub backup: BackupPolicy,

    /// Whether config changes are appended to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_proxy: ProxySettings::default(),
            backup: BackupPolicy::default(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &DockerPaths) -> Result<Self, DockProxyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                DockProxyError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                DockProxyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DockerPaths) -> Result<(), DockProxyError> {
        std::fs::create_dir_all(paths.settings_dir()).map_err(|e| {
            DockProxyError::Io(format!("Failed to create settings directory: {}", e))
        })?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            DockProxyError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            DockProxyError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_paths(temp_dir: &TempDir) -> DockerPaths {
        DockerPaths::with_dirs(
            temp_dir.path().join(".docker"),
            temp_dir.path().join("settings"),
        )
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backup.max_backups, 5);
        assert_eq!(settings.backup.missing_source, MissingSourcePolicy::Fail);
        assert_eq!(settings.default_proxy.http_proxy, "http://127.0.0.1:7890");
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_load_without_file_does_not_create_it() {
        let temp_dir = TempDir::new().unwrap();
        let paths = test_paths(&temp_dir);

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings.backup.max_backups, 5);
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = test_paths(&temp_dir);

        let mut settings = Settings::default();
        settings.backup.max_backups = 2;
        settings.backup.missing_source = MissingSourcePolicy::Skip;
        settings.default_proxy.no_proxy = "localhost".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backup.max_backups, 2);
        assert_eq!(loaded.backup.missing_source, MissingSourcePolicy::Skip);
        assert_eq!(loaded.default_proxy.no_proxy, "localhost");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = test_paths(&temp_dir);
        std::fs::create_dir_all(paths.settings_dir()).unwrap();
        std::fs::write(paths.settings_file(), r#"{"backup": {"max_backups": 9}}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.backup.max_backups, 9);
        assert_eq!(loaded.backup.missing_source, MissingSourcePolicy::Fail);
        assert_eq!(loaded.default_proxy, ProxySettings::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = test_paths(&temp_dir);
        std::fs::create_dir_all(paths.settings_dir()).unwrap();
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, DockProxyError::Config(_)));
    }
}
