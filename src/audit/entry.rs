//! Audit entry data structures
//!
//! Defines the actions recorded in the audit log and the entry format itself.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ProxySwitch;

/// Kinds of config changes that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// The `proxies` entry was installed
    Enable,
    /// The `proxies` entry was removed
    Disable,
    /// The config was replaced by a backup
    Restore,
}

impl From<ProxySwitch> for AuditAction {
    fn from(switch: ProxySwitch) -> Self {
        match switch {
            ProxySwitch::On => AuditAction::Enable,
            ProxySwitch::Off => AuditAction::Disable,
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditAction::Enable => write!(f, "ENABLE"),
            AuditAction::Disable => write!(f, "DISABLE"),
            AuditAction::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single audit log entry
///
/// Records one change to the Docker config, the backup taken before it, and
/// the `proxies` value before and after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the change occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// What was done
    pub action: AuditAction,

    /// Config file that was modified
    pub config_path: PathBuf,

    /// Backup taken before the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,

    /// Backup the config was restored from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restored_from: Option<PathBuf>,

    /// `proxies` value before the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// `proxies` value after the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    /// Create a new audit entry
    pub fn new(action: AuditAction, config_path: &Path) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            config_path: config_path.to_path_buf(),
            backup: None,
            restored_from: None,
            before: None,
            after: None,
        }
    }

    /// Attach the backup taken before the change
    pub fn with_backup(mut self, backup: Option<PathBuf>) -> Self {
        self.backup = backup;
        self
    }

    /// Record which backup a restore read from
    pub fn with_restored_from(mut self, source: PathBuf) -> Self {
        self.restored_from = Some(source);
        self
    }

    /// Attach the `proxies` values before and after the change
    pub fn with_values(
        mut self,
        before: Option<serde_json::Value>,
        after: Option<serde_json::Value>,
    ) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.config_path.display()
        );

        if let Some(source) = &self.restored_from {
            output.push_str(&format!("\n  Restored from: {}", source.display()));
        }

        if let Some(backup) = &self.backup {
            output.push_str(&format!("\n  Backup: {}", backup.display()));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_display() {
        assert_eq!(AuditAction::Enable.to_string(), "ENABLE");
        assert_eq!(AuditAction::Disable.to_string(), "DISABLE");
        assert_eq!(AuditAction::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_action_from_switch() {
        assert_eq!(AuditAction::from(ProxySwitch::On), AuditAction::Enable);
        assert_eq!(AuditAction::from(ProxySwitch::Off), AuditAction::Disable);
    }

    #[test]
    fn test_entry_serialization_skips_empty_fields() {
        let entry = AuditEntry::new(AuditAction::Disable, Path::new("/h/.docker/config.json"))
            .with_values(Some(json!({"default": {}})), None);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"], "disable");
        assert_eq!(json["before"], json!({"default": {}}));
        assert!(json.get("after").is_none());
        assert!(json.get("backup").is_none());
        assert!(json.get("restored_from").is_none());
    }

    #[test]
    fn test_format_human_readable() {
        let entry = AuditEntry::new(AuditAction::Enable, Path::new("/h/.docker/config.json"))
            .with_backup(Some(PathBuf::from("/h/.docker/config_back/config.json.x")));

        let text = entry.format_human_readable();
        assert!(text.contains("ENABLE /h/.docker/config.json"));
        assert!(text.contains("Backup: /h/.docker/config_back/config.json.x"));
    }

    #[test]
    fn test_restore_entry_names_its_source() {
        let source = PathBuf::from("/h/.docker/config_back/config.json.2025-11-27_14-30-22.000");
        let entry = AuditEntry::new(AuditAction::Restore, Path::new("/h/.docker/config.json"))
            .with_restored_from(source.clone());

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.restored_from, Some(source));

        let text = entry.format_human_readable();
        assert!(text.contains("Restored from: /h/.docker/config_back/config.json.2025"));
    }
}
