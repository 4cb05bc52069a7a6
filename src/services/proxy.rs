//! Proxy service
//!
//! Runs the full toggle sequence against the Docker config: lock, load
//! (creating `{}` if absent), back up, mutate, save, audit.

use serde_json::Value;
use tracing::{info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::backup::{BackupRotator, RotationOutcome};
use crate::config::{DockerPaths, Settings};
use crate::error::DockProxyResult;
use crate::models::{ProxyEntry, ProxySettings, ProxySwitch};
use crate::storage::{render_document, ConfigLock, ConfigStore, PROXIES_KEY};

/// What a toggle did to the config
#[derive(Debug, Clone)]
pub struct ToggleReport {
    /// Config contents before the change, as read
    pub original: String,
    /// Config contents after the change, as written
    pub updated: String,
    /// Whether the config file had to be created
    pub created: bool,
    /// `proxies` value before the change
    pub previous: Option<Value>,
    /// Backup taken before the change
    pub rotation: RotationOutcome,
}

/// Current proxy state of the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyStatus {
    /// No config file yet
    NoConfig,
    /// Config has no `proxies` entry
    Disabled,
    /// Config has a `proxies` entry
    Enabled(ProxyEntry),
}

/// Service for toggling the Docker proxy entry
pub struct ProxyService<'a> {
    paths: &'a DockerPaths,
    settings: &'a Settings,
}

impl<'a> ProxyService<'a> {
    /// Create a new proxy service
    pub fn new(paths: &'a DockerPaths, settings: &'a Settings) -> Self {
        Self { paths, settings }
    }

    fn store(&self) -> ConfigStore {
        ConfigStore::new(self.paths.config_file())
    }

    /// Install or remove the `proxies` entry
    ///
    /// The config is always backed up before it is modified. Any failure
    /// stops the sequence; nothing already done is undone.
    pub fn apply(
        &self,
        switch: ProxySwitch,
        proxy: &ProxySettings,
    ) -> DockProxyResult<ToggleReport> {
        let mut lock = ConfigLock::open(self.paths.lock_file())?;
        let _guard = lock.acquire()?;

        let store = self.store();
        let mut loaded = store.load()?;

        let rotator = BackupRotator::from_policy(self.paths.backup_dir(), &self.settings.backup);
        let rotation = rotator.rotate(store.path())?;

        let previous = ConfigStore::set_proxy(&mut loaded.document, switch, proxy)?;
        store.save(&loaded.document)?;
        let updated = render_document(&loaded.document)?;
        info!(%switch, config = %store.path().display(), "proxy setting applied");

        if self.settings.audit_enabled {
            let entry = AuditEntry::new(switch.into(), store.path())
                .with_backup(rotation.backup.clone())
                .with_values(previous.clone(), loaded.document.get(PROXIES_KEY).cloned());
            if let Err(e) = AuditLogger::new(self.paths.audit_log()).log(&entry) {
                warn!(error = %e, "could not write audit entry");
            }
        }

        Ok(ToggleReport {
            original: loaded.raw,
            updated,
            created: loaded.created,
            previous,
            rotation,
        })
    }

    /// Read the current proxy state without modifying anything
    pub fn status(&self) -> DockProxyResult<ProxyStatus> {
        let store = self.store();
        if !store.path().exists() {
            return Ok(ProxyStatus::NoConfig);
        }

        let loaded = store.load()?;
        Ok(match ConfigStore::current_proxy(&loaded.document)? {
            Some(entry) => ProxyStatus::Enabled(entry),
            None => ProxyStatus::Disabled,
        })
    }
}
