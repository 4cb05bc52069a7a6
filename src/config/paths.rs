//! Path management for dockproxy
//!
//! Resolves every path the tool touches once, up front, so the rest of the
//! crate receives them explicitly.
//!
//! ## Path Resolution Order
//!
//! Docker directory:
//! 1. `DOCKER_CONFIG` environment variable (same override the Docker client honours)
//! 2. `~/.docker`
//!
//! Settings directory:
//! 1. `DOCKPROXY_CONFIG_DIR` environment variable
//! 2. Platform config dir (`~/.config/dockproxy` on Linux)

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use crate::error::DockProxyError;

/// Manages all paths used by dockproxy
#[derive(Debug, Clone)]
pub struct DockerPaths {
    /// Docker client configuration directory
    docker_dir: PathBuf,
    /// Directory holding dockproxy's own settings and audit log
    settings_dir: PathBuf,
}

impl DockerPaths {
    /// Create a new DockerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, DockProxyError> {
        let docker_dir = match std::env::var_os("DOCKER_CONFIG") {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_home()?.join(".docker"),
        };

        let settings_dir = match std::env::var_os("DOCKPROXY_CONFIG_DIR") {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_settings_dir()?,
        };

        Ok(Self {
            docker_dir,
            settings_dir,
        })
    }

    /// Create DockerPaths with explicit directories (useful for testing)
    pub fn with_dirs(docker_dir: PathBuf, settings_dir: PathBuf) -> Self {
        Self {
            docker_dir,
            settings_dir,
        }
    }

    /// Get the Docker directory (~/.docker or $DOCKER_CONFIG)
    pub fn docker_dir(&self) -> &PathBuf {
        &self.docker_dir
    }

    /// Get the Docker client config file (~/.docker/config.json)
    pub fn config_file(&self) -> PathBuf {
        self.docker_dir.join("config.json")
    }

    /// Get the backup directory (~/.docker/config_back)
    pub fn backup_dir(&self) -> PathBuf {
        self.docker_dir.join("config_back")
    }

    /// Get the advisory lock file guarding config.json
    pub fn lock_file(&self) -> PathBuf {
        self.docker_dir.join("config.json.lock")
    }

    /// Get the settings directory
    pub fn settings_dir(&self) -> &PathBuf {
        &self.settings_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.settings_dir.join("settings.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.settings_dir.join("audit.log")
    }

}

fn resolve_home() -> Result<PathBuf, DockProxyError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| DockProxyError::Config("Could not determine home directory".into()))
}

fn resolve_settings_dir() -> Result<PathBuf, DockProxyError> {
    ProjectDirs::from("", "", "dockproxy")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| DockProxyError::Config("Could not determine config directory".into()))
}
