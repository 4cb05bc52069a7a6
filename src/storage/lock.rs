//! Advisory locking for the Docker config
//!
//! Serializes the load, backup, mutate, save sequence across processes.
//! The lock lives on a dedicated file because `config.json` itself is
//! replaced by rename on every save.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fd_lock::{RwLock, RwLockWriteGuard};
use tracing::{debug, info};

use crate::error::{DockProxyError, DockProxyResult};

/// Exclusive advisory lock on a lock file
pub struct ConfigLock {
    path: PathBuf,
    lock: RwLock<File>,
}

impl ConfigLock {
    /// Open (creating if needed) the lock file at `path`
    pub fn open(path: impl AsRef<Path>) -> DockProxyResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DockProxyError::Lock(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| {
                DockProxyError::Lock(format!("Failed to open {}: {}", path.display(), e))
            })?;

        Ok(Self {
            path,
            lock: RwLock::new(file),
        })
    }

    /// Acquire the lock, waiting for other holders to release it
    pub fn acquire(&mut self) -> DockProxyResult<RwLockWriteGuard<'_, File>> {
        let path = self.path.clone();

        // Try without blocking first so a wait is visible in the logs
        let contended = match self.lock.try_write() {
            Ok(_guard) => false,
            Err(e) if e.kind() == ErrorKind::WouldBlock => true,
            Err(e) => {
                return Err(DockProxyError::Lock(format!(
                    "Failed to lock {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        if contended {
            info!(path = %path.display(), "waiting for another dockproxy process");
        }

        let guard = self.lock.write().map_err(|e| {
            DockProxyError::Lock(format!("Failed to lock {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "config lock acquired");
        Ok(guard)
    }
}
