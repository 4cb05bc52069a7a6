//! Backup system for dockproxy
//!
//! Keeps rotating snapshots of the Docker config so every modification can
//! be undone.
//!
//! # Architecture
//!
//! - `copy_file`: byte-for-byte snapshot primitive
//! - `BackupRotator`: snapshots a file and enforces the retention count
//! - `BackupSet`: the snapshots of one file, oldest first
//! - `RestoreManager`: validates and restores snapshots
//!
//! # Naming
//!
//! Backups are named `<file name>.<timestamp>`, e.g.
//! `config.json.2025-11-27_14-30-22.123`. The timestamp is UTC so that name
//! order equals chronological order. Two backups in the same millisecond get
//! a `-001`, `-002`, ... suffix instead of overwriting each other.
//!
//! # Example
//!
//! ```rust,ignore
//! use dockproxy::backup::BackupRotator;
//!
//! let rotator = BackupRotator::new(paths.backup_dir(), 5);
//! let outcome = rotator.rotate(&paths.config_file())?;
//! println!("kept {} backup(s)", outcome.retained);
//! ```

mod copy;
mod restore;
mod rotator;

pub use copy::copy_file;
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
pub use rotator::{
    backup_and_rotate, backup_timestamp, parse_backup_timestamp, BackupEntry, BackupRotator,
    BackupSet, RotationOutcome, TIMESTAMP_FORMAT,
};
