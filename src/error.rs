//! Custom error types for dockproxy
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The step of a backup rotation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupStep {
    /// Creating the backup directory
    CreateDir,
    /// Reading the file being backed up
    ReadSource,
    /// Writing the new backup file
    WriteBackup,
    /// Listing the backup directory
    ListDir,
    /// Deleting a backup outside the retention window
    Prune,
}

impl fmt::Display for BackupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupStep::CreateDir => write!(f, "create backup directory"),
            BackupStep::ReadSource => write!(f, "read source file"),
            BackupStep::WriteBackup => write!(f, "write backup file"),
            BackupStep::ListDir => write!(f, "list backup directory"),
            BackupStep::Prune => write!(f, "delete old backup"),
        }
    }
}

/// The main error type for dockproxy operations
#[derive(Error, Debug)]
pub enum DockProxyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for command-line input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Failure to acquire the config lock
    #[error("Lock error: {0}")]
    Lock(String),

    /// A backup rotation step failed
    #[error("Failed to {step} {}: {message}", .path.display())]
    Backup {
        step: BackupStep,
        path: PathBuf,
        message: String,
    },
}

impl DockProxyError {
    /// Create a backup error for the given step
    pub fn backup(step: BackupStep, path: impl Into<PathBuf>, err: impl fmt::Display) -> Self {
        Self::Backup {
            step,
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The failing rotation step, if this is a backup error
    pub fn backup_step(&self) -> Option<BackupStep> {
        match self {
            Self::Backup { step, .. } => Some(*step),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DockProxyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DockProxyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for dockproxy operations
pub type DockProxyResult<T> = Result<T, DockProxyError>;
