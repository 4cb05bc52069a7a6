//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod backup;
pub mod proxy;
pub mod settings;

pub use audit::{handle_audit, AuditArgs};
pub use backup::{handle_backup_command, BackupCommands};
pub use proxy::{handle_status, handle_toggle, ToggleArgs};
pub use settings::{handle_settings_command, SettingsCommands};
