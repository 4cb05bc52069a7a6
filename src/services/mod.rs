//! Service layer for dockproxy
//!
//! The service layer sequences storage, backup, and audit operations into
//! the commands the CLI exposes.

pub mod backup;
pub mod proxy;

pub use backup::BackupService;
pub use proxy::{ProxyService, ProxyStatus, ToggleReport};
