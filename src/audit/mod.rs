//! Audit logging system for dockproxy
//!
//! Records every change made to the Docker config, with the backup taken
//! beforehand and the `proxies` value before and after, in an append-only
//! JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use dockproxy::audit::{AuditAction, AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let entry = AuditEntry::new(AuditAction::Enable, &paths.config_file())
//!     .with_backup(outcome.backup)
//!     .with_values(before, after);
//! logger.log(&entry)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditAction, AuditEntry};
pub use logger::AuditLogger;
