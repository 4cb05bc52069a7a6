//! Storage layer for dockproxy
//!
//! Provides the Docker config store, atomic file writes, and the advisory
//! lock that guards a full read-backup-mutate-write sequence.

pub mod config_store;
pub mod file_io;
pub mod lock;

pub use config_store::{render_document, ConfigDocument, ConfigStore, LoadedConfig, PROXIES_KEY};
pub use file_io::{to_pretty_json, write_bytes_atomic};
pub use lock::ConfigLock;
