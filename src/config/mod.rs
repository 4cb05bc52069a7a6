//! Configuration module for dockproxy
//!
//! This module provides configuration management including:
//! - Docker and settings path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::DockerPaths;
pub use settings::{BackupPolicy, MissingSourcePolicy, Settings};
