//! dockproxy - toggle the proxy entry in the Docker client config
//!
//! Installs or removes the `proxies` key of `~/.docker/config.json`, taking a
//! timestamped backup of the file before every modification and keeping only
//! the most recent backups.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Proxy settings and the on/off switch
//! - `storage`: Config document store, atomic writes, advisory locking
//! - `backup`: Backup rotation and restore
//! - `audit`: Append-only log of config changes
//! - `services`: The toggle and restore sequences
//! - `cli`: Command handlers
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use dockproxy::config::{DockerPaths, Settings};
//! use dockproxy::models::{ProxySettings, ProxySwitch};
//! use dockproxy::services::ProxyService;
//!
//! let paths = DockerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let report = ProxyService::new(&paths, &settings)
//!     .apply(ProxySwitch::On, &ProxySettings::default())?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{DockProxyError, DockProxyResult};
