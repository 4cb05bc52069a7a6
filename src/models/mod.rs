//! Core data models for dockproxy

pub mod proxy;

pub use proxy::{ProxyEntry, ProxySettings, ProxySwitch};
