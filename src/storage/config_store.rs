//! Docker client config storage
//!
//! Loads `config.json` as an untyped JSON object, toggles its `proxies`
//! entry, and writes it back. Keys other than `proxies` pass through
//! untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{DockProxyError, DockProxyResult};
use crate::models::{ProxyEntry, ProxySettings, ProxySwitch};

use super::file_io::{to_pretty_json, write_bytes_atomic};

/// Top-level key holding the proxy entry
pub const PROXIES_KEY: &str = "proxies";

/// The config document: a JSON object with stable key order
pub type ConfigDocument = Map<String, Value>;

/// Result of loading the config file
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Parsed document
    pub document: ConfigDocument,
    /// File contents exactly as read
    pub raw: String,
    /// Whether the file was missing and has just been created
    pub created: bool,
}

/// Reads and writes the Docker client config file
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store for the config file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the managed config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the config document
    ///
    /// A missing file is initialized to `{}` and written immediately, so a
    /// backup taken afterwards always has something to copy.
    pub fn load(&self) -> DockProxyResult<LoadedConfig> {
        let (raw, created) = if self.path.exists() {
            let raw = fs::read_to_string(&self.path).map_err(|e| {
                DockProxyError::Io(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            (raw, false)
        } else {
            info!(path = %self.path.display(), "config file missing, creating empty document");
            write_bytes_atomic(&self.path, b"{}")?;
            ("{}".to_string(), true)
        };

        let value: Value = serde_json::from_str(&raw).map_err(|e| {
            DockProxyError::Json(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        let document = match value {
            Value::Object(map) => map,
            other => {
                return Err(DockProxyError::Json(format!(
                    "Expected a JSON object in {}, found {}",
                    self.path.display(),
                    json_kind(&other)
                )))
            }
        };

        debug!(keys = document.len(), "loaded config document");
        Ok(LoadedConfig {
            document,
            raw,
            created,
        })
    }

    /// Overwrite the config file with `document`
    pub fn save(&self, document: &ConfigDocument) -> DockProxyResult<()> {
        let bytes = to_pretty_json(document)?;
        write_bytes_atomic(&self.path, &bytes)?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "saved config document");
        Ok(())
    }

    /// Insert or remove the `proxies` entry
    ///
    /// Returns the previous value of the key, if any.
    pub fn set_proxy(
        document: &mut ConfigDocument,
        switch: ProxySwitch,
        settings: &ProxySettings,
    ) -> DockProxyResult<Option<Value>> {
        match switch {
            ProxySwitch::On => {
                let entry = serde_json::to_value(ProxyEntry::from(settings.clone()))?;
                Ok(document.insert(PROXIES_KEY.to_string(), entry))
            }
            ProxySwitch::Off => Ok(document.remove(PROXIES_KEY)),
        }
    }

    /// Parse the current `proxies` entry
    ///
    /// Returns `Ok(None)` when the key is absent and an error when it is present
    /// but not shaped like a proxy entry.
    pub fn current_proxy(document: &ConfigDocument) -> DockProxyResult<Option<ProxyEntry>> {
        match document.get(PROXIES_KEY) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
                DockProxyError::Json(format!("Unrecognized '{}' entry: {}", PROXIES_KEY, e))
            }),
        }
    }
}

/// Render a document the way `save` would write it
pub fn render_document(document: &ConfigDocument) -> DockProxyResult<String> {
    let bytes = to_pretty_json(document)?;
    String::from_utf8(bytes)
        .map_err(|e| DockProxyError::Json(format!("Serialized config is not UTF-8: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> ConfigStore {
        ConfigStore::new(temp_dir.path().join(".docker").join("config.json"))
    }

    #[test]
    fn test_missing_file_is_created_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let loaded = store.load().unwrap();
        assert!(loaded.created);
        assert!(loaded.document.is_empty());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[test]
    fn test_existing_file_is_loaded_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let raw = r#"{"auths": {"ghcr.io": {}}, "credsStore": "desktop"}"#;
        fs::write(store.path(), raw).unwrap();

        let loaded = store.load().unwrap();
        assert!(!loaded.created);
        assert_eq!(loaded.raw, raw);
        assert_eq!(loaded.document["credsStore"], "desktop");
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.load(), Err(DockProxyError::Json(_))));
    }

    #[test]
    fn test_non_object_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "[1, 2]").unwrap();

        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_set_proxy_on_then_off() {
        let mut doc = ConfigDocument::new();
        doc.insert("auths".into(), json!({}));
        let settings = ProxySettings::default();

        let previous = ConfigStore::set_proxy(&mut doc, ProxySwitch::On, &settings).unwrap();
        assert!(previous.is_none());
        assert_eq!(
            doc[PROXIES_KEY],
            json!({"default": {
                "httpProxy": "http://127.0.0.1:7890",
                "httpsProxy": "http://127.0.0.1:7890",
                "noProxy": "localhost,127.0.0.1,.daocloud.io"
            }})
        );

        let removed = ConfigStore::set_proxy(&mut doc, ProxySwitch::Off, &settings).unwrap();
        assert!(removed.is_some());
        assert!(!doc.contains_key(PROXIES_KEY));
        assert_eq!(doc["auths"], json!({}));
    }

    #[test]
    fn test_off_without_entry_is_noop() {
        let mut doc = ConfigDocument::new();
        let removed =
            ConfigStore::set_proxy(&mut doc, ProxySwitch::Off, &ProxySettings::default()).unwrap();
        assert!(removed.is_none());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_save_preserves_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"credsStore": "desktop", "auths": {"a": {"auth": "x"}}}"#)
            .unwrap();

        let mut loaded = store.load().unwrap();
        ConfigStore::set_proxy(&mut loaded.document, ProxySwitch::On, &ProxySettings::default())
            .unwrap();
        store.save(&loaded.document).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.document["credsStore"], "desktop");
        assert_eq!(reloaded.document["auths"]["a"]["auth"], "x");

        let entry = ConfigStore::current_proxy(&reloaded.document).unwrap().unwrap();
        assert_eq!(entry.default, ProxySettings::default());
    }

    #[test]
    fn test_current_proxy_rejects_odd_shape() {
        let mut doc = ConfigDocument::new();
        doc.insert(PROXIES_KEY.into(), json!("socks5://nope"));
        assert!(ConfigStore::current_proxy(&doc).is_err());
    }
}
