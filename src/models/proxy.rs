//! Proxy settings model
//!
//! The `proxies` entry understood by the Docker client, and the on/off switch
//! that decides whether it is present.

use serde::{Deserialize, Serialize};

use crate::error::DockProxyError;

/// Proxy URLs applied to containers started by the Docker client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxySettings {
    /// Proxy for plain HTTP traffic
    #[serde(default)]
    pub http_proxy: String,
    /// Proxy for HTTPS traffic
    #[serde(default)]
    pub https_proxy: String,
    /// Comma-separated hosts that bypass the proxy
    #[serde(default)]
    pub no_proxy: String,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            http_proxy: "http://127.0.0.1:7890".to_string(),
            https_proxy: "http://127.0.0.1:7890".to_string(),
            no_proxy: "localhost,127.0.0.1,.daocloud.io".to_string(),
        }
    }
}

/// Value stored under the top-level `proxies` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEntry {
    pub default: ProxySettings,
}

impl From<ProxySettings> for ProxyEntry {
    fn from(default: ProxySettings) -> Self {
        Self { default }
    }
}

/// Whether the proxy entry should be installed or removed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxySwitch {
    /// Remove the `proxies` key
    Off,
    /// Install the `proxies` key
    On,
}

impl TryFrom<i64> for ProxySwitch {
    type Error = DockProxyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ProxySwitch::Off),
            1 => Ok(ProxySwitch::On),
            other => Err(DockProxyError::Validation(format!(
                "onProxy must be 0 (off) or 1 (on), got {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProxySwitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxySwitch::Off => write!(f, "off"),
            ProxySwitch::On => write!(f, "on"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_accepts_only_zero_and_one() {
        assert_eq!(ProxySwitch::try_from(0i64).unwrap(), ProxySwitch::Off);
        assert_eq!(ProxySwitch::try_from(1i64).unwrap(), ProxySwitch::On);

        for bad in [-1i64, 2, 42] {
            let err = ProxySwitch::try_from(bad).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_entry_uses_docker_field_names() {
        let entry = ProxyEntry::from(ProxySettings::default());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["default"]["httpProxy"], "http://127.0.0.1:7890");
        assert_eq!(json["default"]["httpsProxy"], "http://127.0.0.1:7890");
        assert_eq!(json["default"]["noProxy"], "localhost,127.0.0.1,.daocloud.io");
    }

    #[test]
    fn test_entry_tolerates_missing_fields() {
        let entry: ProxyEntry =
            serde_json::from_str(r#"{"default": {"httpProxy": "http://proxy:3128"}}"#).unwrap();
        assert_eq!(entry.default.http_proxy, "http://proxy:3128");
        assert!(entry.default.no_proxy.is_empty());
    }
}
