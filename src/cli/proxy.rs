//! Proxy CLI commands
//!
//! The top-level toggle (`dockproxy --on-proxy 1`) and `dockproxy status`.

use clap::Args;

use crate::config::paths::DockerPaths;
use crate::config::settings::Settings;
use crate::error::DockProxyResult;
use crate::models::{ProxySettings, ProxySwitch};
use crate::services::{ProxyService, ProxyStatus};

/// Flags of the top-level toggle
#[derive(Args, Debug, Default)]
pub struct ToggleArgs {
    /// 0 removes the proxy entry, 1 installs it
    #[arg(long = "on-proxy", visible_alias = "onProxy", allow_negative_numbers = true)]
    pub on_proxy: Option<i64>,

    /// HTTP proxy address
    #[arg(long = "http-proxy", visible_alias = "httpProxy")]
    pub http_proxy: Option<String>,

    /// HTTPS proxy address
    #[arg(long = "https-proxy", visible_alias = "httpsProxy")]
    pub https_proxy: Option<String>,

    /// Hosts that bypass the proxy, comma separated
    #[arg(long = "no-proxy", visible_alias = "noProxy")]
    pub no_proxy: Option<String>,

    /// Number of config backups to keep
    #[arg(long = "max-backups")]
    pub max_backups: Option<usize>,
}

impl ToggleArgs {
    /// Proxy values from flags, falling back to settings
    pub fn proxy_settings(&self, defaults: &ProxySettings) -> ProxySettings {
        ProxySettings {
            http_proxy: self
                .http_proxy
                .clone()
                .unwrap_or_else(|| defaults.http_proxy.clone()),
            https_proxy: self
                .https_proxy
                .clone()
                .unwrap_or_else(|| defaults.https_proxy.clone()),
            no_proxy: self
                .no_proxy
                .clone()
                .unwrap_or_else(|| defaults.no_proxy.clone()),
        }
    }
}

/// Handle the top-level toggle
pub fn handle_toggle(
    paths: &DockerPaths,
    settings: &Settings,
    args: ToggleArgs,
) -> DockProxyResult<()> {
    let Some(raw_switch) = args.on_proxy else {
        println!("dockproxy - toggle the proxy entry in the Docker client config");
        println!();
        println!("Run 'dockproxy --on-proxy 1' to install the proxy entry.");
        println!("Run 'dockproxy --on-proxy 0' to remove it.");
        println!("Run 'dockproxy --help' for usage information.");
        return Ok(());
    };

    // Validate before touching the filesystem
    let switch = ProxySwitch::try_from(raw_switch)?;
    let proxy = args.proxy_settings(&settings.default_proxy);

    let mut effective = settings.clone();
    if let Some(max) = args.max_backups {
        effective.backup.max_backups = max;
    }

    println!("Configuration:");
    println!("  httpProxy:  {}", proxy.http_proxy);
    println!("  httpsProxy: {}", proxy.https_proxy);
    println!("  noProxy:    {}", proxy.no_proxy);
    println!("  Proxy:      {}", switch);
    println!();

    let report = ProxyService::new(paths, &effective).apply(switch, &proxy)?;

    if report.created {
        println!("Created {}", paths.config_file().display());
    }
    println!("Original config:");
    println!("{}", report.original.trim_end());
    println!();

    if let Some(backup) = &report.rotation.backup {
        println!("Backup: {}", backup.display());
    }
    if !report.rotation.pruned.is_empty() {
        println!(
            "Pruned {} old backup(s), keeping {}.",
            report.rotation.pruned.len(),
            report.rotation.retained
        );
    }
    println!();

    println!("Updated config:");
    println!("{}", report.updated.trim_end());

    Ok(())
}

/// Handle `dockproxy status`
pub fn handle_status(paths: &DockerPaths, settings: &Settings) -> DockProxyResult<()> {
    let service = ProxyService::new(paths, settings);

    match service.status()? {
        ProxyStatus::NoConfig => {
            println!("No Docker config at {}", paths.config_file().display());
            println!("Proxy: off");
        }
        ProxyStatus::Disabled => {
            println!("Config: {}", paths.config_file().display());
            println!("Proxy: off");
        }
        ProxyStatus::Enabled(entry) => {
            println!("Config: {}", paths.config_file().display());
            println!("Proxy: on");
            println!("  httpProxy:  {}", entry.default.http_proxy);
            println!("  httpsProxy: {}", entry.default.https_proxy);
            println!("  noProxy:    {}", entry.default.no_proxy);
        }
    }

    Ok(())
}
