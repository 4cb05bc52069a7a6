//! Audit CLI command
//!
//! Prints the most recent entries of the audit log.

use clap::Args;

use crate::audit::AuditLogger;
use crate::config::paths::DockerPaths;
use crate::error::DockProxyResult;

/// Arguments for `dockproxy audit`
#[derive(Args, Debug)]
pub struct AuditArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Handle the audit command
pub fn handle_audit(paths: &DockerPaths, args: AuditArgs) -> DockProxyResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(args.limit)?;

    if entries.is_empty() {
        println!("No audit entries in {}", logger.path().display());
        return Ok(());
    }

    println!("Audit Log ({})", logger.path().display());
    println!();
    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
