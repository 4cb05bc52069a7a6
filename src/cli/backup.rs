//! Backup CLI commands
//!
//! Implements CLI commands for listing and restoring config backups.

use clap::Subcommand;

use crate::config::paths::DockerPaths;
use crate::config::settings::Settings;
use crate::error::DockProxyResult;
use crate::services::BackupService;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// List all available backups, newest first
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore the config from a backup
    Restore {
        /// Backup filename (use 'latest' for most recent)
        backup: String,

        /// Actually restore instead of only describing the backup
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &DockerPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> DockProxyResult<()> {
    let service = BackupService::new(paths, settings);

    match cmd {
        BackupCommands::List { verbose } => {
            let set = service.list()?;

            if set.is_empty() {
                println!("No backups found in {}", paths.backup_dir().display());
                return Ok(());
            }

            let title = format!("Backups of {}", set.base_name());
            println!("{}", title);
            println!("{}", "=".repeat(title.len()));
            println!();

            let now = chrono::Utc::now();
            for (i, backup) in set.entries().iter().rev().enumerate() {
                let age_str = backup
                    .created_at()
                    .map(|t| format_duration(now.signed_duration_since(t)))
                    .unwrap_or_else(|| "unknown".to_string());

                if verbose {
                    println!("{}. {}", i + 1, backup.filename);
                    if let Some(created) = backup.created_at() {
                        println!("   Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
                    }
                    println!("   Size: {}", format_size(backup.size_bytes));
                    println!("   Age: {}", age_str);
                    println!();
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.filename,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!(
                "Total: {} backup(s), keeping at most {}",
                set.len(),
                settings.backup.max_backups
            );
        }

        BackupCommands::Restore { backup, force } => {
            let (entry, validation) = service.inspect(&backup)?;

            println!("Backup Information");
            println!("==================");
            println!("File: {}", entry.path.display());
            if let Some(created) = entry.created_at() {
                println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!("Size: {}", format_size(validation.size_bytes));
            println!("Contents: {}", validation.summary());
            println!();

            if !force {
                println!("This will overwrite {}", paths.config_file().display());
                println!("To proceed, run again with --force flag:");
                println!("  dockproxy backups restore {} --force", backup);
                return Ok(());
            }

            let result = service.restore(&backup)?;

            if let Some(snapshot) = &result.pre_restore_backup {
                println!("Pre-restore backup saved: {}", snapshot.display());
            }
            if !result.pruned.is_empty() {
                println!("Pruned {} old backup(s).", result.pruned.len());
            }
            println!("Restored {}", paths.config_file().display());
        }
    }

    Ok(())
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
