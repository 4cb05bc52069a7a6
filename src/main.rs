use anyhow::Result;
use clap::{Parser, Subcommand};

use dockproxy::cli::{
    handle_audit, handle_backup_command, handle_settings_command, handle_status, handle_toggle,
    AuditArgs, BackupCommands, SettingsCommands, ToggleArgs,
};
use dockproxy::config::{paths::DockerPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "dockproxy",
    version,
    about = "Toggle the proxy entry in the Docker client config",
    long_about = "dockproxy installs or removes the `proxies` entry in \
                  ~/.docker/config.json. The config is backed up to \
                  ~/.docker/config_back before every change, keeping the \
                  most recent copies.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    toggle: ToggleArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether the proxy entry is installed
    Status,

    /// Config backup commands
    #[command(subcommand, alias = "backup")]
    Backups(BackupCommands),

    /// Show recent changes from the audit log
    Audit(AuditArgs),

    /// dockproxy settings commands
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Show resolved paths
    Paths,
}

fn main() -> Result<()> {
    dockproxy::logging::init_tracing();

    let cli = Cli::parse();

    let paths = DockerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        None => handle_toggle(&paths, &settings, cli.toggle)?,
        Some(Commands::Status) => handle_status(&paths, &settings)?,
        Some(Commands::Backups(cmd)) => handle_backup_command(&paths, &settings, cmd)?,
        Some(Commands::Audit(args)) => handle_audit(&paths, args)?,
        Some(Commands::Settings(cmd)) => handle_settings_command(&paths, &settings, cmd)?,
        Some(Commands::Paths) => {
            println!("dockproxy Paths");
            println!("===============");
            println!("Docker config:    {}", paths.config_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings dir:     {}", paths.settings_dir().display());
            println!("Lock file:        {}", paths.lock_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
        }
    }

    Ok(())
}
