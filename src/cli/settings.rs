//! Settings CLI commands

use clap::Subcommand;

use crate::config::paths::DockerPaths;
use crate::config::settings::Settings;
use crate::error::DockProxyResult;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Write the settings file with current values
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective settings
    Show,
}

/// Handle a settings command
pub fn handle_settings_command(
    paths: &DockerPaths,
    settings: &Settings,
    cmd: SettingsCommands,
) -> DockProxyResult<()> {
    match cmd {
        SettingsCommands::Init { force } => {
            let file = paths.settings_file();
            if file.exists() && !force {
                println!("Settings already exist at {}", file.display());
                println!("Run again with --force to overwrite.");
                return Ok(());
            }

            settings.save(paths)?;
            println!("Settings written to {}", file.display());
        }

        SettingsCommands::Show => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
    }

    Ok(())
}
