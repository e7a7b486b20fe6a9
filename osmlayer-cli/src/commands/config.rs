//! Configuration management CLI commands.
//!
//! Provides `config path`, `config show`, and `config init` for inspecting
//! and creating the configuration file.

use clap::Subcommand;
use osmlayer::config::{config_path, ConfigFile};
use osmlayer::LayerConfig;

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,

    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, config: &LayerConfig) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => run_path(),
        ConfigCommands::Show => {
            for line in describe(config) {
                println!("{}", line);
            }
            Ok(())
        }
        ConfigCommands::Init { force } => run_init(force),
    }
}

fn run_path() -> Result<(), CliError> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn run_init(force: bool) -> Result<(), CliError> {
    let path = config_path()?;
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        )));
    }
    ConfigFile::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Effective settings grouped by file section.
pub fn describe(config: &LayerConfig) -> Vec<String> {
    vec![
        "[overpass]".to_string(),
        format!("  endpoint = {}", config.endpoint),
        format!("  query = {}", config.query.as_str()),
        format!("  min_zoom = {}", config.min_zoom),
        format!("  timeout_secs = {}", config.request_timeout_secs),
        String::new(),
        "[features]".to_string(),
        format!("  area_tags = {}", config.area_tags.join(", ")),
        format!(
            "  uninteresting_tags = {}",
            config.uninteresting_tags.join(", ")
        ),
        String::new(),
        "[indicator]".to_string(),
        format!("  no_layer = {}", config.indicator_messages.no_layer),
        format!("  template = {}", config.indicator_messages.template),
        String::new(),
        "[logging]".to_string(),
        format!("  debug = {}", config.debug),
    ]
}
