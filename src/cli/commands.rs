//! CLI command handlers

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::config::{self, paths, ConfigLoader, CONFIG_KEYS};

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get configuration value
    Get {
        /// Configuration key (e.g., "readOnly", "logger.tail")
        key: Option<String>,
        /// Context whose configuration layer is included
        #[arg(long)]
        context: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key (e.g., "readOnly", "logger.tail")
        key: String,
        /// Configuration value
        value: String,
        /// Context name for context-specific config
        #[arg(long)]
        context: Option<String>,
    },
    /// List all configuration keys and their effective values
    List {
        /// Context whose configuration layer is included
        #[arg(long)]
        context: Option<String>,
    },
    /// Show configuration file path
    Path {
        /// Show the context-specific file instead of the root file
        #[arg(long)]
        context: Option<String>,
    },
    /// Validate configuration
    Validate {
        /// Also validate this context's configuration layer
        #[arg(long)]
        context: Option<String>,
    },
}

/// Handle configuration subcommands
pub fn handle_config_command(cmd: ConfigSubcommand) -> Result<()> {
    match cmd {
        ConfigSubcommand::Get { key, context } => {
            let config =
                ConfigLoader::load(context.as_deref()).context("Failed to load configuration")?;

            if let Some(key) = key {
                println!("{}", config::get_config_value(&config, &key)?);
            } else {
                let yaml =
                    serde_yaml::to_string(&config).context("Failed to serialize configuration")?;
                print!("{}", yaml);
            }
        }
        ConfigSubcommand::Set {
            key,
            value,
            context,
        } => {
            // Only the target layer is rewritten, other layers stay untouched
            let path = match &context {
                Some(name) => paths::context_config_path(name),
                None => paths::root_config_path(),
            };
            ConfigLoader::set_in_file(&path, &key, &value)
                .with_context(|| format!("Failed to set {} = {}", key, value))?;

            match context {
                Some(name) => println!("Configuration saved for context: {}", name),
                None => println!("Configuration saved"),
            }
        }
        ConfigSubcommand::List { context } => {
            let config =
                ConfigLoader::load(context.as_deref()).context("Failed to load configuration")?;
            let width = CONFIG_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
            for key in CONFIG_KEYS {
                let value = config::get_config_value(&config, key)?;
                println!("{:width$}  {}", key, value, width = width);
            }
        }
        ConfigSubcommand::Path { context } => {
            let path = match context {
                Some(name) => paths::context_config_path(&name),
                None => paths::root_config_path(),
            };
            println!("{}", path.display());
        }
        ConfigSubcommand::Validate { context } => {
            ConfigLoader::validate(context.as_deref())
                .context("Configuration validation failed")?;
            println!("Configuration is valid");
        }
    }

    Ok(())
}
