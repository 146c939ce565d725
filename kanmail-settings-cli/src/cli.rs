use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kanmail_settings_client::ClientConfig;
use kanmail_settings_core::types::SettingsContainer;

#[derive(Parser)]
#[command(name = "kanmail-settings")]
#[command(about = "Inspect and edit Kanmail settings from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Kanmail backend URL (overrides KANMAIL_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Timeout in seconds for loading settings and autoconfiguration
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the settings snapshot as JSON
    Show,
    /// List the known preference fields with their current values
    Fields,
    /// Set a preference field and save
    Set {
        /// Container: system or style
        container: SettingsContainer,
        /// Field key, e.g. sync_days
        key: String,
        /// New value; known number fields are stored as numbers
        value: String,
    },
    /// Remove an account and save
    DeleteAccount {
        /// Account name
        id: String,
    },
    /// Replace an account's settings from a JSON file and save
    UpdateAccount {
        /// Account name
        id: String,
        /// JSON object with the full account settings
        #[arg(value_name = "PATH")]
        settings: PathBuf,
    },
    /// Add an account via autoconfiguration and save
    AddAccount {
        /// Name for the new account
        #[arg(long)]
        name: String,
        /// Email / login
        #[arg(long)]
        username: String,
        /// Account password; prefer the environment variable over argv
        #[arg(long, env = "KANMAIL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Account settings to use if autoconfiguration fails
        #[arg(long, value_name = "PATH")]
        manual: Option<PathBuf>,
    },
}

impl Cli {
    /// Resolved client configuration with command-line overrides applied
    pub fn client_config(&self) -> kanmail_settings_client::Result<ClientConfig> {
        let mut config = ClientConfig::resolve()?;
        if let Some(url) = &self.api_url {
            config.base_url.clone_from(url);
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = Some(secs);
        }
        config.validate()?;
        Ok(config)
    }
}
