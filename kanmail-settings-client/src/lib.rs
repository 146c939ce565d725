//! # kanmail-settings-client
//!
//! HTTP adapters that connect the settings model in `kanmail-settings-core`
//! to a running Kanmail backend.
//!
//! | Endpoint | Trait | Retries | Timeout |
//! |----------|-------|---------|---------|
//! | `GET /api/settings` | [`SettingsStore::load`] | `load_retries` | configured |
//! | `POST /api/settings` | [`SettingsStore::save`] | none | none |
//! | `POST /api/settings/account/new` | [`AutoconfigService::autoconfigure`] | none | configured |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kanmail_settings_client::{ClientConfig, HttpSettingsClient};
//! use kanmail_settings_core::{ServiceContext, SettingsModel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(HttpSettingsClient::new(ClientConfig::resolve()?)?);
//!     let ctx = Arc::new(ServiceContext::new(client.clone(), client));
//!
//!     let model = SettingsModel::load(ctx).await?;
//!     for view in model.account_views() {
//!         println!("{}", view.account_id);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Transport operations fail with [`ClientError`]. At the trait boundary
//! errors are mapped into the core types: `SettingsError::Load`,
//! `SettingsError::Persistence` or a `ProbeFailure` that drives the manual
//! configuration fallback.
//!
//! [`SettingsStore::load`]: kanmail_settings_core::SettingsStore::load
//! [`SettingsStore::save`]: kanmail_settings_core::SettingsStore::save
//! [`AutoconfigService::autoconfigure`]: kanmail_settings_core::AutoconfigService::autoconfigure

mod config;
mod error;
mod http_client;
mod settings_client;
mod utils;

pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_LOAD_RETRIES, ENV_API_URL, ENV_LOAD_RETRIES,
    ENV_TIMEOUT_SECS, config_path,
};
pub use error::{ClientError, Result};
pub use settings_client::{AUTOCONFIG_PATH, HttpSettingsClient, SETTINGS_PATH};
pub use utils::log_sanitizer;
