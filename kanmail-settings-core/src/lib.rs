//! Kanmail Settings Core Library
//!
//! Provides the platform-independent logic behind the settings screen:
//! - Settings model (accounts, system and style preferences, save snapshot)
//! - Add-account onboarding flow (autoconfiguration with manual fallback)
//!
//! Network access is abstracted behind the [`AutoconfigService`] and
//! [`SettingsStore`] traits so the same model drives an HTTP backend, a CLI
//! or test mocks.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{ProbeFailure, SettingsError, SettingsResult, ValidationError};
pub use services::{AccountOnboardingFlow, OnboardingOutcome, ServiceContext, SettingsModel};
pub use traits::{AutoconfigService, SettingsStore};
