//! Collaborator abstraction trait definition

mod autoconfig_service;
mod settings_store;

pub use autoconfig_service::AutoconfigService;
pub use settings_store::SettingsStore;
