//! Business logic service layer

mod onboarding;
mod settings_model;

pub use onboarding::{
    AccountForm, AccountOnboardingFlow, FormField, ManualDraft, NewAccount, OnboardingState,
    PendingProbe, ProbeApplied, ProbeCompletion,
};
pub use settings_model::{OnboardingOutcome, SettingsModel};

use std::sync::Arc;

use crate::traits::{AutoconfigService, SettingsStore};

/// Service context - holds all collaborators
///
/// The platform layer creates this context and injects its transport-specific
/// implementations.
pub struct ServiceContext {
    autoconfig_service: Arc<dyn AutoconfigService>,
    settings_store: Arc<dyn SettingsStore>,
}

impl ServiceContext {
    /// Create a service context
    #[must_use]
    pub fn new(
        autoconfig_service: Arc<dyn AutoconfigService>,
        settings_store: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            autoconfig_service,
            settings_store,
        }
    }

    pub fn autoconfig_service(&self) -> &Arc<dyn AutoconfigService> {
        &self.autoconfig_service
    }

    pub fn settings_store(&self) -> &Arc<dyn SettingsStore> {
        &self.settings_store
    }
}
