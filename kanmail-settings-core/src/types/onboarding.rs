//! Onboarding phase and rendering views

use std::fmt;

use serde::Serialize;

use super::AccountSettings;

/// Add-account workflow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingPhase {
    /// No add-account in progress
    Idle,
    /// User filling name/username/password
    FormEntry,
    /// Autoconfiguration request in flight
    Submitting,
    /// Autoconfiguration failed; user edits a draft directly
    ManualConfig,
}

impl fmt::Display for OnboardingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FormEntry => "form entry",
            Self::Submitting => "submitting",
            Self::ManualConfig => "manual config",
        };
        f.write_str(name)
    }
}

/// Props handed to the account row / manual configuration renderer.
///
/// The renderer answers with `update(account_id, settings)` or
/// `delete(account_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView<'a> {
    pub account_id: &'a str,
    pub account_settings: &'a AccountSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'a str>,
    /// Manual configuration form: always in edit mode
    pub always_editing: bool,
}
