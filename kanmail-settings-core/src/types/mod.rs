//! Type definition module

mod autoconfig;
mod field;
mod onboarding;
mod settings;

pub use autoconfig::{AutoconfigRequest, AutoconfigResponse};
pub use field::{FieldKind, SettingField};
pub use onboarding::{AccountView, OnboardingPhase};
pub use settings::{
    AccountSettings, AccountsMap, InitialSettings, SettingsContainer, SettingsMap,
    SettingsSnapshot,
};
