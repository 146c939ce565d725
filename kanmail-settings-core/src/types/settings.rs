//! Settings snapshot type definitions

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Connection/display fields of one account.
///
/// Opaque to this crate: the account form owns its shape.
pub type AccountSettings = serde_json::Map<String, Value>;

/// Account identifier -> account settings
pub type AccountsMap = BTreeMap<String, AccountSettings>;

/// Flat scalar preferences (numbers or strings)
pub type SettingsMap = BTreeMap<String, Value>;

/// Which flat preference container a field lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingsContainer {
    /// General/system preferences (sync window, batch sizes, undo delay)
    #[serde(rename = "systemSettings")]
    System,
    /// Cosmetic preferences (header colour)
    #[serde(rename = "styleSettings")]
    Style,
}

impl SettingsContainer {
    /// Key used for this container in the saved snapshot
    pub fn snapshot_key(self) -> &'static str {
        match self {
            Self::System => "systemSettings",
            Self::Style => "styleSettings",
        }
    }
}

impl fmt::Display for SettingsContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.snapshot_key())
    }
}

impl FromStr for SettingsContainer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" | "systemSettings" => Ok(Self::System),
            "style" | "styleSettings" => Ok(Self::Style),
            other => Err(format!("Unknown settings container: {other}")),
        }
    }
}

/// Settings object the screen is initialized from.
///
/// Every section is optional; missing or `null` sections become empty maps.
/// `columns` is kept verbatim and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialSettings {
    #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
    pub accounts: AccountsMap,
    #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
    pub system: SettingsMap,
    #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
    pub style: SettingsMap,
    #[serde(
        default,
        deserialize_with = "crate::utils::nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub columns: Option<Value>,
}

/// Full settings object handed to persistence on save
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    pub accounts: AccountsMap,
    pub system_settings: SettingsMap,
    pub style_settings: SettingsMap,
    #[serde(
        default,
        deserialize_with = "crate::utils::nullable::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub columns: Option<Value>,
}
