//! Autoconfiguration endpoint payloads

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AccountSettings;

/// Body sent to the autoconfiguration endpoint
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoconfigRequest {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AutoconfigRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoconfigRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Autoconfiguration answer.
///
/// `connected: true` carries complete settings. `connected: false` carries
/// whatever partial settings the probe managed to derive plus an error
/// message and classification (e.g. `auth`, `imap`, `connection`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoconfigResponse {
    pub connected: bool,
    #[serde(default, deserialize_with = "crate::utils::nullable::deserialize")]
    pub settings: AccountSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl AutoconfigResponse {
    /// Successful connection with complete settings
    #[must_use]
    pub fn connected(settings: AccountSettings) -> Self {
        Self {
            connected: true,
            settings,
            error_message: None,
            error_type: None,
        }
    }

    /// Negative answer with partial settings
    #[must_use]
    pub fn rejected(
        settings: AccountSettings,
        error_message: impl Into<String>,
        error_type: impl Into<String>,
    ) -> Self {
        Self {
            connected: false,
            settings,
            error_message: Some(error_message.into()),
            error_type: Some(error_type.into()),
        }
    }
}
