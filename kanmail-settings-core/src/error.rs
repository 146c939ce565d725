//! Unified error type definition

use thiserror::Error;

use crate::types::{AccountSettings, AutoconfigResponse, OnboardingPhase};

/// Error classification used when a transport failure carries no payload.
pub const CONNECTION_ERROR_TYPE: &str = "connection";

/// Add-account form validation failure.
///
/// Raised before any network call; the onboarding phase does not change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name, username or password is empty
    #[error("Missing name, email or password!")]
    MissingField,

    /// The candidate name is already an account identifier
    #[error("There is already an account called {0}")]
    DuplicateAccountName(String),
}

/// Core layer error type
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Add-account form rejected locally
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Programming error, e.g. updating an account that does not exist
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Onboarding operation invoked in a phase where it is undefined
    #[error("Cannot {operation} while onboarding is {phase}")]
    InvalidPhase {
        operation: &'static str,
        phase: OnboardingPhase,
    },

    /// Saving the snapshot failed; the snapshot is left untouched
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Loading the initial settings failed
    #[error("Load error: {0}")]
    Load(String),
}

impl SettingsError {
    /// Whether it is expected behavior (user input, backend down), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Load(_) => true,
            Self::InvariantViolation(_) | Self::InvalidPhase { .. } | Self::Persistence(_) => {
                false
            }
        }
    }
}

/// Autoconfiguration probe failure.
///
/// Both negative answers delivered on the error channel and transport
/// failures end up here. The flow never surfaces it as an error: it is
/// converted into an equivalent negative response that drives the manual
/// configuration fallback.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ProbeFailure {
    /// Human-readable failure description
    pub message: String,
    /// Response body recovered from the error channel, if any
    pub payload: Option<AutoconfigResponse>,
}

impl ProbeFailure {
    /// Failure with no usable response body (connection refused, timeout, ...)
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    /// Failure whose error channel still carried a response body
    #[must_use]
    pub fn with_payload(message: impl Into<String>, payload: AutoconfigResponse) -> Self {
        Self {
            message: message.into(),
            payload: Some(payload),
        }
    }

    /// Extract the payload the flow treats exactly like an application-level answer.
    ///
    /// Without a payload, a negative response with empty settings, the
    /// failure message and the `connection` error type is synthesized.
    #[must_use]
    pub fn into_response(self) -> AutoconfigResponse {
        match self.payload {
            Some(payload) => payload,
            None => AutoconfigResponse::rejected(
                AccountSettings::new(),
                self.message,
                CONNECTION_ERROR_TYPE,
            ),
        }
    }
}

/// Core layer Result type alias
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;
