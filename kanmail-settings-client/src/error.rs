use kanmail_settings_core::{ProbeFailure, SettingsError};

/// Error type for all calls made against the Kanmail backend.
///
/// # Retryable Errors
///
/// - [`NetworkError`](Self::NetworkError): connection refused, reset, 502/503/504
/// - [`Timeout`](Self::Timeout): configured request timeout elapsed
///
/// Only the initial settings load retries these; autoconfiguration and save
/// are single-shot.
#[derive(Debug, Clone)]
pub enum ClientError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The backend answered with a non-2xx status.
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Failed to parse the backend's response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The configured base URL cannot address the backend.
    InvalidUrl {
        url: String,
        detail: String,
    },

    /// Client configuration could not be read or is unusable.
    ConfigError {
        detail: String,
    },
}

impl ClientError {
    /// Whether it is expected behavior (backend down or rejecting), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    /// Map a failed initial load into the core error
    #[must_use]
    pub fn into_load_error(self) -> SettingsError {
        SettingsError::Load(self.to_string())
    }

    /// Map a failed save into the core error
    #[must_use]
    pub fn into_persistence_error(self) -> SettingsError {
        SettingsError::Persistence(self.to_string())
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => write!(f, "Network error: {detail}"),
            Self::Timeout { detail } => write!(f, "Request timeout: {detail}"),
            Self::HttpStatus { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {status}")
                } else {
                    write!(f, "HTTP {status}: {body}")
                }
            }
            Self::ParseError { detail } => write!(f, "Parse error: {detail}"),
            Self::SerializationError { detail } => write!(f, "Serialization error: {detail}"),
            Self::InvalidUrl { url, detail } => write!(f, "Invalid URL '{url}': {detail}"),
            Self::ConfigError { detail } => write!(f, "Configuration error: {detail}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Failures reaching the autoconfiguration endpoint carry no payload; the
/// flow synthesizes a `connection` answer from the message.
impl From<ClientError> for ProbeFailure {
    fn from(err: ClientError) -> Self {
        ProbeFailure::transport(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ClientError::NetworkError {
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "Network error: connection refused");
    }

    #[test]
    fn display_http_status_with_body() {
        let e = ClientError::HttpStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(e.to_string(), "HTTP 500: boom");
    }

    #[test]
    fn display_http_status_without_body() {
        let e = ClientError::HttpStatus {
            status: 404,
            body: String::new(),
        };
        assert_eq!(e.to_string(), "HTTP 404");
    }

    #[test]
    fn display_invalid_url() {
        let e = ClientError::InvalidUrl {
            url: "nope".to_string(),
            detail: "relative URL without a base".to_string(),
        };
        assert_eq!(e.to_string(), "Invalid URL 'nope': relative URL without a base");
    }

    #[test]
    fn expected_classification() {
        assert!(
            ClientError::Timeout {
                detail: "30s".into()
            }
            .is_expected()
        );
        assert!(
            !ClientError::ParseError {
                detail: "eof".into()
            }
            .is_expected()
        );
        assert!(
            !ClientError::ConfigError {
                detail: "bad".into()
            }
            .is_expected()
        );
    }

    #[test]
    fn maps_into_core_errors() {
        let e = ClientError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        assert!(matches!(e.clone().into_load_error(), SettingsError::Load(ref m) if m == "HTTP 503"));
        assert!(matches!(
            e.into_persistence_error(),
            SettingsError::Persistence(ref m) if m == "HTTP 503"
        ));
    }

    #[test]
    fn transport_error_becomes_payloadless_probe_failure() {
        let failure: ProbeFailure = ClientError::NetworkError {
            detail: "connection refused".into(),
        }
        .into();
        assert!(failure.payload.is_none());
        assert_eq!(failure.message, "Network error: connection refused");
    }
}
