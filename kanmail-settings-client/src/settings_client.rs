//! HTTP adapter for the Kanmail settings backend

use async_trait::async_trait;
use kanmail_settings_core::types::{
    AutoconfigRequest, AutoconfigResponse, InitialSettings, SettingsSnapshot,
};
use kanmail_settings_core::{AutoconfigService, ProbeFailure, SettingsResult, SettingsStore};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http_client::{self, Reply};
use crate::utils::log_sanitizer::sanitize_body;

pub const AUTOCONFIG_PATH: &str = "/api/settings/account/new";
pub const SETTINGS_PATH: &str = "/api/settings";

const AUTOCONFIG_OP: &str = "autoconfig";
const LOAD_OP: &str = "settings-load";
const SAVE_OP: &str = "settings-save";

/// Talks to a running Kanmail backend.
///
/// Implements both collaborator traits, so one instance can back the whole
/// `ServiceContext`.
pub struct HttpSettingsClient {
    client: Client,
    config: ClientConfig,
}

impl HttpSettingsClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::ConfigError {
                detail: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn with_timeout(&self, request: RequestBuilder) -> RequestBuilder {
        match self.config.request_timeout() {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    fn json_body<T: Serialize>(value: &T, operation: &str) -> Result<String> {
        let body = serde_json::to_string(value).map_err(|e| ClientError::SerializationError {
            detail: e.to_string(),
        })?;
        log::debug!("[{operation}] Request Body: {}", sanitize_body(&body));
        Ok(body)
    }

    async fn post_autoconfig(&self, request: &AutoconfigRequest) -> Result<Reply> {
        let url = self.config.endpoint(AUTOCONFIG_PATH)?;
        let body = Self::json_body(request, AUTOCONFIG_OP)?;
        let builder = self.with_timeout(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        );
        http_client::send(builder, AUTOCONFIG_OP).await
    }

    async fn fetch_settings(&self) -> Result<InitialSettings> {
        let url = self.config.endpoint(SETTINGS_PATH)?;
        let builder = self.with_timeout(self.client.get(url));
        let reply =
            http_client::send_with_retry(builder, LOAD_OP, self.config.load_retries).await?;
        if !reply.is_success() {
            return Err(status_error(reply.status, &reply.body));
        }
        http_client::parse_json(&reply.body, LOAD_OP)
    }

    async fn post_settings(&self, snapshot: &SettingsSnapshot) -> Result<()> {
        let url = self.config.endpoint(SETTINGS_PATH)?;
        let body = Self::json_body(snapshot, SAVE_OP)?;
        let builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        let reply = http_client::send(builder, SAVE_OP).await?;
        if !reply.is_success() {
            return Err(status_error(reply.status, &reply.body));
        }
        Ok(())
    }
}

/// Non-2xx reply as an error; the body ends up in logs, so it is sanitized
fn status_error(status: u16, body: &str) -> ClientError {
    ClientError::HttpStatus {
        status,
        body: sanitize_body(body),
    }
}

/// Turn an autoconfiguration reply into the probe result.
///
/// A non-2xx reply whose body still parses as an answer is the error channel
/// carrying a negative answer; its body becomes the failure payload.
fn classify_autoconfig(reply: &Reply) -> std::result::Result<AutoconfigResponse, ProbeFailure> {
    if reply.is_success() {
        return http_client::parse_json(&reply.body, AUTOCONFIG_OP).map_err(ProbeFailure::from);
    }

    let message = ClientError::HttpStatus {
        status: reply.status,
        body: String::new(),
    }
    .to_string();
    match serde_json::from_str::<AutoconfigResponse>(&reply.body) {
        Ok(payload) => Err(ProbeFailure::with_payload(message, payload)),
        Err(_) => Err(ProbeFailure::transport(message)),
    }
}

#[async_trait]
impl AutoconfigService for HttpSettingsClient {
    async fn autoconfigure(
        &self,
        request: &AutoconfigRequest,
    ) -> std::result::Result<AutoconfigResponse, ProbeFailure> {
        let reply = self.post_autoconfig(request).await.map_err(|e| {
            if e.is_expected() {
                log::warn!("[{AUTOCONFIG_OP}] {e}");
            } else {
                log::error!("[{AUTOCONFIG_OP}] {e}");
            }
            ProbeFailure::from(e)
        })?;
        classify_autoconfig(&reply)
    }
}

#[async_trait]
impl SettingsStore for HttpSettingsClient {
    async fn load(&self) -> SettingsResult<InitialSettings> {
        self.fetch_settings()
            .await
            .map_err(ClientError::into_load_error)
    }

    async fn save(&self, snapshot: &SettingsSnapshot) -> SettingsResult<()> {
        self.post_settings(snapshot)
            .await
            .map_err(ClientError::into_persistence_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify(status: u16, body: &str) -> std::result::Result<AutoconfigResponse, ProbeFailure> {
        classify_autoconfig(&Reply {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn success_reply_is_the_answer() {
        let body = json!({
            "connected": true,
            "settings": { "imap_connection": { "host": "imap.work.com" } },
        })
        .to_string();

        let response = classify(200, &body).unwrap();
        assert!(response.connected);
        assert_eq!(
            response.settings.get("imap_connection"),
            Some(&json!({ "host": "imap.work.com" }))
        );
    }

    #[test]
    fn negative_answer_on_success_channel_stays_ok() {
        let body = json!({
            "connected": false,
            "settings": null,
            "error_message": "bad login",
            "error_type": "auth",
        })
        .to_string();

        let response = classify(200, &body).unwrap();
        assert!(!response.connected);
        assert!(response.settings.is_empty());
        assert_eq!(response.error_type.as_deref(), Some("auth"));
    }

    #[test]
    fn error_status_with_body_carries_payload() {
        let body = json!({
            "connected": false,
            "settings": { "imap_connection": { "host": "imap.partial.com" } },
            "error_message": "IMAP refused",
            "error_type": "imap",
        })
        .to_string();

        let failure = classify(400, &body).unwrap_err();
        assert_eq!(failure.message, "HTTP 400");
        let payload = failure.payload.unwrap();
        assert_eq!(payload.error_message.as_deref(), Some("IMAP refused"));
        assert_eq!(payload.error_type.as_deref(), Some("imap"));
    }

    #[test]
    fn error_status_without_body_is_transport_failure() {
        let failure = classify(500, "Internal Server Error").unwrap_err();
        assert!(failure.payload.is_none());

        let response = failure.into_response();
        assert!(!response.connected);
        assert_eq!(response.error_type.as_deref(), Some("connection"));
    }

    #[test]
    fn garbled_success_body_is_transport_failure() {
        let failure = classify(200, "<html>").unwrap_err();
        assert!(failure.payload.is_none());
        assert!(failure.message.starts_with("Parse error"));
    }

    #[test]
    fn error_status_body_is_redacted_and_truncated() {
        let body = json!({
            "error": "x".repeat(1000),
            "accounts": { "Work": { "imap_connection": { "password": "hunter2" } } },
        })
        .to_string();

        let ClientError::HttpStatus { status, body } = status_error(500, &body) else {
            panic!("expected HttpStatus");
        };
        assert_eq!(status, 500);
        assert!(!body.contains("hunter2"));
        assert!(body.contains("[truncated"));
        assert!(body.len() < 400);
    }

    #[test]
    fn empty_error_status_body_stays_empty() {
        let e = status_error(503, "");
        assert_eq!(e.to_string(), "HTTP 503");
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            HttpSettingsClient::new(config),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_maps_to_core_errors() {
        // Grab a free port and release it so connections are refused
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ClientConfig {
            base_url: format!("http://127.0.0.1:{port}"),
            request_timeout_secs: Some(2),
            load_retries: 0,
        };
        let client = HttpSettingsClient::new(config).unwrap();

        let load = client.load().await;
        assert!(matches!(
            load,
            Err(kanmail_settings_core::SettingsError::Load(_))
        ));

        let save = client.save(&SettingsSnapshot::default()).await;
        assert!(matches!(
            save,
            Err(kanmail_settings_core::SettingsError::Persistence(_))
        ));

        let probe = client
            .autoconfigure(&AutoconfigRequest {
                username: "me@example.com".into(),
                password: "secret".into(),
            })
            .await
            .unwrap_err();
        assert!(probe.payload.is_none());
    }
}
