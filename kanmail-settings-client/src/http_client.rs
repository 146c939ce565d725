//! Request plumbing shared by the settings endpoints
//!
//! Every call goes through [`send`] (or [`send_with_retry`] for the initial
//! load). Status interpretation stays with the endpoint; only gateway errors
//! are turned into errors here, since they mean the backend is restarting.

use std::time::Duration;

use reqwest::{Client, Request, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::utils::log_sanitizer::sanitize_body;

/// First retry delay; doubles per attempt
const BACKOFF_BASE_MS: u64 = 100;
const BACKOFF_MAX_MS: u64 = 10_000;

/// Status and body of a backend reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn build(builder: RequestBuilder, operation: &str) -> Result<(Client, Request), ClientError> {
    let (client, request) = builder.build_split();
    let request = request.map_err(|e| ClientError::ConfigError {
        detail: format!("[{operation}] Invalid request: {e}"),
    })?;
    Ok((client, request))
}

async fn execute(client: &Client, request: Request, operation: &str) -> Result<Reply, ClientError> {
    log::debug!("[{operation}] {} {}", request.method(), request.url());

    let response = client.execute(request).await.map_err(|e| {
        if e.is_timeout() {
            ClientError::Timeout {
                detail: e.to_string(),
            }
        } else {
            ClientError::NetworkError {
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::NetworkError {
            detail: format!("Failed to read response body: {e}"),
        })?;
    log::debug!("[{operation}] HTTP {status}: {}", sanitize_body(&body));

    if matches!(status, 502..=504) {
        log::warn!("[{operation}] Backend unavailable (HTTP {status})");
        return Err(ClientError::NetworkError {
            detail: format!("HTTP {status}: {}", sanitize_body(&body)),
        });
    }

    Ok(Reply { status, body })
}

/// Send once; the reply is returned whatever its status, except 502/503/504.
pub async fn send(builder: RequestBuilder, operation: &str) -> Result<Reply, ClientError> {
    let (client, request) = build(builder, operation)?;
    execute(&client, request, operation).await
}

/// Send, retrying network errors and timeouts up to `retries` more times.
///
/// Requests with a streaming body cannot be replayed and are sent once.
pub async fn send_with_retry(
    builder: RequestBuilder,
    operation: &str,
    retries: u32,
) -> Result<Reply, ClientError> {
    let (client, request) = build(builder, operation)?;

    let mut attempt = 0;
    loop {
        let replay = if attempt < retries {
            request.try_clone()
        } else {
            None
        };
        let Some(this_try) = replay else {
            return execute(&client, request, operation).await;
        };

        match execute(&client, this_try, operation).await {
            Err(e) if is_retryable(&e) => {
                let delay = backoff_delay(attempt);
                attempt += 1;
                log::warn!(
                    "[{operation}] Attempt {attempt}/{} failed, retrying in {}ms: {e}",
                    retries + 1,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            other => return other,
        }
    }
}

/// Decode a JSON reply body
pub fn parse_json<T: DeserializeOwned>(body: &str, operation: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "[{operation}] Unreadable reply ({e}): {}",
            sanitize_body(body)
        );
        ClientError::ParseError {
            detail: e.to_string(),
        }
    })
}

fn is_retryable(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::NetworkError { .. } | ClientError::Timeout { .. }
    )
}

fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1_u64.checked_shl(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_MAX_MS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanmail_settings_core::types::InitialSettings;

    #[test]
    fn transport_failures_are_retried() {
        assert!(is_retryable(&ClientError::NetworkError {
            detail: "connection reset".into(),
        }));
        assert!(is_retryable(&ClientError::Timeout {
            detail: "10s".into(),
        }));
    }

    #[test]
    fn answered_requests_are_not_retried() {
        assert!(!is_retryable(&ClientError::HttpStatus {
            status: 500,
            body: String::new(),
        }));
        assert!(!is_retryable(&ClientError::ParseError {
            detail: "eof".into(),
        }));
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        assert_eq!(backoff_delay(0), Duration::from_millis(100));
        assert_eq!(backoff_delay(1), Duration::from_millis(200));
        assert_eq!(backoff_delay(3), Duration::from_millis(800));
        assert_eq!(backoff_delay(7), Duration::from_millis(10_000));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(10_000));
    }

    #[test]
    fn reply_success_range() {
        let reply = |status| Reply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(204).is_success());
        assert!(!reply(304).is_success());
        assert!(!reply(400).is_success());
    }

    #[test]
    fn parses_settings_reply() {
        let body = r#"{"accounts":{"Work":{}},"system":{"sync_days":30},"style":{}}"#;
        let parsed: InitialSettings = parse_json(body, "settings-load").unwrap();
        assert!(parsed.accounts.contains_key("Work"));
        assert_eq!(parsed.system["sync_days"], 30);
    }

    #[test]
    fn garbled_reply_is_parse_error() {
        let result = parse_json::<InitialSettings>("<html>502</html>", "settings-load");
        assert!(
            matches!(&result, Err(ClientError::ParseError { .. })),
            "unexpected parse result: {result:?}"
        );
    }

    #[tokio::test]
    async fn unbuildable_request_is_config_error() {
        let builder = Client::new()
            .get("http://127.0.0.1:4420/api/settings")
            .header("bad\nheader", "x");
        let result = send(builder, "settings-load").await;
        assert!(matches!(result, Err(ClientError::ConfigError { .. })));
    }
}
