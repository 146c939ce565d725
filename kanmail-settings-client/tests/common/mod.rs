//! Shared helpers for live backend tests

#![allow(dead_code)]

use std::sync::Arc;

use kanmail_settings_client::{ClientConfig, HttpSettingsClient};
use kanmail_settings_core::ServiceContext;

/// Skip the test when a required environment variable is missing
#[macro_export]
macro_rules! skip_if_no_backend {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert `Option` is `Some` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Assert `Result` is `Ok` and unwrap it (fails the test otherwise).
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Client and context wired to the backend named by `KANMAIL_API_URL`
pub struct TestContext {
    pub client: Arc<HttpSettingsClient>,
    pub ctx: Arc<ServiceContext>,
}

impl TestContext {
    pub fn from_env() -> Option<Self> {
        let mut config = ClientConfig::default();
        config.apply_env(|key| std::env::var(key).ok()).ok()?;
        let client = Arc::new(HttpSettingsClient::new(config).ok()?);
        let ctx = Arc::new(ServiceContext::new(client.clone(), client.clone()));
        Some(Self { client, ctx })
    }
}
