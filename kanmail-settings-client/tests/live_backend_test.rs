//! Integration tests against a running Kanmail backend
//!
//! Run with:
//! ```bash
//! KANMAIL_API_URL=http://127.0.0.1:4420 \
//!     cargo test -p kanmail-settings-client --test live_backend_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::TestContext;
use kanmail_settings_core::services::FormField;
use kanmail_settings_core::types::AutoconfigRequest;
use kanmail_settings_core::{AutoconfigService, OnboardingOutcome, SettingsModel, SettingsStore};

#[tokio::test]
#[ignore = "integration test: requires KANMAIL_API_URL"]
async fn test_load_settings() {
    skip_if_no_backend!("KANMAIL_API_URL");

    let ctx = require_some!(TestContext::from_env(), "Failed to create test context");
    let initial = require_ok!(ctx.client.load().await, "load failed");

    println!("✓ load passed, {} account(s)", initial.accounts.len());
}

#[tokio::test]
#[ignore = "integration test: requires KANMAIL_API_URL"]
async fn test_save_loaded_settings_unchanged() {
    skip_if_no_backend!("KANMAIL_API_URL");

    let ctx = require_some!(TestContext::from_env(), "Failed to create test context");
    let model = require_ok!(SettingsModel::load(ctx.ctx.clone()).await, "load failed");
    let before = model.snapshot();

    require_ok!(model.save().await, "save failed");

    let reloaded = require_ok!(SettingsModel::load(ctx.ctx.clone()).await, "reload failed");
    assert_eq!(reloaded.snapshot().accounts, before.accounts);

    println!("✓ save passed");
}

#[tokio::test]
#[ignore = "integration test: requires KANMAIL_API_URL"]
async fn test_autoconfigure_rejects_bogus_credentials() {
    skip_if_no_backend!("KANMAIL_API_URL");

    let ctx = require_some!(TestContext::from_env(), "Failed to create test context");
    let request = AutoconfigRequest {
        username: "nobody@invalid.example".to_string(),
        password: "not-a-password".to_string(),
    };

    let response = match ctx.client.autoconfigure(&request).await {
        Ok(response) => response,
        Err(failure) => failure.into_response(),
    };
    assert!(!response.connected, "bogus credentials should not connect");
    assert!(response.error_type.is_some());

    println!(
        "✓ autoconfigure rejected as {:?}",
        response.error_type.unwrap_or_default()
    );
}

#[tokio::test]
#[ignore = "integration test: requires KANMAIL_API_URL"]
async fn test_add_account_falls_back_to_manual_config() {
    skip_if_no_backend!("KANMAIL_API_URL");

    let ctx = require_some!(TestContext::from_env(), "Failed to create test context");
    let mut model = require_ok!(SettingsModel::load(ctx.ctx.clone()).await, "load failed");

    let name = format!("_test-{}", std::process::id());
    require_ok!(model.toggle_add_account(), "toggle failed");
    require_ok!(model.set_new_account_field(FormField::Name, name), "set name failed");
    require_ok!(
        model.set_new_account_field(FormField::Username, "nobody@invalid.example"),
        "set username failed"
    );
    require_ok!(
        model.set_new_account_field(FormField::Password, "not-a-password"),
        "set password failed"
    );

    let outcome = require_ok!(model.add_account().await, "add_account failed");
    assert_eq!(outcome, OnboardingOutcome::ManualConfigRequired);
    assert!(model.manual_config_view().is_some());

    // Nothing is persisted: discard the draft
    require_ok!(model.cancel_add_account(), "cancel failed");

    println!("✓ manual fallback passed");
}
