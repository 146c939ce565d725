//! Test helper module
//!
//! Provides mock collaborators and convenient test factory methods.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::RwLock;

use crate::error::{ProbeFailure, SettingsError, SettingsResult};
use crate::services::ServiceContext;
use crate::traits::{AutoconfigService, SettingsStore};
use crate::types::{
    AccountSettings, AutoconfigRequest, AutoconfigResponse, InitialSettings, SettingsSnapshot,
};

// ===== MockAutoconfigService =====

pub struct MockAutoconfigService {
    requests: RwLock<Vec<AutoconfigRequest>>,
    /// Answers handed out in order; an empty queue behaves like an unreachable endpoint
    responses: RwLock<VecDeque<Result<AutoconfigResponse, ProbeFailure>>>,
}

impl MockAutoconfigService {
    pub fn new() -> Self {
        Self {
            requests: RwLock::new(Vec::new()),
            responses: RwLock::new(VecDeque::new()),
        }
    }

    pub async fn push_response(&self, response: Result<AutoconfigResponse, ProbeFailure>) {
        self.responses.write().await.push_back(response);
    }

    pub async fn requests(&self) -> Vec<AutoconfigRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl AutoconfigService for MockAutoconfigService {
    async fn autoconfigure(
        &self,
        request: &AutoconfigRequest,
    ) -> Result<AutoconfigResponse, ProbeFailure> {
        self.requests.write().await.push(request.clone());
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ProbeFailure::transport("no scripted response")))
    }
}

// ===== MockSettingsStore =====

pub struct MockSettingsStore {
    initial: RwLock<InitialSettings>,
    saved: RwLock<Vec<SettingsSnapshot>>,
    /// If Some, save returns this error (used to test retry paths)
    save_error: RwLock<Option<String>>,
    load_error: RwLock<Option<String>>,
}

impl MockSettingsStore {
    pub fn new() -> Self {
        Self {
            initial: RwLock::new(InitialSettings::default()),
            saved: RwLock::new(Vec::new()),
            save_error: RwLock::new(None),
            load_error: RwLock::new(None),
        }
    }

    pub async fn set_initial(&self, initial: InitialSettings) {
        *self.initial.write().await = initial;
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    pub async fn set_load_error(&self, err: Option<String>) {
        *self.load_error.write().await = err;
    }

    pub async fn saved(&self) -> Vec<SettingsSnapshot> {
        self.saved.read().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    async fn load(&self) -> SettingsResult<InitialSettings> {
        if let Some(ref msg) = *self.load_error.read().await {
            return Err(SettingsError::Load(msg.clone()));
        }
        Ok(self.initial.read().await.clone())
    }

    async fn save(&self, snapshot: &SettingsSnapshot) -> SettingsResult<()> {
        if let Some(ref msg) = *self.save_error.read().await {
            return Err(SettingsError::Persistence(msg.clone()));
        }
        self.saved.write().await.push(snapshot.clone());
        Ok(())
    }
}

// ===== Factories =====

/// Context wired to fresh mocks
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockAutoconfigService>,
    Arc<MockSettingsStore>,
) {
    let autoconfig = Arc::new(MockAutoconfigService::new());
    let store = Arc::new(MockSettingsStore::new());
    let ctx = Arc::new(ServiceContext::new(autoconfig.clone(), store.clone()));
    (ctx, autoconfig, store)
}

/// Account settings as the account form would produce them
pub fn test_account_settings(host: &str) -> AccountSettings {
    let mut settings = AccountSettings::new();
    settings.insert("imap_connection".into(), json!({ "host": host, "port": 993 }));
    settings.insert("smtp_connection".into(), json!({ "host": host, "port": 587 }));
    settings
}
