use super::*;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use kanmail_settings_core::types::{
    AutoconfigRequest, AutoconfigResponse, InitialSettings, SettingsSnapshot,
};
use kanmail_settings_core::{
    AutoconfigService, ProbeFailure, ServiceContext, SettingsError, SettingsResult, SettingsStore,
};
use tokio::sync::RwLock;

/// Autoconfiguration service answering from a script.
pub struct ScriptedAutoconfig {
    responses: RwLock<VecDeque<Result<AutoconfigResponse, ProbeFailure>>>,
    calls: RwLock<usize>,
}

impl ScriptedAutoconfig {
    pub fn new(responses: Vec<Result<AutoconfigResponse, ProbeFailure>>) -> Self {
        Self {
            responses: RwLock::new(responses.into()),
            calls: RwLock::new(0),
        }
    }

    pub async fn calls(&self) -> usize {
        *self.calls.read().await
    }
}

#[async_trait]
impl AutoconfigService for ScriptedAutoconfig {
    async fn autoconfigure(
        &self,
        _request: &AutoconfigRequest,
    ) -> Result<AutoconfigResponse, ProbeFailure> {
        *self.calls.write().await += 1;
        self.responses
            .write()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ProbeFailure::transport("mock autoconfig unreachable")))
    }
}

/// Settings store keeping every saved snapshot in memory.
#[derive(Default)]
pub struct MemorySettingsStore {
    saved: RwLock<Vec<SettingsSnapshot>>,
    fail_saves: bool,
}

impl MemorySettingsStore {
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub async fn saved(&self) -> Vec<SettingsSnapshot> {
        self.saved.read().await.clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> SettingsResult<InitialSettings> {
        Ok(InitialSettings::default())
    }

    async fn save(&self, snapshot: &SettingsSnapshot) -> SettingsResult<()> {
        if self.fail_saves {
            return Err(SettingsError::Persistence("mock save failure".to_string()));
        }
        self.saved.write().await.push(snapshot.clone());
        Ok(())
    }
}

/// Model over the given initial settings, wired to the given mocks
pub fn build_model(
    initial: InitialSettings,
    autoconfig: Arc<ScriptedAutoconfig>,
    store: Arc<MemorySettingsStore>,
) -> SettingsModel {
    let ctx = Arc::new(ServiceContext::new(autoconfig, store));
    SettingsModel::new(ctx, initial)
}

pub fn account_settings(host: &str) -> AccountSettings {
    let mut settings = AccountSettings::new();
    settings.insert(
        "imap_connection".to_string(),
        serde_json::json!({ "host": host, "port": 993 }),
    );
    settings
}

/// Write `value` to a unique file under the temp directory
pub fn write_temp_json(name: &str, value: &Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "kanmail-settings-cli-{}-{name}.json",
        std::process::id()
    ));
    fs::write(&path, value.to_string()).unwrap();
    path
}
