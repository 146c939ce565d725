//! Settings screen model
//!
//! Single source of truth for the editable settings snapshot. Containers are
//! copy-on-write: every mutation produces a new map version, so a caller still
//! holding an older `Arc` keeps a consistent view and disjoint updates never
//! clobber each other.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{SettingsError, SettingsResult};
use crate::services::onboarding::{
    AccountOnboardingFlow, FormField, NewAccount, PendingProbe, ProbeApplied, ProbeCompletion,
};
use crate::services::ServiceContext;
use crate::types::{
    AccountSettings, AccountView, AccountsMap, InitialSettings, SettingField, SettingsContainer,
    SettingsMap, SettingsSnapshot,
};

/// Result of driving the add-account flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingOutcome {
    /// Account merged under this identifier; onboarding is back at baseline
    Completed(String),
    /// Autoconfiguration failed; the manual configuration draft is ready
    ManualConfigRequired,
    /// Probe result belonged to an abandoned attempt and was dropped
    Ignored,
}

/// Settings screen model
pub struct SettingsModel {
    ctx: Arc<ServiceContext>,
    accounts: Arc<AccountsMap>,
    system_settings: Arc<SettingsMap>,
    style_settings: Arc<SettingsMap>,
    /// Passed through to persistence untouched
    columns: Option<Value>,
    onboarding: AccountOnboardingFlow,
}

impl fmt::Debug for SettingsModel {
    // Account settings carry credentials; only identifiers are printed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsModel")
            .field("accounts", &self.accounts.keys().collect::<Vec<_>>())
            .field("system_settings", &self.system_settings)
            .field("style_settings", &self.style_settings)
            .field("columns", &self.columns)
            .field("onboarding", &self.onboarding.phase())
            .finish_non_exhaustive()
    }
}

impl SettingsModel {
    /// Create the model from externally supplied settings
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, initial: InitialSettings) -> Self {
        log::debug!(
            "Settings model initialized with {} account(s)",
            initial.accounts.len()
        );
        Self {
            ctx,
            accounts: Arc::new(initial.accounts),
            system_settings: Arc::new(initial.system),
            style_settings: Arc::new(initial.style),
            columns: initial.columns,
            onboarding: AccountOnboardingFlow::new(),
        }
    }

    /// Load the initial settings from the settings store
    pub async fn load(ctx: Arc<ServiceContext>) -> SettingsResult<Self> {
        let initial = ctx.settings_store().load().await.inspect_err(|e| {
            if e.is_expected() {
                log::warn!("Failed to load settings: {e}");
            } else {
                log::error!("Failed to load settings: {e}");
            }
        })?;
        Ok(Self::new(ctx, initial))
    }

    // ===== Accounts =====

    /// Current accounts mapping version
    pub fn accounts(&self) -> Arc<AccountsMap> {
        Arc::clone(&self.accounts)
    }

    pub fn account(&self, account_id: &str) -> Option<&AccountSettings> {
        self.accounts.get(account_id)
    }

    /// Renderer props for every account row
    pub fn account_views(&self) -> Vec<AccountView<'_>> {
        self.accounts
            .iter()
            .map(|(account_id, account_settings)| AccountView {
                account_id,
                account_settings,
                error: None,
                error_kind: None,
                always_editing: false,
            })
            .collect()
    }

    /// Remove an account; absent identifiers are a no-op.
    ///
    /// Returns whether anything was removed.
    pub fn delete_account(&mut self, account_id: &str) -> bool {
        if !self.accounts.contains_key(account_id) {
            log::debug!("Delete of unknown account {account_id} ignored");
            return false;
        }
        Arc::make_mut(&mut self.accounts).remove(account_id);
        log::debug!("Account {account_id} removed from settings");
        true
    }

    /// Replace the settings of an existing account.
    ///
    /// Updating an identifier that is not present is a programming error and
    /// never creates an entry.
    pub fn update_account(
        &mut self,
        account_id: &str,
        settings: AccountSettings,
    ) -> SettingsResult<()> {
        if !self.accounts.contains_key(account_id) {
            log::error!("Refusing to update unknown account {account_id}");
            return Err(SettingsError::InvariantViolation(format!(
                "Account not found: {account_id}"
            )));
        }
        Arc::make_mut(&mut self.accounts).insert(account_id.to_string(), settings);
        Ok(())
    }

    fn merge_new_account(&mut self, account: NewAccount) -> String {
        log::info!("Account {} added", account.account_id);
        Arc::make_mut(&mut self.accounts).insert(account.account_id.clone(), account.settings);
        account.account_id
    }

    // ===== Preference fields =====

    /// Current version of a preference container
    pub fn container(&self, container: SettingsContainer) -> Arc<SettingsMap> {
        match container {
            SettingsContainer::System => Arc::clone(&self.system_settings),
            SettingsContainer::Style => Arc::clone(&self.style_settings),
        }
    }

    pub fn field(&self, container: SettingsContainer, key: &str) -> Option<&Value> {
        match container {
            SettingsContainer::System => self.system_settings.get(key),
            SettingsContainer::Style => self.style_settings.get(key),
        }
    }

    /// Overwrite one field, leaving every other key untouched
    pub fn update_field(
        &mut self,
        container: SettingsContainer,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        let target = match container {
            SettingsContainer::System => &mut self.system_settings,
            SettingsContainer::Style => &mut self.style_settings,
        };
        Arc::make_mut(target).insert(key.into(), value.into());
    }

    /// Set a known screen field from raw input
    pub fn update_known_field(&mut self, field: SettingField, input: &str) {
        self.update_field(field.container(), field.key(), field.parse_input(input));
    }

    // ===== Persistence =====

    /// Assemble the snapshot handed to persistence
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            accounts: AccountsMap::clone(&self.accounts),
            system_settings: SettingsMap::clone(&self.system_settings),
            style_settings: SettingsMap::clone(&self.style_settings),
            columns: self.columns.clone(),
        }
    }

    /// Submit the snapshot to the settings store.
    ///
    /// Failures are logged and returned; the model stays editable and save may
    /// be retried.
    pub async fn save(&self) -> SettingsResult<()> {
        let snapshot = self.snapshot();
        match self.ctx.settings_store().save(&snapshot).await {
            Ok(()) => {
                log::info!(
                    "Settings saved ({} account(s))",
                    snapshot.accounts.len()
                );
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save settings: {e}");
                Err(e)
            }
        }
    }

    // ===== Add-account onboarding =====

    pub fn onboarding(&self) -> &AccountOnboardingFlow {
        &self.onboarding
    }

    /// Open or close the add-account form
    pub fn toggle_add_account(&mut self) -> SettingsResult<()> {
        self.onboarding.toggle()
    }

    pub fn set_new_account_field(
        &mut self,
        field: FormField,
        value: impl Into<String>,
    ) -> SettingsResult<()> {
        self.onboarding.set_field(field, value)
    }

    /// Validate the add-account form and enter `Submitting`.
    ///
    /// The caller runs the returned probe and feeds its completion to
    /// [`Self::apply_probe_result`].
    pub fn begin_add_account(&mut self) -> SettingsResult<PendingProbe> {
        self.onboarding.begin_submit(&self.accounts)
    }

    /// Apply a finished autoconfiguration probe
    pub fn apply_probe_result(&mut self, completion: ProbeCompletion) -> OnboardingOutcome {
        match self.onboarding.apply_probe_result(completion) {
            ProbeApplied::Connected(account) => {
                OnboardingOutcome::Completed(self.merge_new_account(account))
            }
            ProbeApplied::NeedsManualConfig => OnboardingOutcome::ManualConfigRequired,
            ProbeApplied::Stale => OnboardingOutcome::Ignored,
        }
    }

    /// Submit the add-account form and wait for the autoconfiguration answer
    pub async fn add_account(&mut self) -> SettingsResult<OnboardingOutcome> {
        let probe = self.begin_add_account()?;
        let completion = probe
            .run(Arc::clone(self.ctx.autoconfig_service()))
            .await;
        Ok(self.apply_probe_result(completion))
    }

    /// Finish manual configuration with the user-edited settings
    pub fn complete_manual_config(&mut self, settings: AccountSettings) -> SettingsResult<String> {
        let account = self.onboarding.complete_manual(settings)?;
        Ok(self.merge_new_account(account))
    }

    /// Abandon the add-account attempt
    pub fn cancel_add_account(&mut self) -> SettingsResult<()> {
        self.onboarding.cancel()
    }

    /// Renderer props for the manual configuration form
    pub fn manual_config_view(&self) -> Option<AccountView<'_>> {
        self.onboarding.manual_config_view()
    }
}
