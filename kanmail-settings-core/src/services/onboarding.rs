//! Add-account onboarding flow
//!
//! Phase 1 collects name/username/password and asks the autoconfiguration
//! service to derive full settings. If that fails, phase 2 hands the partial
//! settings to a manual configuration form. The flow never touches the
//! accounts mapping itself: completed accounts are returned as [`NewAccount`]
//! and merged by the owning `SettingsModel`.

use std::fmt;
use std::mem;
use std::sync::Arc;

use crate::error::{ProbeFailure, SettingsError, SettingsResult, ValidationError};
use crate::traits::AutoconfigService;
use crate::types::{
    AccountSettings, AccountView, AccountsMap, AutoconfigRequest, AutoconfigResponse,
    OnboardingPhase,
};

/// Add-account form fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Username,
    Password,
}

/// Phase 1 form contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountForm {
    /// Account identifier to create
    pub name: String,
    /// Email / login
    pub username: String,
    pub password: String,
    /// Last validation message shown above the form
    pub error: Option<String>,
}

impl fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountForm")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"***")
            .field("error", &self.error)
            .finish()
    }
}

impl AccountForm {
    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Username => &mut self.username,
            FormField::Password => &mut self.password,
        }
    }

    fn validate(&self, accounts: &AccountsMap) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.username.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingField);
        }
        if accounts.contains_key(&self.name) {
            return Err(ValidationError::DuplicateAccountName(self.name.clone()));
        }
        Ok(())
    }
}

/// Phase 2 draft, pre-populated from the failed probe
#[derive(Debug, Clone, PartialEq)]
pub struct ManualDraft {
    /// Candidate account identifier from phase 1
    pub name: String,
    /// Partial settings returned by the probe
    pub settings: AccountSettings,
    pub error_message: Option<String>,
    pub error_type: Option<String>,
}

/// Onboarding state, one variant per phase.
///
/// Completing hands back a [`NewAccount`] and the state is already `Idle`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OnboardingState {
    #[default]
    Idle,
    FormEntry(AccountForm),
    Submitting {
        form: AccountForm,
        attempt: u64,
    },
    ManualConfig(ManualDraft),
}

impl OnboardingState {
    pub fn phase(&self) -> OnboardingPhase {
        match self {
            Self::Idle => OnboardingPhase::Idle,
            Self::FormEntry(_) => OnboardingPhase::FormEntry,
            Self::Submitting { .. } => OnboardingPhase::Submitting,
            Self::ManualConfig(_) => OnboardingPhase::ManualConfig,
        }
    }
}

/// Account ready to be merged into the accounts mapping
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub account_id: String,
    pub settings: AccountSettings,
}

/// Autoconfiguration request bound to one submission attempt
#[derive(Debug, Clone)]
pub struct PendingProbe {
    attempt: u64,
    request: AutoconfigRequest,
}

impl PendingProbe {
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    pub fn request(&self) -> &AutoconfigRequest {
        &self.request
    }

    /// Run the probe. The returned future owns everything it needs, so an
    /// event loop may spawn it and feed the completion back later.
    pub async fn run(self, service: Arc<dyn AutoconfigService>) -> ProbeCompletion {
        log::debug!("Autoconfiguring {} (attempt {})", self.request.username, self.attempt);
        let result = service.autoconfigure(&self.request).await;
        ProbeCompletion {
            attempt: self.attempt,
            result,
        }
    }
}

/// Finished probe, tagged with the attempt it belongs to
#[derive(Debug, Clone)]
pub struct ProbeCompletion {
    pub attempt: u64,
    pub result: Result<AutoconfigResponse, ProbeFailure>,
}

/// What applying a probe completion did
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeApplied {
    /// Connected; the account is ready to merge and the flow is `Idle`
    Connected(NewAccount),
    /// Probe failed; the flow is in `ManualConfig`
    NeedsManualConfig,
    /// The completion belongs to an attempt that is no longer current
    Stale,
}

/// Add-account state machine
#[derive(Debug, Default)]
pub struct AccountOnboardingFlow {
    state: OnboardingState,
    last_attempt: u64,
}

impl AccountOnboardingFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &OnboardingState {
        &self.state
    }

    pub fn phase(&self) -> OnboardingPhase {
        self.state.phase()
    }

    /// A probe is in flight
    pub fn is_pending(&self) -> bool {
        matches!(self.state, OnboardingState::Submitting { .. })
    }

    /// Form contents while in `FormEntry` or `Submitting`
    pub fn form(&self) -> Option<&AccountForm> {
        match &self.state {
            OnboardingState::FormEntry(form) | OnboardingState::Submitting { form, .. } => {
                Some(form)
            }
            _ => None,
        }
    }

    /// Draft while in `ManualConfig`
    pub fn manual_draft(&self) -> Option<&ManualDraft> {
        match &self.state {
            OnboardingState::ManualConfig(draft) => Some(draft),
            _ => None,
        }
    }

    /// Renderer props for the manual configuration form
    pub fn manual_config_view(&self) -> Option<AccountView<'_>> {
        self.manual_draft().map(|draft| AccountView {
            account_id: &draft.name,
            account_settings: &draft.settings,
            error: draft.error_message.as_deref(),
            error_kind: draft.error_type.as_deref(),
            always_editing: true,
        })
    }

    /// Open or close the add-account form.
    ///
    /// `Idle` opens an empty form; `FormEntry` closes it and discards the input.
    pub fn toggle(&mut self) -> SettingsResult<()> {
        match self.state {
            OnboardingState::Idle => {
                self.state = OnboardingState::FormEntry(AccountForm::default());
                Ok(())
            }
            OnboardingState::FormEntry(_) => {
                self.reset();
                Ok(())
            }
            _ => Err(self.invalid("toggle the add-account form")),
        }
    }

    /// Edit one field of the phase 1 form
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> SettingsResult<()> {
        match &mut self.state {
            OnboardingState::FormEntry(form) => {
                *form.field_mut(field) = value.into();
                Ok(())
            }
            _ => Err(self.invalid("edit the add-account form")),
        }
    }

    /// Validate the form and move to `Submitting`.
    ///
    /// On validation failure the message is kept on the form, the phase stays
    /// `FormEntry` and no probe is returned.
    pub fn begin_submit(&mut self, accounts: &AccountsMap) -> SettingsResult<PendingProbe> {
        let OnboardingState::FormEntry(form) = &mut self.state else {
            return Err(self.invalid("submit the add-account form"));
        };

        if let Err(e) = form.validate(accounts) {
            log::warn!("Add account rejected: {e}");
            form.error = Some(e.to_string());
            return Err(e.into());
        }

        form.error = None;
        let form = mem::take(form);
        self.last_attempt += 1;
        let attempt = self.last_attempt;
        let request = AutoconfigRequest {
            username: form.username.clone(),
            password: form.password.clone(),
        };
        log::debug!("Onboarding {}: form entry -> submitting", form.name);
        self.state = OnboardingState::Submitting { form, attempt };

        Ok(PendingProbe { attempt, request })
    }

    /// Apply a finished probe.
    ///
    /// Completions for any attempt other than the one currently submitting
    /// are ignored.
    pub fn apply_probe_result(&mut self, completion: ProbeCompletion) -> ProbeApplied {
        let current = matches!(
            self.state,
            OnboardingState::Submitting { attempt, .. } if attempt == completion.attempt
        );
        if !current {
            log::debug!(
                "Ignoring stale autoconfiguration result (attempt {}, phase {})",
                completion.attempt,
                self.phase()
            );
            return ProbeApplied::Stale;
        }

        let OnboardingState::Submitting { form, .. } = mem::take(&mut self.state) else {
            return ProbeApplied::Stale;
        };

        let response = completion.result.unwrap_or_else(|failure| {
            log::warn!("Autoconfiguration for {} failed: {failure}", form.name);
            failure.into_response()
        });

        if response.connected {
            log::debug!("Onboarding {}: submitting -> completed", form.name);
            return ProbeApplied::Connected(NewAccount {
                account_id: form.name,
                settings: response.settings,
            });
        }

        log::debug!(
            "Onboarding {}: submitting -> manual config ({})",
            form.name,
            response.error_type.as_deref().unwrap_or("unknown")
        );
        self.state = OnboardingState::ManualConfig(ManualDraft {
            name: form.name,
            settings: response.settings,
            error_message: response.error_message,
            error_type: response.error_type,
        });
        ProbeApplied::NeedsManualConfig
    }

    /// Finish phase 2 with the user-edited settings; no further probe
    pub fn complete_manual(&mut self, settings: AccountSettings) -> SettingsResult<NewAccount> {
        if !matches!(self.state, OnboardingState::ManualConfig(_)) {
            return Err(self.invalid("complete manual configuration"));
        }
        let OnboardingState::ManualConfig(draft) = mem::take(&mut self.state) else {
            return Err(self.invalid("complete manual configuration"));
        };
        log::debug!("Onboarding {}: manual config -> completed", draft.name);
        Ok(NewAccount {
            account_id: draft.name,
            settings,
        })
    }

    /// Abandon the add-account attempt from `FormEntry` or `ManualConfig`.
    ///
    /// An in-flight probe cannot be cancelled; it resolves into a merged
    /// account or `ManualConfig` first.
    pub fn cancel(&mut self) -> SettingsResult<()> {
        match self.state {
            OnboardingState::FormEntry(_) | OnboardingState::ManualConfig(_) => {
                self.reset();
                Ok(())
            }
            OnboardingState::Idle => Ok(()),
            OnboardingState::Submitting { .. } => Err(self.invalid("cancel")),
        }
    }

    /// Back to the empty baseline, discarding any draft
    pub fn reset(&mut self) {
        self.state = OnboardingState::Idle;
    }

    fn invalid(&self, operation: &'static str) -> SettingsError {
        SettingsError::InvalidPhase {
            operation,
            phase: self.phase(),
        }
    }
}
