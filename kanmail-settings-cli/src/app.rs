//! Command handlers
//!
//! Each handler drives the settings model the way the settings screen would
//! and saves once the mutation has been applied.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use kanmail_settings_core::services::FormField;
use kanmail_settings_core::types::{AccountSettings, SettingField, SettingsContainer};
use kanmail_settings_core::{OnboardingOutcome, SettingsModel};
use serde_json::Value;

use crate::cli::Commands;

/// Run one command against a loaded model, writing user-facing output to `out`
pub async fn execute(
    command: Commands,
    model: &mut SettingsModel,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Show => show(model, out),
        Commands::Fields => fields(model, out),
        Commands::Set {
            container,
            key,
            value,
        } => {
            set_field(model, container, &key, &value);
            save(model).await?;
            writeln!(out, "Set {container}.{key}")?;
            Ok(())
        }
        Commands::DeleteAccount { id } => {
            if !model.delete_account(&id) {
                writeln!(out, "No account called {id}")?;
                return Ok(());
            }
            save(model).await?;
            writeln!(out, "Deleted account {id}")?;
            Ok(())
        }
        Commands::UpdateAccount { id, settings } => {
            let settings = read_account_settings(&settings)?;
            model.update_account(&id, settings)?;
            save(model).await?;
            writeln!(out, "Updated account {id}")?;
            Ok(())
        }
        Commands::AddAccount {
            name,
            username,
            password,
            manual,
        } => add_account(model, name, username, password, manual.as_deref(), out).await,
    }
}

fn show(model: &SettingsModel, out: &mut impl Write) -> Result<()> {
    let snapshot = serde_json::to_string_pretty(&model.snapshot())?;
    writeln!(out, "{snapshot}")?;
    Ok(())
}

fn fields(model: &SettingsModel, out: &mut impl Write) -> Result<()> {
    for field in SettingField::all() {
        let current = model
            .field(field.container(), field.key())
            .map_or_else(|| "-".to_string(), Value::to_string);
        writeln!(
            out,
            "{}.{} = {current}\n    {}: {}",
            field.container(),
            field.key(),
            field.label(),
            field.help()
        )?;
    }
    Ok(())
}

/// Known fields parse their input by kind; other keys take JSON or a plain string
fn set_field(model: &mut SettingsModel, container: SettingsContainer, key: &str, raw: &str) {
    match SettingField::from_key(key) {
        Some(field) if field.container() == container => model.update_known_field(field, raw),
        _ => {
            let value =
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
            model.update_field(container, key, value);
        }
    }
}

async fn add_account(
    model: &mut SettingsModel,
    name: String,
    username: String,
    password: String,
    manual: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    model.toggle_add_account()?;
    model.set_new_account_field(FormField::Name, name)?;
    model.set_new_account_field(FormField::Username, username)?;
    model.set_new_account_field(FormField::Password, password)?;

    match model.add_account().await? {
        OnboardingOutcome::Completed(account_id) => {
            save(model).await?;
            writeln!(out, "Added account {account_id}")?;
            Ok(())
        }
        OnboardingOutcome::ManualConfigRequired => {
            let Some(path) = manual else {
                let (message, draft) = {
                    let view = model
                        .manual_config_view()
                        .ok_or_else(|| anyhow!("Manual configuration draft missing"))?;
                    let message = format!(
                        "Autoconfiguration failed ({}): {}",
                        view.error_kind.unwrap_or("unknown"),
                        view.error.unwrap_or("no details")
                    );
                    (message, serde_json::to_string_pretty(&view)?)
                };
                writeln!(out, "{draft}")?;
                model.cancel_add_account()?;
                bail!("{message}; complete the settings above and rerun with --manual <PATH>");
            };
            let settings = read_account_settings(path)?;
            let account_id = model.complete_manual_config(settings)?;
            save(model).await?;
            writeln!(out, "Added account {account_id} (manual configuration)")?;
            Ok(())
        }
        OnboardingOutcome::Ignored => bail!("Autoconfiguration result was discarded"),
    }
}

fn read_account_settings(path: &Path) -> Result<AccountSettings> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON object of account settings", path.display()))
}

async fn save(model: &SettingsModel) -> Result<()> {
    model.save().await.context("Failed to save settings")
}

#[cfg(test)]
#[path = "test_mocks.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
pub(crate) mod test_mocks;

#[cfg(test)]
#[path = "app_tests.rs"]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests;
