//! Fields shown on the settings screen

use serde_json::{Number, Value};

use super::SettingsContainer;

/// How a field's raw input is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
}

/// Settings item enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    HeaderBackground,
    UndoMs,
    SyncDays,
    BatchSize,
    InitialBatches,
}

impl SettingField {
    /// All fields, in screen order
    pub fn all() -> &'static [SettingField] {
        &[
            SettingField::HeaderBackground,
            SettingField::UndoMs,
            SettingField::SyncDays,
            SettingField::BatchSize,
            SettingField::InitialBatches,
        ]
    }

    /// Look up a field by its storage key
    pub fn from_key(key: &str) -> Option<SettingField> {
        Self::all().iter().copied().find(|f| f.key() == key)
    }

    pub fn container(self) -> SettingsContainer {
        match self {
            Self::HeaderBackground => SettingsContainer::Style,
            Self::UndoMs | Self::SyncDays | Self::BatchSize | Self::InitialBatches => {
                SettingsContainer::System
            }
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::HeaderBackground => "header_background",
            Self::UndoMs => "undo_ms",
            Self::SyncDays => "sync_days",
            Self::BatchSize => "batch_size",
            Self::InitialBatches => "initial_batches",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::HeaderBackground => "Header background",
            Self::UndoMs => "Undo time (ms)",
            Self::SyncDays => "Sync days",
            Self::BatchSize => "Batch size",
            Self::InitialBatches => "Initial batches",
        }
    }

    pub fn help(self) -> &'static str {
        match self {
            Self::HeaderBackground => "header background colour",
            Self::UndoMs => "length of time to undo actions",
            Self::SyncDays => "number of days emails to sync",
            Self::BatchSize => "number of emails to fetch at once",
            Self::InitialBatches => "initial number of batches to fetch",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::HeaderBackground => FieldKind::Text,
            _ => FieldKind::Number,
        }
    }

    /// Convert raw input into the stored value.
    ///
    /// Number fields store a JSON number when the input parses and fall back
    /// to the raw string otherwise; there is no schema enforcement.
    pub fn parse_input(self, input: &str) -> Value {
        match self.kind() {
            FieldKind::Text => Value::String(input.to_string()),
            FieldKind::Number => parse_number(input.trim())
                .map_or_else(|| Value::String(input.to_string()), Value::Number),
        }
    }
}

fn parse_number(input: &str) -> Option<Number> {
    if let Ok(n) = input.parse::<i64>() {
        return Some(Number::from(n));
    }
    input.parse::<f64>().ok().and_then(Number::from_f64)
}
