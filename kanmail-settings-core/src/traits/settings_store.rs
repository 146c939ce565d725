//! Settings persistence abstract Trait

use async_trait::async_trait;

use crate::error::SettingsResult;
use crate::types::{InitialSettings, SettingsSnapshot};

/// Settings backend Trait
///
/// Platform implementation:
/// - HTTP: `HttpSettingsClient` (`GET`/`POST /api/settings`)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the settings the screen is initialized from
    async fn load(&self) -> SettingsResult<InitialSettings>;

    /// Persist the full snapshot
    ///
    /// Resolves exactly once; no cancellation and no timeout.
    /// Failures are reported as `SettingsError::Persistence`.
    async fn save(&self, snapshot: &SettingsSnapshot) -> SettingsResult<()>;
}
