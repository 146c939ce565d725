//! Autoconfiguration abstract Trait

use async_trait::async_trait;

use crate::error::ProbeFailure;
use crate::types::{AutoconfigRequest, AutoconfigResponse};

/// Autoconfiguration probe Trait
///
/// Derives full account settings from just a username and password.
///
/// Platform implementation:
/// - HTTP: `HttpSettingsClient` (`POST /api/settings/account/new`)
#[async_trait]
pub trait AutoconfigService: Send + Sync {
    /// Attempt to autoconfigure and connect an account
    ///
    /// # Returns
    /// * `Ok(response)` - the endpoint answered; `response.connected` tells whether it worked
    /// * `Err(failure)` - transport failure or negative answer on the error channel,
    ///   carrying the response body when one could be recovered
    async fn autoconfigure(
        &self,
        request: &AutoconfigRequest,
    ) -> Result<AutoconfigResponse, ProbeFailure>;
}
