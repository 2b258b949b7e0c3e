use chrono::Utc;

use super::refresh;
use super::store::CredentialStore;
use super::types::{ClientCredentials, Credential};
use crate::error::FeedError;
use crate::http_client::ApiClient;

/// Credential manager
/// Serves the cached bearer token while it is valid, exchanges client credentials otherwise
pub struct CredentialManager {
    /// Persisted credential record
    store: Box<dyn CredentialStore>,

    /// HTTP client for token requests
    api: ApiClient,

    /// Client id, secret and token endpoint
    client_credentials: ClientCredentials,
}

impl CredentialManager {
    pub fn new(
        store: Box<dyn CredentialStore>,
        api: ApiClient,
        client_credentials: ClientCredentials,
    ) -> Self {
        Self {
            store,
            api,
            client_credentials,
        }
    }

    /// Return the cached credential if still valid
    fn cached_credential(&self) -> Option<Credential> {
        let credential = self.store.load()?;
        if credential.is_valid_at(Utc::now()) {
            Some(credential)
        } else {
            tracing::info!(
                "Cached token expired at {}, refreshing",
                credential.expiry.to_rfc3339()
            );
            None
        }
    }

    /// Get a valid credential, authenticating only when the cache is missing or expired
    pub async fn acquire_credential(&self) -> Result<Credential, FeedError> {
        if let Some(credential) = self.cached_credential() {
            tracing::debug!(
                "Using cached token {}..., expires: {}",
                credential.token_preview(),
                credential.expiry.to_rfc3339()
            );
            return Ok(credential);
        }

        let credential = refresh::exchange_client_credentials(&self.api, &self.client_credentials)
            .await
            .map_err(|e| {
                tracing::error!("Token request failed: {:#}", e);
                FeedError::Auth(format!("{:#}", e))
            })?;

        // The token is usable for this run even if caching it fails
        if let Err(e) = self.store.save(&credential) {
            tracing::warn!("Failed to persist token cache: {:#}", e);
        }

        Ok(credential)
    }
}
