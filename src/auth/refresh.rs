// Client-credentials token exchange

use anyhow::{Context, Result};
use chrono::Utc;

use super::types::{AccessTokenResponse, ClientCredentials, Credential};
use crate::http_client::ApiClient;

/// Exchange client id and secret for an app-only bearer token
pub async fn exchange_client_credentials(
    api: &ApiClient,
    creds: &ClientCredentials,
) -> Result<Credential> {
    tracing::info!("Requesting access token via client credentials grant...");

    tracing::debug!(
        "Token request: url={}, client_id={}...",
        creds.auth_url,
        creds.client_id.chars().take(6).collect::<String>()
    );

    let request = api
        .client()
        .post(&creds.auth_url)
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .header("Content-Type", "application/x-www-form-urlencoded")
        .form(&[("grant_type", "client_credentials")])
        .build()
        .context("Failed to build token request")?;

    let response = api
        .execute(request)
        .await
        .context("Token request failed")?;

    let body = response
        .text()
        .await
        .context("Failed to read token response body")?;

    // Reddit answers bad credentials with 200 and {"error": ...}
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&body) {
        if let Some(error_code) = error_json.get("error") {
            let message = error_json
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            anyhow::bail!("Token endpoint returned error: {} {}", error_code, message);
        }
    }

    let data: AccessTokenResponse =
        serde_json::from_str(&body).context("Failed to parse token response")?;

    if data.access_token.trim().is_empty() {
        anyhow::bail!("Token response does not contain access_token");
    }

    let credential = match Credential::from_expires_in(data.access_token, data.expires_in, Utc::now())
    {
        Some(credential) => credential,
        None => anyhow::bail!(
            "Token response has out-of-range expires_in: {}",
            data.expires_in
        ),
    };

    tracing::info!(
        token_type = data.token_type.as_deref().unwrap_or("unknown"),
        scope = data.scope.as_deref().unwrap_or(""),
        "Access token obtained, expires: {}",
        credential.expiry.to_rfc3339()
    );

    Ok(credential)
}
