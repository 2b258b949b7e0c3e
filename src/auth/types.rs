// Authentication types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials are treated as expired this many seconds before their recorded expiry
pub const SAFETY_MARGIN_SECS: i64 = 30;

/// Cached bearer credential
///
/// Persisted as `{"access_token": "...", "expiry": <unix seconds>}`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "access_token")]
    pub token: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiry: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expiry: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expiry,
        }
    }

    /// Build a credential from a token response received at `now`
    ///
    /// `None` when `expires_in` does not fit in a timestamp.
    pub fn from_expires_in(
        token: impl Into<String>,
        expires_in: i64,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let lifetime = expires_in
            .checked_sub(SAFETY_MARGIN_SECS)
            .and_then(Duration::try_seconds)?;
        let expiry = now.checked_add_signed(lifetime)?;
        Some(Self::new(token, expiry))
    }

    /// Valid iff `now < expiry - SAFETY_MARGIN_SECS`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.trim().is_empty()
            && self
                .expiry
                .checked_sub_signed(Duration::seconds(SAFETY_MARGIN_SECS))
                .map_or(false, |deadline| now < deadline)
    }

    /// Short token prefix for log lines
    pub fn token_preview(&self) -> &str {
        let end = self
            .token
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.token.len());
        &self.token[..end]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Client id, secret and endpoint for the client-credentials grant
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("auth_url", &self.auth_url)
            .finish()
    }
}

/// Access token endpoint response
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_credential_validity_margin() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        let cred = Credential::new("token", now + Duration::seconds(31));
        assert!(cred.is_valid_at(now));

        // Inside the safety margin
        let cred = Credential::new("token", now + Duration::seconds(30));
        assert!(!cred.is_valid_at(now));

        let cred = Credential::new("token", now);
        assert!(!cred.is_valid_at(now));

        let cred = Credential::new("token", now - Duration::seconds(60));
        assert!(!cred.is_valid_at(now));
    }

    #[test]
    fn test_empty_token_is_never_valid() {
        let now = Utc::now();
        let cred = Credential::new("  ", now + Duration::hours(1));
        assert!(!cred.is_valid_at(now));
    }

    #[test]
    fn test_from_expires_in() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let cred = Credential::from_expires_in("abc", 86400, now).unwrap();
        assert_eq!(cred.expiry.timestamp(), 1_700_000_000 + 86400 - 30);
    }

    #[test]
    fn test_from_expires_in_out_of_range() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        assert!(Credential::from_expires_in("abc", i64::MAX, now).is_none());
        assert!(Credential::from_expires_in("abc", i64::MIN, now).is_none());
    }

    #[test]
    fn test_expiry_at_minimum_timestamp_is_invalid() {
        let cred = Credential::new("x", DateTime::<Utc>::MIN_UTC);
        assert!(!cred.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_cache_record_format() {
        let cred = Credential::new("secret-token", Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        let json = serde_json::to_value(&cred).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"access_token": "secret-token", "expiry": 1_700_000_000})
        );

        let back: Credential = serde_json::from_value(json).unwrap();
        assert_eq!(back, cred);
    }

    #[test]
    fn test_debug_redacts_token() {
        let cred = Credential::new("super-secret", Utc::now());
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_token_preview() {
        let cred = Credential::new("abcdefghijklmnop", Utc::now());
        assert_eq!(cred.token_preview(), "abcdefgh");

        let cred = Credential::new("abc", Utc::now());
        assert_eq!(cred.token_preview(), "abc");
    }

    #[test]
    fn test_token_response_parsing() {
        let body = r#"{"access_token":"tok","token_type":"bearer","expires_in":86400,"scope":"*"}"#;
        let resp: AccessTokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.access_token, "tok");
        assert_eq!(resp.expires_in, 86400);
        assert_eq!(resp.token_type.as_deref(), Some("bearer"));

        // expires_in is required
        assert!(serde_json::from_str::<AccessTokenResponse>(r#"{"access_token":"tok"}"#).is_err());
    }
}
