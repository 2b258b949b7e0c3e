use reqwest::{Client, Request, Response};
use std::time::Duration;

use crate::error::FeedError;

/// HTTP client for the Reddit API
///
/// Requests are sent once; there is no retry or backoff.
#[derive(Clone, Debug)]
pub struct ApiClient {
    /// Shared HTTP client with connection pooling
    client: Client,

    /// User-Agent sent with every request
    user_agent: String,
}

impl ApiClient {
    /// Create a new HTTP client
    ///
    /// Reddit rejects requests without a descriptive User-Agent, so an empty one is a
    /// configuration error.
    pub fn new(
        user_agent: &str,
        connect_timeout: u64,
        request_timeout: u64,
    ) -> Result<Self, FeedError> {
        let user_agent = user_agent.trim();
        if user_agent.is_empty() {
            return Err(FeedError::ConfigLoad(
                "USER_AGENT must not be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .timeout(Duration::from_secs(request_timeout))
            .build()
            .map_err(|e| FeedError::ConfigLoad(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// Execute a request once
    ///
    /// Non-success statuses become `FeedError::Network` carrying the status and body.
    pub async fn execute(&self, request: Request) -> Result<Response, FeedError> {
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(
            method = %method,
            url = %url,
            "Sending HTTP request"
        );

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                tracing::debug!(status = %status, "Received HTTP response");

                if status.is_success() {
                    return Ok(response);
                }

                let error_text = response.text().await.unwrap_or_default();
                tracing::error!(
                    status = status.as_u16(),
                    url = %url,
                    response_body = %error_text,
                    "HTTP request failed with error response"
                );
                Err(FeedError::Network(format!("{} - {}", status, error_text)))
            }

            Err(e) => {
                // Categorize the error for better debugging
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connection_failed"
                } else if e.is_request() {
                    "request_error"
                } else if e.is_body() {
                    "body_error"
                } else if e.is_decode() {
                    "decode_error"
                } else {
                    "unknown"
                };

                tracing::error!(
                    error_kind = error_kind,
                    error = %e,
                    url = %url,
                    "HTTP request error"
                );

                Err(FeedError::Network(format!(
                    "HTTP request failed: {} (kind: {})",
                    e, error_kind
                )))
            }
        }
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
