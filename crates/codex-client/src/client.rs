//! Codex HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use crate::error::ClientError;
use crate::types::{
    AwardCardRequest, ClaimedLeaguesResponse, ErrorEnvelope, MutationResponse, OverviewResponse,
    SyncResponse,
};

/// Codex API client.
///
/// All methods act on behalf of a player session: they take the player's
/// JWT and forward it as the bearer token.
#[derive(Debug, Clone)]
pub struct CodexClient {
    client: Client,
    base_url: String,
}

impl CodexClient {
    /// Create a new codex client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the codex service
    ///   (e.g. `"http://codex-service:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new codex client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Upsert the session's user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn sync_user(
        &self,
        user_jwt: &str,
        handle: Option<&str>,
    ) -> Result<SyncResponse, ClientError> {
        let url = format!("{}/api/users/sync", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&serde_json::json!({ "handle": handle }))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Report a battle victory for the session's user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn report_battle_victory(
        &self,
        user_jwt: &str,
    ) -> Result<MutationResponse, ClientError> {
        let url = format!("{}/api/progression/battle-victory", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Award a card to the session's user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn award_card(
        &self,
        user_jwt: &str,
        request: AwardCardRequest,
    ) -> Result<MutationResponse, ClientError> {
        let url = format!("{}/api/codex-trials/award-card", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Read the session user's aggregate progression.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn overview(&self, user_jwt: &str) -> Result<OverviewResponse, ClientError> {
        let url = format!("{}/api/progression/overview", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// List the leagues whose packs the session's user has claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn claimed_leagues(
        &self,
        user_jwt: &str,
    ) -> Result<ClaimedLeaguesResponse, ClientError> {
        let url = format!("{}/api/codex-trials/claimed-leagues", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse the error envelope
        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error,
            Err(_) => format!("HTTP {status}"),
        };

        match status.as_u16() {
            401 => Err(ClientError::Unauthorized(message)),
            402 => Err(ClientError::InsufficientFunds(message)),
            404 => Err(ClientError::NotFound(message)),
            409 => Err(ClientError::Conflict(message)),
            code => Err(ClientError::Api {
                message,
                status: code,
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
        }
    }
}
