// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for listing athlete activities.
//!
//! Handles:
//! - Access token refresh from the configured refresh token
//! - Paginated activity listing
//! - Rate limit and token error detection

use crate::config::StravaCredentials;
use crate::error::AppError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "Strava";
const DEFAULT_API_URL: &str = "https://www.strava.com/api/v3";
const DEFAULT_OAUTH_URL: &str = "https://www.strava.com/oauth";

/// Operations the Strava sync needs from the Strava API.
#[async_trait]
pub trait StravaApi: Send + Sync {
    /// Exchange the long-lived refresh token for an access token.
    async fn refresh_token(&self, credentials: &StravaCredentials) -> Result<String, AppError>;

    /// One page (1-based) of the athlete's activities, newest first.
    async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, AppError>;
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_url: String,
    oauth_url: String,
}

impl Default for StravaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StravaClient {
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_API_URL, DEFAULT_OAUTH_URL)
    }

    /// Client against non-default hosts (used by tests).
    pub fn with_base_urls(api_url: &str, oauth_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            oauth_url: oauth_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl StravaApi for StravaClient {
    async fn refresh_token(&self, credentials: &StravaCredentials) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!("{}/token", self.oauth_url))
            .form(&[
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::provider_auth(PROVIDER, format!("Token refresh request failed: {}", e))
            })?;

        let token: TokenRefreshResponse =
            check_response_json(response).await.map_err(|e| match e {
                AppError::ProviderApi { message, .. } => AppError::provider_auth(PROVIDER, message),
                other => other,
            })?;

        tracing::debug!(expires_at = token.expires_at, "Refreshed Strava access token");
        Ok(token.access_token)
    }

    async fn list_activities(
        &self,
        access_token: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>, AppError> {
        let response = self
            .http
            .get(format!("{}/athlete/activities", self.api_url))
            .bearer_auth(access_token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .await
            .map_err(|e| AppError::provider_api(PROVIDER, e.to_string()))?;

        check_response_json(response).await
    }
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.as_u16() == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::provider_api(PROVIDER, "rate limit exceeded"));
        }

        if status.as_u16() == 401 {
            return Err(AppError::provider_auth(
                PROVIDER,
                "token invalid or expired",
            ));
        }

        return Err(AppError::provider_api(
            PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::provider_api(PROVIDER, format!("JSON parse error: {}", e)))
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_at: i64,
}
