// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect client.
//!
//! Handles:
//! - SSO login with email and password (CSRF form, ticket, token exchange)
//! - Bulk activity listing
//! - Per-day sleep and stress fetches

use crate::config::GarminCredentials;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const PROVIDER: &str = "Garmin";
const DEFAULT_SSO_URL: &str = "https://sso.garmin.com/sso";
const DEFAULT_API_URL: &str = "https://connectapi.garmin.com";
const USER_AGENT: &str = "com.garmin.android.apps.connectmobile";

/// An authenticated Garmin Connect session.
#[derive(Debug, Clone)]
pub struct GarminSession {
    pub access_token: String,
    /// Profile name used in per-user wellness URLs
    pub display_name: String,
}

/// Operations the Garmin sync needs from Garmin Connect.
#[async_trait]
pub trait GarminApi: Send + Sync {
    async fn login(&self, credentials: &GarminCredentials) -> Result<GarminSession, AppError>;

    /// Most recent activities, newest first.
    async fn activities(
        &self,
        session: &GarminSession,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Value>, AppError>;

    /// Sleep payload for one night, `None` if Garmin has nothing for it.
    async fn sleep(
        &self,
        session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError>;

    /// Stress payload for one day, `None` if Garmin has nothing for it.
    async fn stress(
        &self,
        session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError>;
}

/// HTTP implementation of [`GarminApi`].
#[derive(Clone)]
pub struct GarminClient {
    http: reqwest::Client,
    sso_url: String,
    api_url: String,
}

impl GarminClient {
    pub fn new() -> Result<Self, AppError> {
        Self::with_base_urls(DEFAULT_SSO_URL, DEFAULT_API_URL)
    }

    /// Client against non-default hosts (used by tests).
    pub fn with_base_urls(sso_url: &str, api_url: &str) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::provider_api(PROVIDER, e.to_string()))?;

        Ok(Self {
            http,
            sso_url: sso_url.trim_end_matches('/').to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn signin_params(&self) -> [(&'static str, String); 4] {
        let embed = format!("{}/embed", self.sso_url);
        [
            ("id", "gauth-widget".to_string()),
            ("embedWidget", "true".to_string()),
            ("gauthHost", embed.clone()),
            ("service", embed),
        ]
    }

    /// Fetch the sign-in form and pull out its CSRF token.
    async fn fetch_csrf_token(&self) -> Result<String, AppError> {
        let response = self
            .http
            .get(format!("{}/signin", self.sso_url))
            .query(&self.signin_params())
            .send()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?;

        let html = response
            .text()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?;

        extract_csrf_token(&html)
            .ok_or_else(|| AppError::provider_auth(PROVIDER, "sign-in page has no CSRF token"))
    }

    /// Submit the credentials; on success the page carries a service ticket.
    async fn submit_credentials(
        &self,
        credentials: &GarminCredentials,
        csrf_token: &str,
    ) -> Result<String, AppError> {
        let form = [
            ("username", credentials.email.as_str()),
            ("password", credentials.password.as_str()),
            ("embed", "true"),
            ("_csrf", csrf_token),
        ];

        let response = self
            .http
            .post(format!("{}/signin", self.sso_url))
            .query(&self.signin_params())
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?;

        let html = response
            .text()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?;

        match extract_title(&html) {
            Some(title) if title.contains("Success") => extract_ticket(&html)
                .ok_or_else(|| AppError::provider_auth(PROVIDER, "login page has no ticket")),
            Some(title) if title.contains("MFA") => Err(AppError::provider_auth(
                PROVIDER,
                "multi-factor authentication is not supported",
            )),
            Some(title) => Err(AppError::provider_auth(
                PROVIDER,
                format!("unexpected login response: {}", title),
            )),
            None => Err(AppError::provider_auth(PROVIDER, "invalid credentials")),
        }
    }

    async fn exchange_ticket(&self, ticket: &str) -> Result<String, AppError> {
        let response = self
            .http
            .post(format!(
                "{}/oauth-service/oauth/exchange/user/2.0",
                self.api_url
            ))
            .form(&[("ticket", ticket)])
            .send()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::provider_auth(
                PROVIDER,
                format!("ticket exchange failed: HTTP {}", response.status()),
            ));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, format!("bad token response: {}", e)))?;
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(|e| AppError::provider_api(PROVIDER, e.to_string()))?;

        check_response_json(response).await
    }
}

#[async_trait]
impl GarminApi for GarminClient {
    async fn login(&self, credentials: &GarminCredentials) -> Result<GarminSession, AppError> {
        let csrf_token = self.fetch_csrf_token().await?;
        let ticket = self.submit_credentials(credentials, &csrf_token).await?;
        let access_token = self.exchange_ticket(&ticket).await?;

        let profile: SocialProfile = self
            .get_json(
                &access_token,
                &format!("{}/userprofile-service/socialProfile", self.api_url),
                &[],
            )
            .await
            .map_err(|e| AppError::provider_auth(PROVIDER, e.to_string()))?
            .ok_or_else(|| AppError::provider_auth(PROVIDER, "no user profile"))?;

        tracing::info!(display_name = %profile.display_name, "Logged in to Garmin Connect");

        Ok(GarminSession {
            access_token,
            display_name: profile.display_name,
        })
    }

    async fn activities(
        &self,
        session: &GarminSession,
        start: u32,
        limit: u32,
    ) -> Result<Vec<Value>, AppError> {
        let url = format!(
            "{}/activitylist-service/activities/search/activities",
            self.api_url
        );
        let activities: Option<Vec<Value>> = self
            .get_json(
                &session.access_token,
                &url,
                &[("start", start.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(activities.unwrap_or_default())
    }

    async fn sleep(
        &self,
        session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError> {
        let url = format!(
            "{}/wellness-service/wellness/dailySleepData/{}",
            self.api_url, session.display_name
        );
        self.get_json(
            &session.access_token,
            &url,
            &[("date", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }

    async fn stress(
        &self,
        session: &GarminSession,
        date: NaiveDate,
    ) -> Result<Option<Value>, AppError> {
        let url = format!(
            "{}/wellness-service/wellness/dailyStress/{}",
            self.api_url,
            date.format("%Y-%m-%d")
        );
        self.get_json(&session.access_token, &url, &[]).await
    }
}

/// Check response status and parse the JSON body. 404, 204 and a `null`
/// body all mean "no data".
async fn check_response_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Option<T>, AppError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Garmin rate limit hit (429)");
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::provider_auth(PROVIDER, "session rejected (401)"));
        }

        return Err(AppError::provider_api(
            PROVIDER,
            format!("HTTP {}: {}", status, body),
        ));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| AppError::provider_api(PROVIDER, format!("JSON parse error: {}", e)))?;

    if body.is_null() {
        return Ok(None);
    }

    serde_json::from_value(body)
        .map(Some)
        .map_err(|e| AppError::provider_api(PROVIDER, format!("unexpected response: {}", e)))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialProfile {
    display_name: String,
}

fn capture(pattern: &str, html: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(html)?
        .get(1)
        .map(|m| m.as_str().to_string())
}

fn extract_csrf_token(html: &str) -> Option<String> {
    capture(r#"name="_csrf"\s+value="([^"]+)""#, html)
}

fn extract_title(html: &str) -> Option<String> {
    capture(r"<title>([^<]+)</title>", html)
}

fn extract_ticket(html: &str) -> Option<String> {
    capture(r#"embed\?ticket=([^"]+)""#, html)
}
