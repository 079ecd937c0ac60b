// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Provider credentials are optional: a provider without credentials keeps
//! its sync endpoint but answers with a `not_configured` error.

use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// sqlx database URL
    pub database_url: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Garmin Connect login, if configured
    pub garmin: Option<GarminCredentials>,
    /// Strava OAuth app and refresh token, if configured
    pub strava: Option<StravaCredentials>,
    pub sync: SyncSettings,
}

#[derive(Clone)]
pub struct GarminCredentials {
    pub email: String,
    pub password: String,
}

// Keep the password out of logs.
impl std::fmt::Debug for GarminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GarminCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct StravaCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for StravaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StravaCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

/// Tunables for the provider syncs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Number of activities in the single Garmin bulk fetch
    pub garmin_activity_limit: u32,
    /// Days of Garmin sleep/stress history fetched per sync
    pub garmin_health_days: u32,
    /// Strava page size
    pub strava_page_size: u32,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            garmin_activity_limit: 100,
            garmin_health_days: 14,
            strava_page_size: 200,
        }
    }
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            garmin: Some(GarminCredentials {
                email: "runner@example.com".to_string(),
                password: "test_password".to_string(),
            }),
            strava: Some(StravaCredentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                refresh_token: "test_refresh_token".to_string(),
            }),
            sync: SyncSettings::default(),
        }
    }

    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = SyncSettings::default();

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://fitness.db".to_string()),
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            garmin: garmin_from_env(),
            strava: strava_from_env(),
            sync: SyncSettings {
                garmin_activity_limit: parse_var(
                    "GARMIN_ACTIVITY_LIMIT",
                    defaults.garmin_activity_limit,
                )?,
                garmin_health_days: parse_var("GARMIN_HEALTH_DAYS", defaults.garmin_health_days)?,
                strava_page_size: parse_var("STRAVA_PAGE_SIZE", defaults.strava_page_size)?,
            },
        })
    }
}

/// Read a trimmed, non-empty environment variable.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(name) {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}

fn garmin_from_env() -> Option<GarminCredentials> {
    match (non_empty_var("GARMIN_EMAIL"), non_empty_var("GARMIN_PASSWORD")) {
        (Some(email), Some(password)) => Some(GarminCredentials { email, password }),
        (None, None) => None,
        _ => {
            tracing::warn!("Only one of GARMIN_EMAIL/GARMIN_PASSWORD is set; Garmin sync disabled");
            None
        }
    }
}

fn strava_from_env() -> Option<StravaCredentials> {
    let client_id = non_empty_var("STRAVA_CLIENT_ID");
    let client_secret = non_empty_var("STRAVA_CLIENT_SECRET");
    let refresh_token = non_empty_var("STRAVA_REFRESH_TOKEN");

    match (client_id, client_secret, refresh_token) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Some(StravaCredentials {
            client_id,
            client_secret,
            refresh_token,
        }),
        (None, None, None) => None,
        _ => {
            tracing::warn!("Strava credentials are incomplete; Strava sync disabled");
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    // All env-mutating assertions live in one test so parallel tests can't
    // observe each other's variables.
    #[test]
    fn test_config_from_env() {
        env::set_var("GARMIN_EMAIL", "runner@example.com");
        env::set_var("GARMIN_PASSWORD", "hunter2");
        env::set_var("STRAVA_CLIENT_ID", "12345");
        env::remove_var("STRAVA_CLIENT_SECRET");
        env::set_var("STRAVA_REFRESH_TOKEN", "refresh");
        env::set_var("GARMIN_HEALTH_DAYS", "7");

        let config = Config::from_env().expect("Config should load");

        let garmin = config.garmin.expect("garmin credentials");
        assert_eq!(garmin.email, "runner@example.com");
        assert!(config.strava.is_none(), "incomplete strava config is disabled");
        assert_eq!(config.sync.garmin_health_days, 7);
        assert_eq!(config.sync.strava_page_size, 200);
        assert!(!format!("{:?}", garmin).contains("hunter2"));

        env::set_var("GARMIN_HEALTH_DAYS", "two weeks");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "GARMIN_HEALTH_DAYS",
                ..
            }
        ));

        env::remove_var("GARMIN_HEALTH_DAYS");
    }
}
