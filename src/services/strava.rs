// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client.
//!
//! Handles:
//! - OAuth token exchange and refresh
//! - Paginated activity listing
//! - Rate limit / unauthorized detection

use crate::config::Config;
use crate::error::StravaApiError;
use serde::Deserialize;
use std::time::Duration;

/// OAuth scopes required to read every activity, including private ones.
pub const STRAVA_SCOPES: [&str; 3] = ["read_all", "activity:read_all", "profile:read_all"];

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    api_base_url: String,
    oauth_base_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(
        client_id: String,
        client_secret: String,
        api_base_url: String,
        oauth_base_url: String,
        timeout: Duration,
    ) -> Result<Self, StravaApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StravaApiError::Transport(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            api_base_url,
            oauth_base_url,
            client_id,
            client_secret,
        })
    }

    /// Build a client from configuration with already-checked credentials.
    pub fn from_config(
        config: &Config,
        client_id: &str,
        client_secret: &str,
    ) -> Result<Self, StravaApiError> {
        Self::new(
            client_id.to_string(),
            client_secret.to_string(),
            config.api_base_url.clone(),
            config.oauth_base_url.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Authorization URL the operator opens in a browser.
    pub fn authorization_url(&self, redirect_uri: &str) -> String {
        format!(
            "{}/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}&approval_prompt=force",
            self.oauth_base_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            STRAVA_SCOPES.join(","),
        )
    }

    fn token_url(&self) -> String {
        format!("{}/token", self.oauth_base_url)
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenResponse, StravaApiError> {
        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| StravaApiError::Transport(format!("Token exchange failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// Refresh an expired access token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, StravaApiError> {
        let response = self
            .http
            .post(self.token_url())
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| StravaApiError::Transport(format!("Token refresh request failed: {}", e)))?;

        self.check_response_json(response).await
    }

    /// List one page of the athlete's activities started after `after`.
    pub async fn list_activities(
        &self,
        access_token: &str,
        after: i64, // Unix timestamp
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivitySummary>, StravaApiError> {
        let url = format!("{}/athlete/activities", self.api_base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("after", after.to_string()),
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| StravaApiError::Transport(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, StravaApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(StravaApiError::RateLimited);
            }

            if status.as_u16() == 401 {
                return Err(StravaApiError::Unauthorized);
            }

            return Err(StravaApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StravaApiError::Decode(e.to_string()))
    }
}

/// Token exchange/refresh response from Strava.
///
/// The exchange response also carries an `athlete` object, which is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
}

/// Summary activity from the list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaActivitySummary {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub start_date_local: Option<String>,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub moving_time: f64,
    #[serde(default)]
    pub total_elevation_gain: f64,
    #[serde(default)]
    pub commute: bool,
    #[serde(default)]
    pub trainer: bool,
    #[serde(default)]
    pub map: Option<StravaMap>,
}

impl StravaActivitySummary {
    /// The summary polyline, if a non-empty route map is attached.
    pub fn summary_polyline(&self) -> Option<&str> {
        self.map
            .as_ref()
            .and_then(|m| m.summary_polyline.as_deref())
            .filter(|p| !p.is_empty())
    }
}

/// Activity map data.
#[derive(Debug, Clone, Deserialize)]
pub struct StravaMap {
    #[serde(default)]
    pub summary_polyline: Option<String>,
}
