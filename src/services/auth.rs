// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth credential lifecycle: cached token, refresh, interactive authorization.

use crate::config::Config;
use crate::error::AuthError;
use crate::models::Credential;
use crate::services::strava::{StravaClient, TokenResponse};
use crate::store::TokenStore;
use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

/// Why the operator is being asked to authorize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthReason {
    /// Nothing usable in the token store.
    NoCredential,
    /// A stored credential exists but refreshing it failed.
    RefreshFailed,
}

/// Source of an out-of-band authorization code.
///
/// Returning `Ok(None)` means the operator declined.
pub trait CodePrompt: Send + Sync {
    fn request_code(
        &self,
        authorization_url: &str,
        reason: AuthReason,
    ) -> Result<Option<String>, AuthError>;
}

/// Prompt on the terminal: print the URL, read the code from stdin.
pub struct StdinPrompt;

impl CodePrompt for StdinPrompt {
    fn request_code(
        &self,
        authorization_url: &str,
        reason: AuthReason,
    ) -> Result<Option<String>, AuthError> {
        let mut stderr = io::stderr().lock();
        let banner = match reason {
            AuthReason::NoCredential => "STRAVA AUTHORIZATION REQUIRED",
            AuthReason::RefreshFailed => {
                "STRAVA TOKEN REFRESH FAILED - RE-AUTHORIZATION REQUIRED (leave empty to abort)"
            }
        };
        writeln!(
            stderr,
            "\n{banner}\n\n1. Open this URL in your browser:\n   {authorization_url}\n\n\
             2. Authorize the application\n\
             3. Paste the code (or the whole redirect URL) below\n"
        )
        .and_then(|_| write!(stderr, "Authorization Code: "))
        .and_then(|_| stderr.flush())
        .map_err(|e| AuthError::Prompt(e.to_string()))?;

        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|e| AuthError::Prompt(e.to_string()))?;

        Ok(extract_code(&line))
    }
}

/// Refuses every request; used when running unattended.
pub struct NonInteractive;

impl CodePrompt for NonInteractive {
    fn request_code(&self, _: &str, reason: AuthReason) -> Result<Option<String>, AuthError> {
        tracing::error!(?reason, "Authorization needed but interactive prompts are disabled");
        Err(AuthError::InteractionRequired)
    }
}

/// Pull the authorization code out of operator input.
///
/// Accepts the bare code or the redirect URL Strava sends the browser to.
pub fn extract_code(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if !input.contains("code=") {
        return Some(input.to_string());
    }

    let query = input.split_once('?').map(|(_, q)| q).unwrap_or(input);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "code")
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Produces a valid access token on demand.
pub struct Authenticator {
    client: StravaClient,
    store: TokenStore,
    prompt: Arc<dyn CodePrompt>,
    redirect_uri: String,
    bootstrap_refresh_token: Option<String>,
}

impl Authenticator {
    pub fn new(
        client: StravaClient,
        store: TokenStore,
        prompt: Arc<dyn CodePrompt>,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            store,
            prompt,
            redirect_uri,
            bootstrap_refresh_token: None,
        }
    }

    /// Build from configuration. Fails if the client ID or secret is missing.
    pub fn from_config(config: &Config, prompt: Arc<dyn CodePrompt>) -> Result<Self, AuthError> {
        let (client_id, client_secret) = config.client_credentials()?;

        let client = StravaClient::from_config(config, client_id, client_secret)?;
        let mut auth = Self::new(
            client,
            TokenStore::new(&config.token_file),
            prompt,
            config.redirect_uri.clone(),
        );
        auth.bootstrap_refresh_token = config.strava_refresh_token.clone();
        Ok(auth)
    }

    pub fn client(&self) -> &StravaClient {
        &self.client
    }

    /// Authorization URL for the configured redirect URI.
    pub fn authorization_url(&self) -> String {
        self.client.authorization_url(&self.redirect_uri)
    }

    /// Get a valid (non-expired) access token.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        Ok(self.get_valid_credential().await?.access_token)
    }

    /// Get a valid credential, refreshing or re-authorizing as needed.
    ///
    /// 1. Stored and not expiring within 5 minutes: returned as-is
    /// 2. Stored but expiring: refreshed with Strava
    /// 3. Nothing stored: bootstrap refresh token, if configured
    /// 4. Otherwise, or if refresh failed: interactive authorization
    pub async fn get_valid_credential(&self) -> Result<Credential, AuthError> {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Unreadable token file, treating as absent");
                None
            }
        };

        let (refresh_token, reason) = match stored {
            Some(credential) if !credential.is_expired_at(Utc::now()) => {
                tracing::debug!(expires_at = credential.expires_at, "Using saved access token");
                return Ok(credential);
            }
            Some(credential) => {
                tracing::info!(expires_at = credential.expires_at, "Access token expired, refreshing");
                (Some(credential.refresh_token), AuthReason::RefreshFailed)
            }
            None => (self.bootstrap_refresh_token.clone(), AuthReason::NoCredential),
        };

        if let Some(refresh_token) = refresh_token {
            match self.client.refresh_token(&refresh_token).await {
                Ok(response) => return self.persist(response),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Token refresh failed, falling back to interactive authorization"
                    );
                }
            }
        }

        self.authorize(reason).await
    }

    /// Interactive authorization handshake.
    pub async fn authorize(&self, reason: AuthReason) -> Result<Credential, AuthError> {
        let url = self.authorization_url();
        tracing::info!(?reason, "Initiating authorization flow");

        // Operator input blocks; keep it off the runtime threads
        let prompt = Arc::clone(&self.prompt);
        let code = tokio::task::spawn_blocking(move || prompt.request_code(&url, reason))
            .await
            .map_err(|e| AuthError::Prompt(e.to_string()))??
            .ok_or(AuthError::Declined)?;

        tracing::info!("Exchanging authorization code for access token");
        let response = self.client.exchange_code(&code, &self.redirect_uri).await?;
        let credential = self.persist(response)?;
        tracing::info!("Authorization successful");
        Ok(credential)
    }

    fn persist(&self, response: TokenResponse) -> Result<Credential, AuthError> {
        let credential = Credential {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
        };
        self.store.save(&credential)?;
        tracing::info!(expires_at = credential.expires_at, "Token stored");
        Ok(credential)
    }
}
