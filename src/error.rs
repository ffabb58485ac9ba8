// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for each pipeline stage.
//!
//! Every component owns a small error enum; `PipelineError` composes them
//! for the orchestrator and the binary.

use crate::config::ConfigError;

/// Failure talking to the Strava HTTP API.
#[derive(Debug, thiserror::Error)]
pub enum StravaApiError {
    #[error("Strava request failed: {0}")]
    Transport(String),

    #[error("Strava rejected the access token (401)")]
    Unauthorized,

    #[error("Strava rate limit hit (429)")]
    RateLimited,

    #[error("Strava returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Strava response: {0}")]
    Decode(String),
}

/// Reading or writing one of the durable files (token store, raw cache, outputs).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to serialize {0}")]
    Serialize(String),

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// No usable credential could be established.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Strava client credentials unavailable: {0}")]
    Config(#[from] ConfigError),

    #[error("Authorization was declined (no code entered)")]
    Declined,

    #[error("Interactive authorization required but running non-interactively")]
    InteractionRequired,

    #[error("Failed to read authorization code: {0}")]
    Prompt(String),

    #[error("Token endpoint rejected the request: {0}")]
    Rejected(#[from] StravaApiError),

    #[error("Token store error: {0}")]
    Store(#[from] StoreError),
}

/// Fetching activities failed; nothing was cached.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Invalid start date '{0}' (expected YYYY-MM-DD)")]
    InvalidStartDate(String),

    #[error("Access token rejected while fetching activities")]
    Unauthorized,

    #[error("Strava rate limit hit while fetching activities")]
    RateLimited,

    #[error("Activity fetch failed: {0}")]
    Api(StravaApiError),

    #[error("Failed to write raw cache: {0}")]
    Cache(#[from] StoreError),
}

impl From<StravaApiError> for ExtractionError {
    fn from(err: StravaApiError) -> Self {
        match err {
            StravaApiError::Unauthorized => ExtractionError::Unauthorized,
            StravaApiError::RateLimited => ExtractionError::RateLimited,
            other => ExtractionError::Api(other),
        }
    }
}

/// The cached raw artifact exists but cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum CacheLoadError {
    #[error("Failed to read cache file: {0}")]
    Io(String),

    #[error("Cache file is not a valid activity list: {0}")]
    Parse(String),
}

/// The raw activity batch is structurally unusable.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Raw activity batch is malformed: {0}")]
    MalformedBatch(String),

    #[error("Activity {0} appears more than once in the batch")]
    DuplicateActivity(u64),
}

/// Writing a CSV output failed.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Terminal failure of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(AuthError),

    #[error("Extraction failed: {0}")]
    Extraction(ExtractionError),

    #[error("Transformation failed: {0}")]
    Transform(#[from] TransformError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("No cycling activities found in the requested window")]
    NoActivities,
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Auth(auth) => PipelineError::Auth(auth),
            other => PipelineError::Extraction(other),
        }
    }
}

impl From<AuthError> for PipelineError {
    fn from(err: AuthError) -> Self {
        PipelineError::Auth(err)
    }
}

impl PipelineError {
    /// True when the run failed because no credential could be established.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, PipelineError::Auth(_))
    }
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
