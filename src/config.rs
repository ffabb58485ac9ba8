//! Pipeline configuration loaded from environment variables and `.env`.
//!
//! Client credentials are optional here: a run that is served entirely
//! from the raw cache never needs them. The authenticator asks for them
//! through [`Config::client_credentials`] when a token is actually needed.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use validator::Validate;

/// Default number of activities requested per page (Strava's maximum).
pub const DEFAULT_PER_PAGE: u32 = 200;
/// Default extraction window.
pub const DEFAULT_MONTHS_BACK: u32 = 12;
/// Default cache validity.
pub const DEFAULT_CACHE_HOURS: u64 = 24;

const RAW_CACHE_FILE: &str = "raw_activities.json";
const SUMMARY_FILE: &str = "cycling_summary.csv";
const PATHS_FILE: &str = "cycling_paths.csv";

/// Pipeline configuration, loaded once at startup.
#[derive(Debug, Clone, Validate)]
pub struct Config {
    // --- Strava OAuth ---
    /// Strava OAuth client ID
    pub strava_client_id: Option<String>,
    /// Strava OAuth client secret
    pub strava_client_secret: Option<String>,
    /// Refresh token used to bootstrap the token store when it is empty
    pub strava_refresh_token: Option<String>,
    /// Redirect URI registered with the Strava application
    pub redirect_uri: String,

    // --- Endpoints ---
    /// REST API base, e.g. `https://www.strava.com/api/v3`
    pub api_base_url: String,
    /// OAuth base, e.g. `https://www.strava.com/oauth`
    pub oauth_base_url: String,
    #[validate(range(min = 1))]
    pub http_timeout_secs: u64,

    // --- Extraction ---
    #[validate(range(min = 1, max = 200))]
    pub activities_per_page: u32,
    #[validate(range(min = 1))]
    pub months_back: u32,
    pub cache_hours: u64,

    // --- Files ---
    /// Directory holding the raw cache and the CSV outputs
    pub output_dir: PathBuf,
    /// Token store location
    pub token_file: PathBuf,

    /// Refuse to prompt the operator for an authorization code
    pub non_interactive: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: Some("test_client_id".to_string()),
            strava_client_secret: Some("test_secret".to_string()),
            strava_refresh_token: None,
            redirect_uri: "http://localhost".to_string(),
            api_base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_base_url: "https://www.strava.com/oauth".to_string(),
            http_timeout_secs: 30,
            activities_per_page: DEFAULT_PER_PAGE,
            months_back: DEFAULT_MONTHS_BACK,
            cache_hours: DEFAULT_CACHE_HOURS,
            output_dir: PathBuf::from("data"),
            token_file: PathBuf::from("config/strava_tokens.json"),
            non_interactive: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            strava_client_id: non_empty("STRAVA_CLIENT_ID"),
            strava_client_secret: non_empty("STRAVA_CLIENT_SECRET"),
            strava_refresh_token: non_empty("STRAVA_REFRESH_TOKEN"),
            redirect_uri: non_empty("STRAVA_REDIRECT_URI")
                .unwrap_or_else(|| "http://localhost".to_string()),
            api_base_url: non_empty("STRAVA_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://www.strava.com/api/v3".to_string()),
            oauth_base_url: non_empty("STRAVA_OAUTH_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://www.strava.com/oauth".to_string()),
            http_timeout_secs: parse_or(
                "STRAVA_HTTP_TIMEOUT_SECS",
                non_empty("STRAVA_HTTP_TIMEOUT_SECS"),
                30,
            )?,
            activities_per_page: parse_or(
                "ACTIVITIES_PER_PAGE",
                non_empty("ACTIVITIES_PER_PAGE"),
                DEFAULT_PER_PAGE,
            )?,
            months_back: parse_or("MONTHS_BACK", non_empty("MONTHS_BACK"), DEFAULT_MONTHS_BACK)?,
            cache_hours: parse_or("CACHE_HOURS", non_empty("CACHE_HOURS"), DEFAULT_CACHE_HOURS)?,
            output_dir: non_empty("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            token_file: non_empty("TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("config/strava_tokens.json")),
            non_interactive: non_empty("STRAVA_NON_INTERACTIVE")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        config.check()?;
        Ok(config)
    }

    /// Validate numeric ranges. Call again after applying CLI overrides.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string().replace('\n', "; ")))
    }

    /// Client ID and secret, or the name of the first missing variable.
    pub fn client_credentials(&self) -> Result<(&str, &str), ConfigError> {
        let id = self
            .strava_client_id
            .as_deref()
            .ok_or(ConfigError::Missing("STRAVA_CLIENT_ID"))?;
        let secret = self
            .strava_client_secret
            .as_deref()
            .ok_or(ConfigError::Missing("STRAVA_CLIENT_SECRET"))?;
        Ok((id, secret))
    }

    /// Raw activity cache (JSON array).
    pub fn raw_cache_path(&self) -> PathBuf {
        self.output_dir.join(RAW_CACHE_FILE)
    }

    /// Per-activity summary table.
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    /// Per-GPS-point path table.
    pub fn paths_path(&self) -> PathBuf {
        self.output_dir.join(PATHS_FILE)
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("{}: cannot parse '{}'", name, raw))),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
