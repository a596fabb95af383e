//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `QUICKCART_API_BASE` - Base URL of the QuickCart API (default: `http://localhost:5000/api`)
//! - `QUICKCART_TOKEN_PATH` - File holding the persisted auth token
//!   (default: `<local data dir>/quickcart/token`)
//! - `QUICKCART_FALLBACK_ADDRESS` - Delivery address used when the signed-in
//!   profile has none (default: `123 Main St, New York, NY`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

/// Default API base URL of a locally running backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Delivery address used when the user profile has none.
pub const DEFAULT_FALLBACK_ADDRESS: &str = "123 Main St, New York, NY";

/// Token file name inside the data directory.
const TOKEN_FILE_NAME: &str = "token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL every API path is appended to (no trailing slash)
    pub api_base: String,
    /// Where the auth token is persisted between runs
    pub token_path: PathBuf,
    /// Delivery address used when the profile lacks one
    pub fallback_delivery_address: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token_path: default_token_path(),
            fallback_delivery_address: DEFAULT_FALLBACK_ADDRESS.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base = normalize_api_base(
            "QUICKCART_API_BASE",
            &get_env_or_default("QUICKCART_API_BASE", DEFAULT_API_BASE),
        )?;
        let token_path =
            get_optional_env("QUICKCART_TOKEN_PATH").map_or_else(default_token_path, PathBuf::from);
        let fallback_delivery_address =
            get_env_or_default("QUICKCART_FALLBACK_ADDRESS", DEFAULT_FALLBACK_ADDRESS);

        Ok(Self {
            api_base,
            token_path,
            fallback_delivery_address,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Override the API base URL (e.g. from a command-line flag).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base` is not an http(s) URL.
    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base = normalize_api_base("--api-base", base)?;
        Ok(self)
    }

    /// Override the token file location.
    #[must_use]
    pub fn with_token_path(mut self, path: PathBuf) -> Self {
        self.token_path = path;
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate an API base URL and strip any trailing slash.
fn normalize_api_base(source: &str, raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(source.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            source.to_string(),
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        ));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// `<local data dir>/quickcart/token`, or `./.quickcart-token` when the
/// platform has no data directory.
fn default_token_path() -> PathBuf {
    dirs::data_local_dir().map_or_else(
        || PathBuf::from(".quickcart-token"),
        |dir| dir.join("quickcart").join(TOKEN_FILE_NAME),
    )
}
