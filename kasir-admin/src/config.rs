/// Configuration for the admin binaries
///
/// Loaded from environment variables, with a `.env` file honored in
/// development.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required by store scripts)
/// - `DATABASE_MAX_CONNECTIONS`: Pool cap (default: 5)
/// - `DATABASE_CONNECT_TIMEOUT_SECS`: Acquire timeout (default: 10)
/// - `KASIR_API_URL`: REST server base URL (default: http://localhost:5000)
/// - `KASIR_API_TOKEN`: Bearer token sent with every API request (optional)
/// - `KASIR_HTTP_TIMEOUT_SECS`: Per-request timeout (default: 10)
/// - `KASIR_READY_PATH`: Path polled for readiness (default: /api/categories)
/// - `KASIR_READY_TIMEOUT_SECS`: Readiness deadline (default: 30)
/// - `KASIR_PROBE_FILE`: JSON file mapping email to expected password (optional)
/// - `KASIR_CONFIRM_RESET`: `yes` confirms the destructive user reset
///
/// # Example
///
/// ```no_run
/// use kasir_admin::config::Config;
///
/// # fn example() -> kasir_admin::error::AdminResult<()> {
/// let config = Config::from_env()?;
/// println!("API at {}", config.api.base_url);
/// # Ok(())
/// # }
/// ```

use crate::error::{AdminError, AdminResult};
use kasir_shared::db::pool::DatabaseConfig;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default REST server base URL, matching the server's default port
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Default readiness path; the categories listing needs no token
pub const DEFAULT_READY_PATH: &str = "/api/categories";

/// Complete admin configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database settings; `None` when `DATABASE_URL` is unset
    pub database: Option<DatabaseConfig>,

    /// REST server settings
    pub api: ApiConfig,

    /// Optional probe fixture for the user check
    pub probe_file: Option<PathBuf>,

    /// Whether `KASIR_CONFIRM_RESET=yes` was set
    pub confirm_reset: bool,
}

/// REST server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without trailing slash
    pub base_url: String,

    /// Bearer token, if the server requires auth
    pub token: Option<String>,

    /// Timeout applied to every request
    pub request_timeout: Duration,

    /// Path polled until the server answers
    pub ready_path: String,

    /// Total time the readiness poll may take
    pub ready_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            request_timeout: Duration::from_secs(10),
            ready_path: DEFAULT_READY_PATH.to_string(),
            ready_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Config` when a variable is present but malformed.
    pub fn from_env() -> AdminResult<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AdminResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = database_from_lookup(&lookup)?;
        let api = ApiConfig::from_lookup(&lookup)?;

        let confirm_reset = non_empty(&lookup, "KASIR_CONFIRM_RESET")
            .map(|v| v.trim().eq_ignore_ascii_case("yes"))
            .unwrap_or(false);

        Ok(Self {
            database,
            api,
            probe_file: non_empty(&lookup, "KASIR_PROBE_FILE").map(PathBuf::from),
            confirm_reset,
        })
    }

    /// Loads the smoke test's database and API settings, each with its own error
    pub fn phases_from_env() -> (AdminResult<DatabaseConfig>, AdminResult<ApiConfig>) {
        dotenvy::dotenv().ok();

        Self::phases_from_lookup(|key| env::var(key).ok())
    }

    pub fn phases_from_lookup<F>(lookup: F) -> (AdminResult<DatabaseConfig>, AdminResult<ApiConfig>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = database_from_lookup(&lookup).and_then(|db| db.ok_or_else(missing_database_url));
        (database, ApiConfig::from_lookup(&lookup))
    }

    /// Database settings, or an error naming the missing variable
    pub fn database_config(&self) -> AdminResult<&DatabaseConfig> {
        self.database.as_ref().ok_or_else(missing_database_url)
    }
}

impl ApiConfig {
    /// Builds REST server settings from a key lookup
    pub fn from_lookup<F>(lookup: F) -> AdminResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();
        let base_url = non_empty(&lookup, "KASIR_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AdminError::Config(format!(
                "KASIR_API_URL must start with http:// or https://, got {base_url}"
            )));
        }

        let ready_path = non_empty(&lookup, "KASIR_READY_PATH")
            .map(|path| {
                if path.starts_with('/') {
                    path
                } else {
                    format!("/{path}")
                }
            })
            .unwrap_or(defaults.ready_path);

        Ok(Self {
            base_url,
            token: non_empty(&lookup, "KASIR_API_TOKEN"),
            request_timeout: Duration::from_secs(parse_or(
                "KASIR_HTTP_TIMEOUT_SECS",
                non_empty(&lookup, "KASIR_HTTP_TIMEOUT_SECS"),
                defaults.request_timeout.as_secs(),
            )?),
            ready_path,
            ready_timeout: Duration::from_secs(parse_or(
                "KASIR_READY_TIMEOUT_SECS",
                non_empty(&lookup, "KASIR_READY_TIMEOUT_SECS"),
                defaults.ready_timeout.as_secs(),
            )?),
        })
    }
}

/// Database settings; `None` when `DATABASE_URL` is unset
fn database_from_lookup<F>(lookup: &F) -> AdminResult<Option<DatabaseConfig>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(url) = non_empty(lookup, "DATABASE_URL") else {
        return Ok(None);
    };

    let defaults = DatabaseConfig::default();
    Ok(Some(DatabaseConfig {
        url,
        max_connections: parse_or(
            "DATABASE_MAX_CONNECTIONS",
            non_empty(lookup, "DATABASE_MAX_CONNECTIONS"),
            defaults.max_connections,
        )?,
        connect_timeout_seconds: parse_or(
            "DATABASE_CONNECT_TIMEOUT_SECS",
            non_empty(lookup, "DATABASE_CONNECT_TIMEOUT_SECS"),
            defaults.connect_timeout_seconds,
        )?,
        ..defaults
    }))
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn missing_database_url() -> AdminError {
    AdminError::Config("DATABASE_URL environment variable is required".to_string())
}

fn parse_or<T: FromStr>(key: &str, value: Option<String>, default: T) -> AdminResult<T> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AdminError::Config(format!("{key} has an invalid value: {raw}"))),
        None => Ok(default),
    }
}
