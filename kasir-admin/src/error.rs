/// Error types for the admin tooling
///
/// Two failure families matter to an operator and are kept apart:
///
/// - [`StoreError`]: the database could not be reached or a query failed
/// - [`NetworkError`]: an HTTP request failed or came back non-2xx
///
/// [`AdminError`] is the top-level type every operation returns. Binaries
/// log it with [`AdminError::label`] as a prefix and map it to an exit code.

use kasir_shared::auth::password::PasswordError;
use std::process::ExitCode;
use std::time::Duration;
use thiserror::Error;

/// Admin result type alias
pub type AdminResult<T> = Result<T, AdminError>;

/// Database failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be reached (refused, timed out, bad URL)
    #[error("Store connection failed: {0}")]
    Connect(#[source] sqlx::Error),

    /// A query reached the database and failed there
    #[error("Store query failed: {0}")]
    Query(#[source] sqlx::Error),

    /// Applying embedded migrations failed
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Connect(err),
            _ => StoreError::Query(err),
        }
    }
}

/// HTTP failures
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport failure: refused, reset, timed out
    #[error("Request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    /// The body was not the JSON we expected
    #[error("Could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// The readiness poll ran out of time
    #[error("Server not ready after {attempts} attempts ({waited:?})")]
    NotReady { attempts: u32, waited: Duration },
}

impl NetworkError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Top-level error for every admin operation
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Missing or malformed environment configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Seed data or fixture data failed validation
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The destructive user reset was not confirmed
    #[error("Refusing to reset users without confirmation (pass --yes or set KASIR_CONFIRM_RESET=yes)")]
    NotConfirmed,

    /// A freshly written hash did not verify against its plaintext
    #[error("Password self-check failed for {email}")]
    SelfCheckFailed { email: String },
}

impl From<sqlx::Error> for AdminError {
    fn from(err: sqlx::Error) -> Self {
        AdminError::Store(StoreError::from(err))
    }
}

impl AdminError {
    /// Short prefix for log lines
    pub fn label(&self) -> &'static str {
        match self {
            AdminError::Store(_) => "StoreError",
            AdminError::Network(_) => "NetworkError",
            AdminError::Password(_) => "PasswordError",
            AdminError::Config(_) => "ConfigError",
            AdminError::Validation(_) => "ValidationError",
            AdminError::NotConfirmed => "NotConfirmed",
            AdminError::SelfCheckFailed { .. } => "SelfCheckFailed",
        }
    }
}

/// Logs a failed run and maps the outcome to a process exit code
///
/// `Ok(code)` exits with `code`; any error is logged and exits 1.
pub fn report_exit(result: AdminResult<u8>) -> ExitCode {
    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("❌ {}: {}", e.label(), e);
            ExitCode::FAILURE
        }
    }
}
