/// Readiness poll for the REST server
///
/// The smoke test used to sleep a fixed few seconds and hope the server was
/// up. Instead we poll one path until the server answers with any HTTP
/// status, retrying connection failures with exponential backoff bounded by
/// a total deadline.
///
/// ```text
/// attempt:  1     2     3     4     5     6 ...
/// delay:  100ms 200ms 400ms 800ms  1.6s   2s (capped)
/// ```

use crate::api_client::ApiClient;
use crate::error::NetworkError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Backoff and deadline for the poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Delay after the first failed attempt
    pub base_delay: Duration,

    /// Upper bound for any single delay
    pub max_delay: Duration,

    /// Total time the poll may take
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ReadinessPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Delay after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// How the poll ended when the server answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub attempts: u32,
    pub waited: Duration,

    /// Status of the answering response
    pub status: u16,
}

/// Calls `check` until it succeeds or the deadline passes
///
/// `check` returns the HTTP status on any answer and an error when the
/// server could not be reached. Each attempt is cut off at the deadline.
pub async fn poll_until_ready<F, Fut>(
    policy: ReadinessPolicy,
    mut check: F,
) -> Result<Readiness, NetworkError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u16, NetworkError>>,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;

        let remaining = policy.timeout.saturating_sub(started.elapsed());
        let Ok(outcome) = tokio::time::timeout(remaining, check()).await else {
            let waited = started.elapsed();
            warn!(attempt = attempts, ?waited, "Attempt outlived the readiness deadline");
            return Err(NetworkError::NotReady { attempts, waited });
        };

        match outcome {
            Ok(status) => {
                let waited = started.elapsed();
                debug!(attempts, status, ?waited, "Server answered");
                return Ok(Readiness {
                    attempts,
                    waited,
                    status,
                });
            }
            Err(e) => {
                let waited = started.elapsed();
                if waited >= policy.timeout {
                    return Err(NetworkError::NotReady { attempts, waited });
                }

                let delay = policy.delay_for(attempts).min(policy.timeout - waited);
                warn!(
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Server not ready, retrying..."
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Polls `path` on the configured server
pub async fn wait_until_ready(
    client: &ApiClient,
    path: &str,
    policy: ReadinessPolicy,
) -> Result<Readiness, NetworkError> {
    info!(url = %client.url(path), "⏳ Waiting for server...");
    let readiness = poll_until_ready(policy, || client.probe(path)).await?;
    info!(
        attempts = readiness.attempts,
        status = readiness.status,
        "✅ Server is up"
    );
    Ok(readiness)
}
