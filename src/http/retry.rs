// ABOUTME: Retry policy and the resilient client that applies it.
// ABOUTME: 401 fails fast, other 4xx return as-is, 429/5xx and transport errors back off.

use snafu::ResultExt;
use std::time::Duration;
use tracing::warn;

use super::error::{AuthenticationSnafu, HttpError, RequestFailedSnafu};
use super::transport::{HttpRequest, HttpResponse, HttpTransport};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// How many times to try a request and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Delay before the second attempt; doubles for each further attempt.
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_TIMEOUT,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    /// Delay after the failed attempt with zero-based index `attempt`: `base * 2^attempt`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// What to do with a response of a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Below 400: hand back to the caller.
    Success,
    /// 4xx other than 401 and 429: hand back for the caller to interpret.
    ClientError,
    /// 401: fail immediately.
    Unauthorized,
    /// 429 or 5xx: retry while attempts remain.
    Retryable,
}

impl StatusClass {
    pub fn of(status: u16) -> Self {
        match status {
            401 => StatusClass::Unauthorized,
            429 => StatusClass::Retryable,
            s if s < 400 => StatusClass::Success,
            s if s < 500 => StatusClass::ClientError,
            _ => StatusClass::Retryable,
        }
    }
}

/// Sends requests through a transport, retrying under a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct ResilientClient<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> ResilientClient<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Send a request.
    ///
    /// Returns the response for any status except 401. A retryable status
    /// that persists through the last attempt is returned as-is; transport
    /// failures on the last attempt become [`HttpError::RequestFailed`].
    pub async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            let is_last = attempt + 1 >= max_attempts;

            match self.transport.execute(request, self.policy.timeout).await {
                Ok(response) => match StatusClass::of(response.status) {
                    StatusClass::Unauthorized => {
                        return AuthenticationSnafu {
                            body: response.body,
                        }
                        .fail();
                    }
                    StatusClass::Success | StatusClass::ClientError => return Ok(response),
                    StatusClass::Retryable if is_last => return Ok(response),
                    StatusClass::Retryable => {
                        let delay = self.policy.backoff_delay(attempt);
                        warn!(
                            "{} {} returned status {}, retrying in {:?}",
                            request.method, request.url, response.status, delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                },
                Err(err) if is_last => {
                    return Err(err).context(RequestFailedSnafu {
                        attempts: max_attempts,
                    });
                }
                Err(err) => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        "{} {} failed: {}, retrying in {:?}",
                        request.method, request.url, err, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }

            attempt += 1;
        }
    }
}
