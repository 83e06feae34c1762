// ABOUTME: HTTP error types with SNAFU pattern.
// ABOUTME: Separates fatal authentication failures from exhausted retries.

use snafu::Snafu;

use super::transport::TransportError;

/// Error returned once the retry policy gives up.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum HttpError {
    #[snafu(display("authentication failed: {body}"))]
    Authentication { body: String },

    #[snafu(display("request failed after {attempts} attempt(s): {source}"))]
    RequestFailed {
        attempts: u32,
        source: TransportError,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// The server rejected the credentials (HTTP 401). Never retried.
    Authentication,
    /// Every attempt failed at the transport level.
    RequestFailed,
}

impl HttpError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> HttpErrorKind {
        match self {
            HttpError::Authentication { .. } => HttpErrorKind::Authentication,
            HttpError::RequestFailed { .. } => HttpErrorKind::RequestFailed,
        }
    }
}
