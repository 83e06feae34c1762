// ABOUTME: Resilient HTTP client used for all registry calls.
// ABOUTME: Exposes the transport seam, retry policy, and error types.

mod error;
mod retry;
mod transport;

pub use error::{HttpError, HttpErrorKind};
pub use retry::{
    DEFAULT_BACKOFF_BASE, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT, ResilientClient, RetryPolicy,
    StatusClass,
};
pub use transport::{
    FilePart, HttpRequest, HttpResponse, HttpTransport, MultipartBody, ReqwestTransport,
    RequestBody, TransportError,
};
