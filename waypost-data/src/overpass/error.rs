//! Error types produced by the Overpass executor.

use thiserror::Error;

/// HTTP status the service uses to signal overload.
pub const GATEWAY_TIMEOUT: u16 = 504;

/// Failure of a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The server returned an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Fully qualified request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short error description.
        message: String,
    },
    /// The request failed before a status was received.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Fully qualified request URL.
        url: String,
        /// Transport error description.
        message: String,
    },
}

impl TransportError {
    /// HTTP status, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Network { .. } => None,
        }
    }

    /// Whether another attempt may succeed.
    ///
    /// Only gateway timeouts and network faults qualify; every other HTTP
    /// status fails fast.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == GATEWAY_TIMEOUT,
            Self::Network { .. } => true,
        }
    }
}

/// Terminal failure of [`crate::overpass::OverpassClient::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// Overload or network fault persisted through the retry budget.
    #[error("overpass service unavailable after {attempts} attempt(s): {source}")]
    TransientService {
        /// Attempts made, including the last.
        attempts: u32,
        /// Error from the last attempt.
        source: TransportError,
    },
    /// The service rejected the query with a non-retryable status.
    #[error("overpass service rejected the query on attempt {attempts}: {source}")]
    PermanentService {
        /// Attempts made, including the rejected one.
        attempts: u32,
        /// The rejecting response.
        source: TransportError,
    },
    /// The body was not the expected JSON document.
    #[error("malformed overpass response: {message}")]
    MalformedResponse {
        /// Parser or service diagnostic.
        message: String,
    },
}

/// Errors raised while constructing the HTTP transport.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
