//! Blocking transport for Overpass QL queries.
//!
//! [`QueryTransport`] is synchronous so the retry loop stays a plain
//! blocking state machine. [`HttpTransport`] bridges it to `reqwest` by
//! blocking on a Tokio runtime it owns.

use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::config::OverpassClientConfig;
use super::error::{ClientBuildError, TransportError};

/// Submit one query and return the raw response body.
///
/// Implementations make exactly one request per call; retrying is the
/// caller's concern.
pub trait QueryTransport {
    /// Send `query` and return the body of a successful response.
    fn submit(&self, query: &str) -> Result<String, TransportError>;
}

impl<T: QueryTransport + ?Sized> QueryTransport for &T {
    fn submit(&self, query: &str) -> Result<String, TransportError> {
        (**self).submit(query)
    }
}

/// HTTP transport posting `data=<query>` to an Overpass interpreter.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the transport uses its own
/// stored current-thread runtime. When called from within a multi-threaded
/// runtime it blocks on that runtime's handle with
/// [`tokio::task::block_in_place`]. A `current_thread` runtime cannot nest
/// another runtime on the same thread, so there the request runs on the
/// transport's own runtime from a scoped helper thread while the caller
/// blocks.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    runtime: Runtime,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("client", &self.client)
            .field("endpoint", &self.endpoint)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(config: &OverpassClientConfig) -> Result<Self, ClientBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout())
            .timeout(config.timeout())
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            runtime,
        })
    }

    /// Interpreter URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn submit_async(&self, query: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|err| convert_reqwest_error(&err, &self.endpoint))?
            .error_for_status()
            .map_err(|err| convert_reqwest_error(&err, &self.endpoint))?;

        response
            .text()
            .await
            .map_err(|err| convert_reqwest_error(&err, &self.endpoint))
    }
}

impl QueryTransport for HttpTransport {
    fn submit(&self, query: &str) -> Result<String, TransportError> {
        let future = self.submit_async(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(|| self.runtime.block_on(future))
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
            }),
            Err(_) => self.runtime.block_on(future),
        }
    }
}

/// Convert a reqwest error to a [`TransportError`].
///
/// Anything without an HTTP status, client-side timeouts included, is a
/// network fault.
fn convert_reqwest_error(error: &reqwest::Error, url: &str) -> TransportError {
    if let Some(status) = error.status() {
        return TransportError::Http {
            url: url.to_owned(),
            status: status.as_u16(),
            message: error.to_string(),
        };
    }

    let message = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    TransportError::Network {
        url: url.to_owned(),
        message,
    }
}
