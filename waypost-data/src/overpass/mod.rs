//! Overpass query executor.
//!
//! This module provides [`OverpassClient`], which renders the fixed
//! predicate set for a [`QueryRequest`], submits it with the retry/backoff
//! protocol and decodes the resulting elements.
//!
//! # Architecture
//!
//! The client is generic over a [`QueryTransport`] and a [`Sleeper`]. The
//! production pairing is [`HttpTransport`] and [`ThreadSleeper`]; tests
//! substitute the doubles in [`test_support`]. Only the transport performs
//! I/O, and only the retry loop sleeps.
//!
//! # Example
//!
//! ```no_run
//! use waypost_core::QueryRequest;
//! use waypost_data::overpass::{OverpassClient, OverpassClientConfig};
//!
//! let client = OverpassClient::new(&OverpassClientConfig::default())?;
//! let request = QueryRequest::at(23.711, 120.545)?;
//! let elements = client.execute(&request)?;
//! println!("{} raw elements", elements.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;
mod error;
mod query;
mod response;
mod retry;
mod transport;

#[doc(hidden)]
pub mod test_support;

use log::debug;
use waypost_core::{QueryRequest, RawElement};

pub use config::{DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, OverpassClientConfig};
pub use error::{ClientBuildError, GATEWAY_TIMEOUT, QueryError, TransportError};
pub use query::{Predicate, PredicateGroup, QueryTemplate, TagFilter};
pub use response::{OverpassResponse, decode_elements};
pub use retry::{RetryPolicy, RetryState, Sleeper, ThreadSleeper};
pub use transport::{HttpTransport, QueryTransport};

/// Executes nearby-POI queries against an Overpass interpreter.
#[derive(Debug)]
pub struct OverpassClient<T = HttpTransport, S = ThreadSleeper> {
    transport: T,
    sleeper: S,
    template: QueryTemplate,
}

impl OverpassClient {
    /// Build an HTTP-backed client.
    ///
    /// The template's `[timeout:..]` header follows
    /// [`OverpassClientConfig::query_timeout_secs`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(config: &OverpassClientConfig) -> Result<Self, ClientBuildError> {
        let transport = HttpTransport::new(config)?;
        let template = QueryTemplate::standard().with_query_timeout_secs(config.query_timeout_secs);
        Ok(Self::with_parts(transport, ThreadSleeper, template))
    }
}

impl<T, S> OverpassClient<T, S>
where
    T: QueryTransport,
    S: Sleeper,
{
    /// Assemble a client from explicit parts.
    #[must_use]
    pub const fn with_parts(transport: T, sleeper: S, template: QueryTemplate) -> Self {
        Self {
            transport,
            sleeper,
            template,
        }
    }

    /// The query template in use.
    #[must_use]
    pub const fn template(&self) -> &QueryTemplate {
        &self.template
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The sleeper used between attempts.
    #[must_use]
    pub const fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Fetch raw elements around the requested coordinate.
    ///
    /// # Errors
    ///
    /// - [`QueryError::TransientService`] when gateway timeouts or network
    ///   faults outlast the retry budget;
    /// - [`QueryError::PermanentService`] on any other HTTP error status,
    ///   without retrying;
    /// - [`QueryError::MalformedResponse`] when the body cannot be decoded.
    pub fn execute(&self, request: &QueryRequest) -> Result<Vec<RawElement>, QueryError> {
        let query = self.template.render(request);
        debug!(
            "Querying Overpass around ({}, {}) within {} m",
            request.latitude(),
            request.longitude(),
            request.radius_metres()
        );
        let policy = RetryPolicy::from(request);
        let body = policy.run(&self.sleeper, |_| self.transport.submit(&query))?;
        decode_elements(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::time::Duration;
    use test_support::{RecordingSleeper, ScriptedTransport, http_error, network_error};

    const BODY: &str = r#"{"elements": [
        {"type": "node", "id": 1, "lat": 23.71, "lon": 120.54,
         "tags": {"railway": "station", "name": "Central Station"}}
    ]}"#;

    #[fixture]
    fn request() -> QueryRequest {
        QueryRequest::new(23.71, 120.54, 1_000, 3, Duration::from_secs(5)).expect("valid request")
    }

    fn client(
        transport: ScriptedTransport,
    ) -> OverpassClient<ScriptedTransport, RecordingSleeper> {
        OverpassClient::with_parts(
            transport,
            RecordingSleeper::default(),
            QueryTemplate::standard(),
        )
    }

    #[rstest]
    fn returns_elements_on_success(request: QueryRequest) {
        let client = client(ScriptedTransport::with_body(BODY));

        let elements = client.execute(&request).expect("should succeed");

        assert_eq!(elements.len(), 1);
        assert_eq!(client.transport().attempts(), 1);
        assert!(client.sleeper.delays().is_empty());
    }

    #[rstest]
    fn submits_rendered_template(request: QueryRequest) {
        let client = client(ScriptedTransport::with_body(BODY));

        client.execute(&request).expect("should succeed");

        assert_eq!(
            client.transport().queries(),
            [QueryTemplate::standard().render(&request)]
        );
    }

    #[rstest]
    fn retries_gateway_timeout_with_linear_backoff(request: QueryRequest) {
        let client = client(ScriptedTransport::with_status(504));

        let err = client.execute(&request).expect_err("should fail");

        assert!(matches!(
            err,
            QueryError::TransientService { attempts: 3, .. }
        ));
        assert_eq!(client.transport().attempts(), 3);
        assert_eq!(
            client.sleeper.delays(),
            [Duration::from_secs(5), Duration::from_secs(10)]
        );
    }

    #[rstest]
    fn recovers_after_network_fault(request: QueryRequest) {
        let client = client(ScriptedTransport::new([
            Err(network_error()),
            Ok(BODY.to_owned()),
        ]));

        let elements = client.execute(&request).expect("should recover");

        assert_eq!(elements.len(), 1);
        assert_eq!(client.sleeper.delays(), [Duration::from_secs(5)]);
    }

    #[rstest]
    fn bad_request_fails_fast(request: QueryRequest) {
        let client = client(ScriptedTransport::with_error(http_error(400)));

        let err = client.execute(&request).expect_err("should fail");

        assert_eq!(
            err,
            QueryError::PermanentService {
                attempts: 1,
                source: http_error(400),
            }
        );
        assert!(client.sleeper.delays().is_empty());
    }

    #[rstest]
    fn malformed_body_is_not_retried(request: QueryRequest) {
        let client = client(ScriptedTransport::with_body("<html>busy</html>"));

        let err = client.execute(&request).expect_err("should fail");

        assert!(matches!(err, QueryError::MalformedResponse { .. }));
        assert_eq!(client.transport().attempts(), 1);
    }

    #[rstest]
    fn config_query_timeout_reaches_template() {
        let config = OverpassClientConfig::default().with_query_timeout_secs(25);
        let client = OverpassClient::new(&config).expect("client should build");
        assert_eq!(client.template().query_timeout_secs(), 25);
    }
}
