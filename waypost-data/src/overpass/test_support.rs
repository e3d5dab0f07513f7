//! Test utilities for the Overpass executor.
//!
//! This module provides [`ScriptedTransport`], a deterministic test double
//! for [`QueryTransport`] that replays pre-configured outcomes without making
//! HTTP requests, and [`RecordingSleeper`], which records backoff delays
//! instead of blocking.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::time::Duration;

use super::error::TransportError;
use super::retry::Sleeper;
use super::transport::QueryTransport;

/// Stub `QueryTransport` for testing.
///
/// Outcomes are replayed in order; once the script runs out the last outcome
/// repeats.
///
/// # Example
///
/// ```
/// use waypost_data::overpass::QueryTransport;
/// use waypost_data::overpass::test_support::ScriptedTransport;
///
/// let transport = ScriptedTransport::gateway_timeout_then(r#"{"elements": []}"#);
/// assert!(transport.submit("[out:json];").is_err());
/// assert!(transport.submit("[out:json];").is_ok());
/// assert_eq!(transport.attempts(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: RefCell<VecDeque<Result<String, TransportError>>>,
    last: RefCell<Option<Result<String, TransportError>>>,
    attempts: Cell<u32>,
    queries: RefCell<Vec<String>>,
}

/// URL reported by scripted errors.
pub const STUB_URL: &str = "http://overpass.test/api/interpreter";

impl ScriptedTransport {
    /// Replay `outcomes` in order.
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = Result<String, TransportError>>) -> Self {
        Self {
            script: RefCell::new(outcomes.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Always answer with `body`.
    #[must_use]
    pub fn with_body(body: impl Into<String>) -> Self {
        Self::new([Ok(body.into())])
    }

    /// Always fail with `error`.
    #[must_use]
    pub fn with_error(error: TransportError) -> Self {
        Self::new([Err(error)])
    }

    /// Always fail with the given HTTP status.
    #[must_use]
    pub fn with_status(status: u16) -> Self {
        Self::with_error(http_error(status))
    }

    /// Fail once with a gateway timeout, then answer with `body`.
    #[must_use]
    pub fn gateway_timeout_then(body: impl Into<String>) -> Self {
        Self::new([Err(http_error(504)), Ok(body.into())])
    }

    /// Number of submissions so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }

    /// Query texts received, in order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries.borrow().clone()
    }
}

/// Build an HTTP transport error for `status`.
#[must_use]
pub fn http_error(status: u16) -> TransportError {
    TransportError::Http {
        url: STUB_URL.to_owned(),
        status,
        message: format!("scripted status {status}"),
    }
}

/// Build a network transport error.
#[must_use]
pub fn network_error() -> TransportError {
    TransportError::Network {
        url: STUB_URL.to_owned(),
        message: "connection refused".to_owned(),
    }
}

impl QueryTransport for ScriptedTransport {
    fn submit(&self, query: &str) -> Result<String, TransportError> {
        self.attempts.set(self.attempts.get().saturating_add(1));
        self.queries.borrow_mut().push(query.to_owned());
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(outcome) => {
                *self.last.borrow_mut() = Some(outcome.clone());
                outcome
            }
            None => self
                .last
                .borrow()
                .clone()
                .unwrap_or_else(|| Err(network_error())),
        }
    }
}

/// [`Sleeper`] that records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Delays requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}
