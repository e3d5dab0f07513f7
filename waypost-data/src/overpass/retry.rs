//! Retry/backoff protocol around a single request.
//!
//! The loop is an explicit state machine:
//!
//! ```text
//! Attempting(n) --ok--------------------------> Succeeded
//! Attempting(n) --retryable, n < budget-------> Backoff(n) --sleep--> Attempting(n + 1)
//! Attempting(n) --retryable, n == budget------> Failed(TransientService)
//! Attempting(n) --non-retryable---------------> Failed(PermanentService)
//! ```
//!
//! The delay after attempt `n` is `backoff * n`. Sleeping goes through a
//! [`Sleeper`] so tests can observe delays without waiting for them.

use std::time::Duration;

use log::{debug, warn};
use waypost_core::{DEFAULT_BACKOFF, DEFAULT_MAX_RETRIES, QueryRequest};

use super::error::{QueryError, TransportError};

/// Blocks the current thread between attempts.
pub trait Sleeper {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// State of the retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryState<T> {
    /// About to make attempt `attempt` (1-based).
    Attempting {
        /// Attempt number.
        attempt: u32,
    },
    /// Waiting `delay` after a retryable failure of `attempt`.
    Backoff {
        /// Attempt that failed.
        attempt: u32,
        /// Delay before the next attempt.
        delay: Duration,
    },
    /// An attempt succeeded.
    Succeeded {
        /// Attempts made.
        attempts: u32,
        /// Value produced by the successful attempt.
        value: T,
    },
    /// The loop gave up.
    Failed(QueryError),
}

/// Retry budget and linear backoff.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use waypost_data::overpass::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, Duration::from_secs(5));
/// assert_eq!(policy.delay_for(1), Duration::from_secs(5));
/// assert_eq!(policy.delay_for(2), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_BACKOFF)
    }
}

impl From<&QueryRequest> for RetryPolicy {
    fn from(request: &QueryRequest) -> Self {
        Self::new(request.max_retries(), request.backoff())
    }
}

impl RetryPolicy {
    /// Policy allowing up to `max_retries` attempts.
    #[must_use]
    pub const fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff,
        }
    }

    /// Attempts the loop may make. A zero budget still allows one attempt.
    #[must_use]
    pub const fn attempt_budget(&self) -> u32 {
        if self.max_retries == 0 {
            1
        } else {
            self.max_retries
        }
    }

    /// Delay after the given failed attempt.
    #[must_use]
    pub const fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }

    /// Transition out of [`RetryState::Attempting`] given its outcome.
    pub fn after_attempt<T>(
        &self,
        attempt: u32,
        outcome: Result<T, TransportError>,
    ) -> RetryState<T> {
        match outcome {
            Ok(value) => RetryState::Succeeded {
                attempts: attempt,
                value,
            },
            Err(error) if !error.is_retryable() => {
                warn!("Overpass attempt {attempt} failed permanently: {error}");
                RetryState::Failed(QueryError::PermanentService {
                    attempts: attempt,
                    source: error,
                })
            }
            Err(error) if attempt < self.attempt_budget() => {
                let delay = self.delay_for(attempt);
                warn!(
                    "Overpass attempt {attempt}/{} failed: {error}; retrying in {delay:?}",
                    self.attempt_budget()
                );
                RetryState::Backoff { attempt, delay }
            }
            Err(error) => {
                warn!("Overpass attempt {attempt} failed and the retry budget is spent: {error}");
                RetryState::Failed(QueryError::TransientService {
                    attempts: attempt,
                    source: error,
                })
            }
        }
    }

    /// Drive `operation` through the state machine until it succeeds or
    /// fails terminally.
    ///
    /// `operation` receives the 1-based attempt number.
    pub fn run<T, S, F>(&self, sleeper: &S, mut operation: F) -> Result<T, QueryError>
    where
        S: Sleeper + ?Sized,
        F: FnMut(u32) -> Result<T, TransportError>,
    {
        let mut state = RetryState::Attempting { attempt: 1 };
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    debug!("Overpass attempt {attempt}/{}", self.attempt_budget());
                    self.after_attempt(attempt, operation(attempt))
                }
                RetryState::Backoff { attempt, delay } => {
                    sleeper.sleep(delay);
                    RetryState::Attempting {
                        attempt: attempt.saturating_add(1),
                    }
                }
                RetryState::Succeeded { attempts, value } => {
                    debug!("Overpass query succeeded after {attempts} attempt(s)");
                    return Ok(value);
                }
                RetryState::Failed(error) => return Err(error),
            };
        }
    }
}
