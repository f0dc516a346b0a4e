//! Bounded polling until a terminal value
//!
//! [`poll_until_terminal`] repeatedly runs a fetch until it yields a value the
//! caller considers terminal, the max wait elapses, or the task is cancelled.
//! It knows nothing about the remote API being observed.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default delay between two fetches
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default upper bound on the whole poll
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(60 * 60);

/// Polling configuration
///
/// [`poll_until_terminal`] reads `interval` and `max_wait`; `fail_on_failure`
/// is applied by the caller once a terminal value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Fixed delay between consecutive fetches
    pub interval: Duration,
    /// Total time after which polling gives up
    pub max_wait: Duration,
    /// Treat a terminal failure as a task failure
    pub fail_on_failure: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            fail_on_failure: false,
        }
    }
}

/// Why polling stopped without a terminal value
#[derive(Debug, Error)]
pub enum PollError<T, E> {
    /// The fetch itself failed; polling stops at the first failure
    #[error("status fetch failed on attempt {attempts}: {source}")]
    Fetch {
        attempts: u32,
        #[source]
        source: E,
    },

    /// Max wait elapsed without a terminal value
    #[error("no terminal status after {elapsed:?} ({attempts} attempts)")]
    Timeout {
        elapsed: Duration,
        attempts: u32,
        /// Last non-terminal value observed, if any
        last_seen: Option<T>,
    },

    #[error("polling cancelled after {attempts} attempts")]
    Cancelled { attempts: u32, last_seen: Option<T> },

    #[error("poll interval must be greater than 0")]
    InvalidInterval,
}

/// Poll `fetch` until `is_terminal` accepts its value
///
/// - The first fetch runs immediately; sleeps only separate unsuccessful fetches.
/// - `Ok(None)` from the fetch means "nothing to report yet" and is retried like
///   a non-terminal value.
/// - No fetch starts later than `max_wait` after the first one. When the next
///   fetch would, the remaining time is slept out and [`PollError::Timeout`] is
///   returned, so `max_wait < interval` means a single fetch.
/// - A fetch still in flight when `max_wait` elapses is dropped and
///   [`PollError::Timeout`] is returned.
/// - A fetch error aborts immediately with [`PollError::Fetch`].
/// - `cancel` is checked before every fetch and interrupts both fetches and
///   sleeps.
pub async fn poll_until_terminal<T, E, F, Fut, P>(
    config: &PollConfig,
    cancel: &CancellationToken,
    mut fetch: F,
    is_terminal: P,
) -> Result<T, PollError<T, E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    P: Fn(&T) -> bool,
{
    if config.interval.is_zero() {
        return Err(PollError::InvalidInterval);
    }

    let started = Instant::now();
    let deadline = started + config.max_wait;
    let mut attempts: u32 = 0;
    let mut last_seen: Option<T> = None;

    loop {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled {
                attempts,
                last_seen,
            });
        }

        attempts += 1;
        let outcome = tokio::select! {
            biased;
            outcome = fetch() => outcome,
            _ = cancel.cancelled() => {
                return Err(PollError::Cancelled { attempts, last_seen });
            }
            _ = time::sleep_until(deadline) => {
                debug!("Attempt {} still in flight at the deadline", attempts);
                return Err(PollError::Timeout {
                    elapsed: started.elapsed(),
                    attempts,
                    last_seen,
                });
            }
        };

        match outcome {
            Ok(Some(value)) if is_terminal(&value) => {
                debug!("Terminal value reached after {} attempt(s)", attempts);
                return Ok(value);
            }
            Ok(Some(value)) => last_seen = Some(value),
            Ok(None) => debug!("Attempt {}: no status available yet", attempts),
            Err(source) => return Err(PollError::Fetch { attempts, source }),
        }

        let elapsed = started.elapsed();
        let (delay, expired) = match config.max_wait.checked_sub(elapsed) {
            Some(remaining) if remaining > config.interval => (config.interval, false),
            Some(remaining) => (remaining, true),
            None => (Duration::ZERO, true),
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                return Err(PollError::Cancelled { attempts, last_seen });
            }
            _ = time::sleep(delay) => {}
        }

        if expired {
            return Err(PollError::Timeout {
                elapsed: started.elapsed(),
                attempts,
                last_seen,
            });
        }
    }
}
