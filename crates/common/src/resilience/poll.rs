//! Bounded fixed-interval polling
//!
//! [`poll_until`] repeatedly invokes an async probe until it reports
//! [`PollStep::Ready`], the probe fails, or the attempt budget in
//! [`PollPolicy`] is spent. The interval is fixed: no backoff and no jitter.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by [`poll_until`]
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// Every attempt reported `Pending`
    #[error("condition not reached after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The probe itself failed; polling stops immediately
    #[error("probe failed on attempt {attempt}: {source}")]
    Probe { attempt: u32, source: E },
}

/// Result type for polling operations
pub type PollResult<T, E> = Result<T, PollError<E>>;

/// Outcome of a single probe invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    /// Terminal value reached
    Ready(T),
    /// Not there yet; try again after the interval
    Pending,
}

/// Attempt budget and spacing for a polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
    wait_first: bool,
}

impl PollPolicy {
    /// Poll up to `max_attempts` times, `interval` apart.
    ///
    /// A budget of zero is treated as a single attempt.
    pub const fn fixed(max_attempts: u32, interval: Duration) -> Self {
        let max_attempts = if max_attempts == 0 { 1 } else { max_attempts };
        Self { max_attempts, interval, wait_first: false }
    }

    /// Sleep one interval before the first probe as well.
    ///
    /// Useful when the remote side is known not to be ready immediately
    /// (e.g. a device that was just told to reboot or a snapshot that was
    /// just requested).
    pub const fn wait_first(mut self) -> Self {
        self.wait_first = true;
        self
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Upper bound on time spent sleeping across the whole loop.
    pub fn max_wait(&self) -> Duration {
        let sleeps = if self.wait_first { self.max_attempts } else { self.max_attempts - 1 };
        self.interval.saturating_mul(sleeps)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::fixed(6, Duration::from_secs(5))
    }
}

/// Run `probe` until it is ready, fails, or the policy budget is exhausted.
///
/// The probe receives the 1-based attempt number.
pub async fn poll_until<T, E, F, Fut>(policy: &PollPolicy, mut probe: F) -> PollResult<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<PollStep<T>, E>>,
    E: std::fmt::Display,
{
    for attempt in 1..=policy.max_attempts {
        if attempt > 1 || policy.wait_first {
            sleep_interval(policy.interval).await;
        }

        match probe(attempt).await {
            Ok(PollStep::Ready(value)) => {
                debug!(attempt, "poll condition reached");
                return Ok(value);
            }
            Ok(PollStep::Pending) => {
                debug!(attempt, max_attempts = policy.max_attempts, "poll condition pending");
            }
            Err(source) => {
                warn!(attempt, error = %source, "poll probe failed");
                return Err(PollError::Probe { attempt, source });
            }
        }
    }

    warn!(attempts = policy.max_attempts, "poll budget exhausted");
    Err(PollError::Exhausted { attempts: policy.max_attempts })
}

async fn sleep_interval(interval: Duration) {
    if !interval.is_zero() {
        tokio::time::sleep(interval).await;
    }
}
