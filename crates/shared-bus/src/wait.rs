//! # Wait Strategies
//!
//! How a blocked publisher or an idle poll loop spends time before retrying.

use crossbeam_utils::Backoff;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default park interval for [`WaitStrategy::Sleeping`].
pub const DEFAULT_SLEEP: Duration = Duration::from_micros(100);

/// Idle policy applied between retries.
///
/// All variants first spin through a short exponential [`Backoff`]; they only
/// differ once the backoff is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStrategy {
    /// Spin forever. Lowest latency, burns a core.
    BusySpin,
    /// Yield the thread to the scheduler.
    Yielding,
    /// Park the thread for the given interval.
    Sleeping(Duration),
}

impl WaitStrategy {
    /// Wait once. Callers reset `backoff` after making progress.
    pub fn idle(&self, backoff: &Backoff) {
        if !backoff.is_completed() {
            backoff.snooze();
            return;
        }
        match self {
            WaitStrategy::BusySpin => std::hint::spin_loop(),
            WaitStrategy::Yielding => std::thread::yield_now(),
            WaitStrategy::Sleeping(interval) => std::thread::sleep(*interval),
        }
    }
}

impl Default for WaitStrategy {
    fn default() -> Self {
        WaitStrategy::Sleeping(DEFAULT_SLEEP)
    }
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitStrategy::BusySpin => write!(f, "BUSY_SPIN"),
            WaitStrategy::Yielding => write!(f, "YIELDING"),
            WaitStrategy::Sleeping(interval) => write!(f, "SLEEPING:{}", interval.as_micros()),
        }
    }
}

/// Unknown wait strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown wait strategy: {0} (expected BUSY_SPIN, YIELDING or SLEEPING[:micros])")]
pub struct ParseWaitStrategyError(pub String);

impl FromStr for WaitStrategy {
    type Err = ParseWaitStrategyError;

    /// Accepts `BUSY_SPIN`, `YIELDING`, `SLEEPING` and `SLEEPING:<micros>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        match normalized.split_once(':') {
            None => match normalized.as_str() {
                "BUSY_SPIN" => Ok(WaitStrategy::BusySpin),
                "YIELDING" => Ok(WaitStrategy::Yielding),
                "SLEEPING" => Ok(WaitStrategy::Sleeping(DEFAULT_SLEEP)),
                _ => Err(ParseWaitStrategyError(s.to_string())),
            },
            Some(("SLEEPING", micros)) => micros
                .parse::<u64>()
                .map(|m| WaitStrategy::Sleeping(Duration::from_micros(m)))
                .map_err(|_| ParseWaitStrategyError(s.to_string())),
            Some(_) => Err(ParseWaitStrategyError(s.to_string())),
        }
    }
}
