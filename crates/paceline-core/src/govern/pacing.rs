//! Pacing governor: minimum interval between consecutive call starts.
//!
//! Derives the interval from a provider's calls-per-minute ceiling and
//! suspends just long enough to honor it. The timestamp of the previous
//! call is the governor's only state; it is updated at the instant control
//! passes to the wrapped operation.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::operation::Operation;

/// Pacing policy: a calls-per-minute ceiling.
#[derive(Debug, Clone)]
pub struct PacingPolicy {
    calls_per_minute: u32,
}

impl PacingPolicy {
    pub fn new(calls_per_minute: u32) -> Self {
        Self { calls_per_minute }
    }

    pub fn calls_per_minute(&self) -> u32 {
        self.calls_per_minute
    }

    /// Minimum spacing between call starts: `60s / calls_per_minute`.
    /// A ceiling of zero disables the gate entirely.
    pub fn min_interval(&self) -> Duration {
        if self.calls_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(60.0 / f64::from(self.calls_per_minute))
        }
    }
}

/// Enforces a minimum interval between consecutive invocations.
///
/// The last-call timestamp lives behind an async mutex held across the
/// wait, so the read-sleep-write sequence is atomic: concurrent callers
/// are serialized by the governor itself rather than by caller discipline.
/// The very first call never waits.
#[derive(Debug)]
pub struct PacingGovernor {
    policy: PacingPolicy,
    last_call: Mutex<Option<Instant>>,
}

impl PacingGovernor {
    pub fn new(policy: PacingPolicy) -> Self {
        Self {
            policy,
            last_call: Mutex::new(None),
        }
    }

    pub fn policy(&self) -> &PacingPolicy {
        &self.policy
    }

    /// Wait until the minimum interval since the previous call has
    /// elapsed, then stamp the current instant as the new last call.
    pub async fn pace(&self) {
        let min_interval = self.policy.min_interval();
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            let elapsed = last.elapsed();
            if elapsed < min_interval {
                let wait = min_interval - elapsed;
                tracing::debug!(
                    wait_ms = wait.as_millis() as u64,
                    "pacing: waiting before next call"
                );
                tokio::time::sleep(wait).await;
            }
        }
        *last_call = Some(Instant::now());
    }

    /// Pace, then invoke the operation. The operation's outcome passes
    /// through untouched -- pacing does not interpret failures.
    pub async fn execute<Op: Operation>(&self, mut operation: Op) -> Result<Op::Output, Op::Error> {
        self.pace().await;
        operation.call().await
    }
}
