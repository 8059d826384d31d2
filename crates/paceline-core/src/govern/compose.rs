//! Composition of the pacing and retry governors.
//!
//! [`CallGovernor`] routes every retry attempt through the pacing gate:
//! a sequence of backoff retries must not itself burst the provider's
//! rate limiter, so retries are not exempt from the minimum-interval rule.

use std::fmt;
use std::time::Duration;

use paceline_types::config::RateLimitSettings;

use super::operation::Operation;
use super::pacing::{PacingGovernor, PacingPolicy};
use super::retry::{RetryGovernor, RetryPolicy, Retryable};

/// An operation that passes the pacing gate before every invocation.
struct Paced<'g, Op> {
    gate: &'g PacingGovernor,
    inner: Op,
}

impl<Op: Operation + Send> Operation for Paced<'_, Op> {
    type Output = Op::Output;
    type Error = Op::Error;

    async fn call(&mut self) -> Result<Op::Output, Op::Error> {
        self.gate.pace().await;
        self.inner.call().await
    }
}

/// A single governed entry point combining pacing and retry.
///
/// Each attempt inside a retry sequence is individually paced; the
/// pacing gate is optional so a zero calls-per-minute configuration
/// leaves only the retry behavior.
pub struct CallGovernor {
    retry: RetryGovernor,
    pacing: Option<PacingGovernor>,
}

impl CallGovernor {
    pub fn new(retry_policy: RetryPolicy, pacing_policy: PacingPolicy) -> Self {
        let pacing =
            (pacing_policy.calls_per_minute() > 0).then(|| PacingGovernor::new(pacing_policy));
        Self {
            retry: RetryGovernor::new(retry_policy),
            pacing,
        }
    }

    /// Build a governor from the configuration surface.
    ///
    /// The `enabled` master switch is the embedding application's concern
    /// (it decides whether to construct a governor at all); this reads
    /// only the numeric knobs.
    pub fn from_settings(settings: &RateLimitSettings) -> Self {
        Self::new(
            RetryPolicy::new(
                settings.max_retries,
                Duration::from_millis(settings.base_delay_ms),
            ),
            PacingPolicy::new(settings.calls_per_minute),
        )
    }

    /// Whether a pacing gate is active.
    pub fn is_paced(&self) -> bool {
        self.pacing.is_some()
    }

    /// Run `operation` governed: paced before every attempt, rate-limited
    /// failures retried with backoff, all other failures propagated
    /// immediately.
    pub async fn execute<Op>(&self, operation: Op) -> Result<Op::Output, Op::Error>
    where
        Op: Operation + Send,
        Op::Error: Retryable + fmt::Display,
    {
        match &self.pacing {
            Some(gate) => {
                self.retry
                    .execute(Paced {
                        gate,
                        inner: operation,
                    })
                    .await
            }
            None => self.retry.execute(operation).await,
        }
    }
}
