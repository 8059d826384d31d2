//! Retry governor: bounded retries with exponential backoff and jitter.
//!
//! Rate-limited failures are retried up to the policy's budget; any other
//! failure aborts the loop and propagates unchanged. Classification goes
//! through the [`Retryable`] capability so the governor never inspects
//! error text itself -- the typed `LlmError::RateLimited` variant produced
//! by the network layer is the primary signal, with a substring heuristic
//! retained as a compatibility fallback for unclassified provider text
//! (see [`is_rate_limit_signal`]).

use std::fmt;
use std::time::Duration;

use rand::Rng;

use paceline_types::llm::LlmError;

use super::operation::Operation;

/// Classification capability for failures seen by the retry governor.
pub trait Retryable {
    /// Whether this failure is a provider throttle signal worth retrying.
    fn is_rate_limited(&self) -> bool;

    /// The provider's minimum-wait hint, if it sent one.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Substring heuristic for rate-limit signals in raw provider text.
///
/// Matches the case-insensitive literal `rate_limit` or the literal `429`.
/// This is a compatibility baseline for errors that reach the governor as
/// unclassified text -- it is fragile and provider-coupled by nature, and
/// only consulted when no typed classification exists.
pub fn is_rate_limit_signal(message: &str) -> bool {
    message.to_lowercase().contains("rate_limit") || message.contains("429")
}

impl Retryable for LlmError {
    fn is_rate_limited(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } => true,
            // Unclassified provider text falls back to the heuristic.
            LlmError::Provider { message } => is_rate_limit_signal(message),
            _ => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited {
                retry_after_ms: Some(ms),
            } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

/// Retry policy: how many times to retry and how fast delays grow.
///
/// Immutable once constructed; one policy governs any number of
/// invocations across any number of operations.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum retry attempts after the initial one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per subsequent attempt.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Deterministic backoff component for a 0-based attempt index:
    /// `base_delay * 2^attempt`, saturating instead of overflowing.
    pub fn backoff_base(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Full delay before the retry that follows `attempt`: backoff plus
    /// uniform jitter in `[0, 1)` seconds, floored by the provider's
    /// retry-after hint when one is present.
    fn retry_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let jitter = Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..1.0));
        let delay = self.backoff_base(attempt).saturating_add(jitter);
        match retry_after {
            Some(hint) => delay.max(hint),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Wraps operations with bounded-retry, exponential-backoff logic.
///
/// Holds no state across invocations -- the policy is read-only, so one
/// governor can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct RetryGovernor {
    policy: RetryPolicy,
}

impl RetryGovernor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation`, retrying rate-limited failures up to
    /// `max_retries` times with exponential backoff + jitter.
    ///
    /// Any non-rate-limited failure aborts immediately with zero delay.
    /// When the budget is exhausted, the last failure is returned
    /// unchanged -- callers still see the original throttle signal.
    pub async fn execute<Op>(&self, mut operation: Op) -> Result<Op::Output, Op::Error>
    where
        Op: Operation,
        Op::Error: Retryable + fmt::Display,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation.call().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() && attempt < self.policy.max_retries => {
                    let delay = self.policy.retry_delay(attempt, err.retry_after());
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_retries.saturating_add(1),
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "rate limited, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_rate_limited() {
                        tracing::error!(
                            max_retries = self.policy.max_retries,
                            error = %err,
                            "rate limit retry budget exhausted"
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    fn rate_limited() -> LlmError {
        LlmError::RateLimited {
            retry_after_ms: None,
        }
    }

    #[test]
    fn test_heuristic_matches_rate_limit_literal() {
        assert!(is_rate_limit_signal("error code: rate_limit_exceeded"));
        assert!(is_rate_limit_signal("RATE_LIMIT hit"));
        assert!(is_rate_limit_signal("HTTP 429: too many requests"));
        assert!(!is_rate_limit_signal("HTTP 500: internal error"));
        assert!(!is_rate_limit_signal("connection refused"));
    }

    #[test]
    fn test_llm_error_classification() {
        assert!(rate_limited().is_rate_limited());
        assert!(
            LlmError::Provider {
                message: "HTTP 429: slow down".to_string()
            }
            .is_rate_limited()
        );
        assert!(
            !LlmError::Provider {
                message: "HTTP 500: boom".to_string()
            }
            .is_rate_limited()
        );
        assert!(!LlmError::AuthenticationFailed.is_rate_limited());
        // 529 is overload, not a throttle signal
        assert!(!LlmError::Overloaded("busy".to_string()).is_rate_limited());
    }

    #[test]
    fn test_retry_after_hint_extraction() {
        let err = LlmError::RateLimited {
            retry_after_ms: Some(2500),
        };
        assert_eq!(err.retry_after(), Some(Duration::from_millis(2500)));
        assert_eq!(rate_limited().retry_after(), None);
    }

    #[test]
    fn test_backoff_base_doubles() {
        let policy = RetryPolicy::new(5, Duration::from_secs(1));
        assert_eq!(policy.backoff_base(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_base(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_base(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_base(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_base_zero_delay_stays_zero() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert_eq!(policy.backoff_base(0), Duration::ZERO);
        assert_eq!(policy.backoff_base(10), Duration::ZERO);
    }

    #[test]
    fn test_backoff_base_saturates_on_huge_attempts() {
        let policy = RetryPolicy::new(u32::MAX, Duration::from_secs(1));
        // Shift past the factor's width must not panic or wrap to zero.
        let huge = policy.backoff_base(64);
        assert!(huge >= policy.backoff_base(31));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_no_delay() {
        let governor = RetryGovernor::new(RetryPolicy::new(3, Duration::from_secs(1)));
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let calls_op = Arc::clone(&calls);
        let result: Result<&str, LlmError> = governor
            .execute(move || {
                calls_op.fetch_add(1, Ordering::SeqCst);
                async { Ok("ok") }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_k_rate_limited_failures() {
        let k = 3u32;
        let governor = RetryGovernor::new(RetryPolicy::new(k, Duration::from_millis(10)));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_op = Arc::clone(&calls);
        let result: Result<&str, LlmError> = governor
            .execute(move || {
                let n = calls_op.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < k {
                        Err(rate_limited())
                    } else {
                        Ok("recovered")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), k + 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_propagates_last_failure_unchanged() {
        let governor = RetryGovernor::new(RetryPolicy::new(2, Duration::from_millis(10)));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_op = Arc::clone(&calls);
        let result: Result<(), LlmError> = governor
            .execute(move || {
                calls_op.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(LlmError::RateLimited {
                        retry_after_ms: Some(42),
                    })
                }
            })
            .await;

        // max_retries = 2 means 3 attempts total
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result.unwrap_err() {
            LlmError::RateLimited { retry_after_ms } => assert_eq!(retry_after_ms, Some(42)),
            other => panic!("expected RateLimited, got: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_failure_short_circuits() {
        let governor = RetryGovernor::new(RetryPolicy::new(5, Duration::from_secs(1)));
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let calls_op = Arc::clone(&calls);
        let result: Result<(), LlmError> = governor
            .execute(move || {
                calls_op.fetch_add(1, Ordering::SeqCst);
                async { Err(LlmError::AuthenticationFailed) }
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            LlmError::AuthenticationFailed
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_max_retries_means_single_attempt() {
        let governor = RetryGovernor::new(RetryPolicy::new(0, Duration::from_secs(1)));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_op = Arc::clone(&calls);
        let result: Result<(), LlmError> = governor
            .execute(move || {
                calls_op.fetch_add(1, Ordering::SeqCst);
                async { Err(rate_limited()) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_growth_bounded_per_attempt() {
        let governor = RetryGovernor::new(RetryPolicy::new(3, Duration::from_secs(1)));
        let starts: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));

        let starts_op = Arc::clone(&starts);
        let result: Result<(), LlmError> = governor
            .execute(move || {
                starts_op.lock().unwrap().push(Instant::now());
                async { Err(rate_limited()) }
            })
            .await;
        assert!(result.is_err());

        let starts = starts.lock().unwrap();
        assert_eq!(starts.len(), 4);
        // Delay before attempt i+1 is 1s * 2^i + jitter, jitter in [0, 1)
        for (i, pair) in starts.windows(2).enumerate() {
            let gap = pair[1] - pair[0];
            let base = Duration::from_secs(1 << i);
            assert!(
                gap >= base && gap < base + Duration::from_secs(1),
                "attempt {i}: gap {gap:?} outside [{base:?}, {base:?}+1s)"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_base_delay_still_sleeps_only_jitter() {
        let governor = RetryGovernor::new(RetryPolicy::new(1, Duration::ZERO));
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let calls_op = Arc::clone(&calls);
        let result: Result<&str, LlmError> = governor
            .execute(move || {
                let n = calls_op.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(rate_limited())
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_hint_floors_the_delay() {
        let governor = RetryGovernor::new(RetryPolicy::new(1, Duration::from_secs(1)));
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let calls_op = Arc::clone(&calls);
        let result: Result<&str, LlmError> = governor
            .execute(move || {
                let n = calls_op.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(LlmError::RateLimited {
                            retry_after_ms: Some(10_000),
                        })
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        // Backoff alone would be under 2s; the hint raises it to 10s.
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_message_heuristic_retries() {
        let governor = RetryGovernor::new(RetryPolicy::new(2, Duration::from_millis(10)));
        let calls = Arc::new(AtomicU32::new(0));

        let calls_op = Arc::clone(&calls);
        let result: Result<&str, LlmError> = governor
            .execute(move || {
                let n = calls_op.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(LlmError::Provider {
                            message: "HTTP 429: Too Many Requests".to_string(),
                        })
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
