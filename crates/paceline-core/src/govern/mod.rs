//! Call governors: non-functional policy wrappers for outbound API calls.
//!
//! Two composable governors, each enforcing one policy without touching
//! the wrapped operation's semantics:
//! - [`RetryGovernor`]: bounded retries with exponential backoff + jitter
//!   for rate-limited failures; everything else propagates immediately.
//! - [`PacingGovernor`]: a minimum interval between consecutive call
//!   starts, derived from a calls-per-minute ceiling.
//!
//! [`CallGovernor`] composes the two so that every retry attempt also
//! passes the pacing gate -- recovering from a throttle rejection must not
//! itself burst the rate limiter.

pub mod compose;
pub mod operation;
pub mod pacing;
pub mod retry;

pub use compose::CallGovernor;
pub use operation::Operation;
pub use pacing::{PacingGovernor, PacingPolicy};
pub use retry::{is_rate_limit_signal, RetryGovernor, RetryPolicy, Retryable};
