//! Retry/Backoff Controller
//!
//! Rate-limited attempts are retried with capped exponential backoff. The
//! final allowed attempt (and the one after it) switch to the fallback model.
//! Any other failure ends the call immediately.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::AiError;

/// Retries allowed after the first attempt
pub const MAX_ATTEMPTS: u32 = 3;
/// Delay before the first retry
pub const BASE_DELAY: Duration = Duration::from_secs(2);
/// Upper bound for any single delay
pub const MAX_DELAY: Duration = Duration::from_secs(10);

/// Backoff policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
            max_delay: MAX_DELAY,
        }
    }
}

impl RetryPolicy {
    /// `min(base_delay * 2^(attempt-1), max_delay)`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map(|d| d.min(self.max_delay))
            .unwrap_or(self.max_delay)
    }
}

/// Per-call retry state; never shared between calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    current_model: String,
}

impl RetryState {
    fn new(model: &str) -> Self {
        Self {
            attempt: 1,
            current_model: model.to_string(),
        }
    }

    /// 1-based attempt number
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn current_model(&self) -> &str {
        &self.current_model
    }
}

/// Retry/backoff controller
#[derive(Debug, Clone)]
pub struct RetryController {
    policy: RetryPolicy,
    fallback_model: String,
}

impl RetryController {
    pub fn new(fallback_model: impl Into<String>) -> Self {
        Self::with_policy(RetryPolicy::default(), fallback_model)
    }

    pub fn with_policy(policy: RetryPolicy, fallback_model: impl Into<String>) -> Self {
        Self {
            policy,
            fallback_model: fallback_model.into(),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    /// Run `attempt` until it succeeds, fails terminally, or retries run out
    ///
    /// The closure receives the current state and must use
    /// [`RetryState::current_model`] for its request.
    pub async fn run<T, F, Fut>(&self, model: &str, mut attempt: F) -> Result<T, AiError>
    where
        F: FnMut(&RetryState) -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        let mut state = RetryState::new(model);

        loop {
            let err = match attempt(&state).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if !err.is_retryable() || state.attempt > self.policy.max_attempts {
                return Err(err);
            }

            let delay = self.policy.delay_for(state.attempt);
            warn!(
                attempt = state.attempt,
                delay_ms = delay.as_millis() as u64,
                model = %state.current_model,
                "rate limited, backing off"
            );
            tokio::time::sleep(delay).await;

            state.attempt += 1;
            if state.attempt == self.policy.max_attempts
                && state.current_model != self.fallback_model
            {
                info!(
                    attempt = state.attempt,
                    from = %state.current_model,
                    to = %self.fallback_model,
                    "switching to fallback model"
                );
                state.current_model = self.fallback_model.clone();
            }
        }
    }
}
