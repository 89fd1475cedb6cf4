use std::future::Future;
use std::time::Duration;

use crate::error::AppError;
use crate::metrics::EMPTY_COMPLETIONS;

// How many times a completion may be attempted when it comes back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub retry: bool,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts, delay }
    }

    // single shot, empty result is final
    pub const fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    // Decision after attempt `n` (1-based) came back empty
    pub fn attempt(&self, n: u32) -> RetryDecision {
        RetryDecision {
            retry: n < self.max_attempts,
            delay: self.delay,
        }
    }
}

// One completion result: extracted text + the model's stop reason
#[derive(Debug, Clone, Default)]
pub struct Attempt {
    pub text: String,
    pub finish_reason: Option<String>,
}

// Runs `call` sequentially until it yields non-empty text or the policy gives up.
// Errors from `call` are returned as-is, only empty text is retried.
pub async fn run_until_non_empty<F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<String, AppError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt, AppError>>,
{
    let mut n = 1;
    loop {
        let attempt = call(n).await?;
        if !attempt.text.is_empty() {
            return Ok(attempt.text);
        }

        EMPTY_COMPLETIONS.inc();
        tracing::warn!(
            attempt = n,
            max_attempts = policy.max_attempts,
            finish_reason = attempt.finish_reason.as_deref().unwrap_or("unknown"),
            "completion returned empty content"
        );

        let decision = policy.attempt(n);
        if !decision.retry {
            return Err(AppError::EmptyCompletion);
        }
        if !decision.delay.is_zero() {
            tokio::time::sleep(decision.delay).await;
        }
        n += 1;
    }
}
