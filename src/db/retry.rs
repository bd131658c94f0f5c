// ABOUTME: Bounded retry with linear backoff for transient database failures.
// ABOUTME: Non-transient errors (syntax, missing table, permission) return immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::DbError;

/// How many times a transient database failure is retried, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Never retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Run `op`, retrying transient failures. Attempt numbers start at 0.
    pub async fn run<F, Fut, T>(&self, mut op: F) -> Result<T, DbError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DbError>>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    tracing::warn!(
                        "Transient database error (attempt {}/{}): {}",
                        attempt + 1,
                        self.max_retries + 1,
                        err
                    );
                    tokio::time::sleep(self.backoff * (attempt + 1)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(200),
        }
    }
}
