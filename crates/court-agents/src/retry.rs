//! Retry policy for model invocations.
//!
//! Every prompt goes through [`prompt_with_retry`]: transient failures
//! (connection errors, 429/502/503, empty completions) back off
//! exponentially from `initial_delay`; anything else fails immediately.

use std::future::Future;
use std::time::Duration;

use rig::completion::Prompt;
use tracing::warn;

/// Uniform retry settings applied to every model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the second attempt; doubles after each failure.
    pub initial_delay: Duration,
    /// Total attempts including the first.
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_attempts: 6,
        }
    }
}

impl RetryPolicy {
    /// Backoff before attempt `attempt + 1` (attempt is 1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `op` under `policy`, retrying while `is_transient` says so.
pub async fn retry_transient<T, E, F, Fut>(
    policy: RetryPolicy,
    label: &str,
    is_transient: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_attempts || !is_transient(&e) {
                    return Err(e);
                }
                let backoff = policy.backoff(attempt);
                warn!(
                    label,
                    attempt,
                    max_attempts,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %e,
                    "Transient error, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
        }
    }
}

/// Prompt an agent under the retry policy.
pub async fn prompt_with_retry(
    agent: &impl Prompt,
    prompt: &str,
    policy: RetryPolicy,
    label: &str,
) -> Result<String, rig::completion::PromptError> {
    retry_transient(
        policy,
        label,
        |e: &rig::completion::PromptError| is_transient_error(&e.to_string()),
        || async move { agent.prompt(prompt).await },
    )
    .await
}

/// Classify whether an LLM API error is transient (connection failures, rate
/// limits, proxy hiccups) vs permanent (auth errors, bad requests).
pub fn is_transient_error(err_str: &str) -> bool {
    let err_lower = err_str.to_ascii_lowercase();
    err_str.contains("502")
        || err_str.contains("503")
        || err_str.contains("429")
        || err_lower.contains("resource_exhausted")
        || err_lower.contains("connection")
        || err_lower.contains("timed out")
        || err_lower.contains("timeout")
        || err_lower.contains("error sending request")
        || err_lower.contains("broken pipe")
        || err_lower.contains("reset by peer")
        || err_lower.contains("response contained no message or tool call")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_backoff_doubles_from_initial_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(5), Duration::from_secs(16));
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_transient_error("HTTP 429 Too Many Requests"));
        assert!(is_transient_error("error sending request for url"));
        assert!(is_transient_error("RESOURCE_EXHAUSTED: quota"));
        assert!(!is_transient_error("401 Unauthorized: invalid api key"));
        assert!(!is_transient_error("400 Bad Request"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_until_success() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let start = tokio::time::Instant::now();

        let result: Result<&str, String> = retry_transient(
            RetryPolicy::default(),
            "test",
            |e: &String| is_transient_error(e),
            move || async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err("503 Service Unavailable".to_string())
                } else {
                    Ok("done")
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s + 2s of paused-clock backoff
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), String> = retry_transient(
            RetryPolicy::default(),
            "test",
            |_: &String| true,
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("timeout".to_string())
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let result: Result<(), String> = retry_transient(
            RetryPolicy::default(),
            "test",
            |e: &String| is_transient_error(e),
            move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err("401 Unauthorized".to_string())
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "401 Unauthorized");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
