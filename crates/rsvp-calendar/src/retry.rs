//! Transport-level retry for the HTTP item service.
//!
//! Creating a response item is not idempotent: a send that timed out may
//! already have gone out. Only failures where the server cannot have acted on
//! the request are retried:
//! - connection failures (request never delivered)
//! - 429 Too Many Requests and 503 Service Unavailable (request refused)
//!
//! Timeouts and other 5xx responses are returned to the caller as-is.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use rsvp_core::RetrySettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            initial_delay: Duration::from_millis(settings.initial_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms),
        }
    }
}

impl RetryConfig {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Decide whether a transport error left the request undelivered.
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_connect() {
        tracing::debug!("Connection error, request was not delivered");
        return RetryDecision::Retry;
    }

    if error.is_timeout() {
        tracing::debug!("Request timed out, outcome unknown, not retrying");
    }

    RetryDecision::NoRetry
}

/// Decide whether the server refused the request without processing it.
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    match status {
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE => {
            tracing::debug!("Server refused request ({}), will retry", status);
            RetryDecision::Retry
        }
        _ => RetryDecision::NoRetry,
    }
}

/// Run `operation` until it succeeds, fails permanently, or retries run out.
///
/// When retries run out on a refused status, the last response is returned
/// so the caller can map it.
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        let outcome = operation().await;
        let exhausted = attempt >= config.max_retries;

        let retry = match &outcome {
            Ok(response) => is_retryable_status(response.status()) == RetryDecision::Retry,
            Err(e) => is_retryable_error(e) == RetryDecision::Retry,
        };

        if !retry || exhausted {
            if retry {
                tracing::error!("All {} attempts exhausted", config.max_retries + 1);
            } else if attempt > 0 && outcome.is_ok() {
                tracing::info!("Request completed after {} retries", attempt);
            }
            return outcome;
        }

        let delay = config.delay_for_attempt(attempt);
        attempt += 1;
        tracing::warn!(
            "Retry attempt {} of {}, waiting {:?}",
            attempt,
            config.max_retries,
            delay
        );
        tokio::time::sleep(delay).await;
    }
}
