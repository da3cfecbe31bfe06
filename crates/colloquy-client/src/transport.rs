//! HTTP transport with timeout, bounded retry and error classification.
//!
//! The retry policy lives in a pure combinator so it can be tested
//! without a network: [`retry_with_backoff`] drives any fallible async
//! operation, consulting [`ColloquyError::is_retryable`] and a
//! [`BackoffPolicy`] between attempts. [`Transport`] is the reqwest
//! executor plugged into that combinator.

use crate::config::ClientConfig;
use colloquy_core::error::{ColloquyError, Result};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;

/// Delay schedule between retries.
///
/// The wait before retry N is `base_delay * N`, so a base of 1000ms
/// produces waits of 1000, 2000, 3000, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffPolicy {
    base_delay: Duration,
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// The wait inserted after the given (1-based) failed attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Runs `operation` until it succeeds, fails terminally, or the retry
/// budget is exhausted.
///
/// Makes at most `max_retries + 1` attempts. Only errors whose
/// [`ColloquyError::is_retryable`] is true consume a retry; any other
/// error is surfaced immediately. The operation receives the 1-based
/// attempt number.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &BackoffPolicy,
    max_retries: u32,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt <= max_retries => {
                let delay = policy.delay_for(attempt);
                tracing::debug!(
                    "[Transport] attempt {attempt} failed ({err}), retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// One request to execute: endpoint, method, optional JSON body and a
/// per-attempt deadline. The deadline resets on every retry.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub timeout: Duration,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value, timeout_ms: u64) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn delete(path: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            method: Method::DELETE,
            path: path.into(),
            body: None,
            timeout: Duration::from_millis(timeout_ms),
        }
    }
}

/// Parameterized request executor over reqwest.
///
/// Stateless apart from the connection pool; performs no caching.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
    max_retries: u32,
    backoff: BackoffPolicy,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            max_retries: config.max_retries,
            backoff: BackoffPolicy::new(Duration::from_millis(config.base_delay_ms)),
        }
    }

    /// Executes the request with retry, returning the decoded payload.
    pub async fn execute<T: DeserializeOwned>(&self, spec: RequestSpec) -> Result<T> {
        retry_with_backoff(&self.backoff, self.max_retries, |_attempt| {
            self.execute_once(&spec)
        })
        .await
    }

    async fn execute_once<T: DeserializeOwned>(&self, spec: &RequestSpec) -> Result<T> {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self
            .client
            .request(spec.method.clone(), &url)
            .timeout(spec.timeout);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.classify_send_error(err, spec))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ColloquyError::http(status.as_u16(), message));
        }

        let body = response
            .text()
            .await
            .map_err(|err| ColloquyError::network(format!("failed to read response body: {err}")))?;
        serde_json::from_str(&body).map_err(|err| {
            ColloquyError::parse(format!("failed to decode response from {}: {err}", spec.path))
        })
    }

    fn classify_send_error(&self, err: reqwest::Error, spec: &RequestSpec) -> ColloquyError {
        if err.is_timeout() {
            ColloquyError::timeout(spec.path.clone(), spec.timeout.as_millis() as u64)
        } else {
            ColloquyError::network(err.to_string())
        }
    }
}
