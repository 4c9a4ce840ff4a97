//! Resilient HTTP transport
//!
//! [`ResilientTransport`] performs one logical request with automatic retry
//! and exponential backoff. It knows nothing about pagination or animals;
//! callers hand it a method, a URL and an optional JSON body.

use crate::config::{RetryConfig, SourceConfig};
use crate::domain::{FaunaError, Result, TransportError};
use crate::log_retry_attempt;
use rand::Rng;
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::watch;

/// Longest upstream body excerpt kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Retry and backoff policy
///
/// The delay before attempt `n + 1` is `base_delay * backoff_factor^(n - 1)`,
/// capped at `max_delay`. With jitter enabled the capped delay is scaled by a
/// uniform factor in `[0.5, 1.0]`, so the cap always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Attempts per logical request, including the first
    pub max_attempts: u32,
    /// Delay after the first failure
    pub base_delay: Duration,
    /// Ceiling for any single delay
    pub max_delay: Duration,
    /// Multiplier applied per failed attempt
    pub backoff_factor: f64,
    /// Randomize delays downwards
    pub jitter: bool,
    /// HTTP statuses treated as transient
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    /// Build a policy from the `[retry]` configuration section
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: config.base_delay(),
            max_delay: config.max_delay(),
            backoff_factor: config.backoff_factor,
            jitter: config.jitter,
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    /// Deterministic (jitter-free) delay after `failed_attempts` failures
    pub fn delay_for_attempt(&self, failed_attempts: u32) -> Duration {
        if self.base_delay.is_zero() {
            return Duration::ZERO;
        }

        let exponent = failed_attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        let max_secs = self.max_delay.as_secs_f64();

        if !secs.is_finite() || secs >= max_secs {
            self.max_delay
        } else {
            Duration::try_from_secs_f64(secs).unwrap_or(self.max_delay)
        }
    }

    /// Delay actually slept after `failed_attempts` failures
    pub fn next_delay(&self, failed_attempts: u32) -> Duration {
        let delay = self.delay_for_attempt(failed_attempts);
        if self.jitter {
            delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0))
        } else {
            delay
        }
    }

    /// Whether a response status should be retried
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Outcome of one attempt that did not succeed
enum AttemptError {
    Transient { status: Option<u16>, message: String },
    Terminal(TransportError),
}

/// HTTP client with retry, backoff and cancellation
///
/// # Example
///
/// ```no_run
/// use fauna::adapters::animals::transport::{ResilientTransport, RetryPolicy};
/// use fauna::config::SourceConfig;
/// use reqwest::Method;
///
/// # async fn example() -> fauna::domain::Result<()> {
/// let transport = ResilientTransport::new(&SourceConfig::default(), RetryPolicy::default())?;
/// let page = transport
///     .execute(Method::GET, "http://localhost:3123/animals/v1/animals?page=1", None)
///     .await?;
/// println!("{page}");
/// # Ok(())
/// # }
/// ```
pub struct ResilientTransport {
    client: Client,
    policy: RetryPolicy,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ResilientTransport {
    /// Create a transport with timeouts taken from the source configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(source: &SourceConfig, policy: RetryPolicy) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(source.timeout())
            .connect_timeout(source.connect_timeout())
            .build()
            .map_err(|e| FaunaError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, policy))
    }

    /// Create a transport around an existing client
    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self {
            client,
            policy,
            shutdown: None,
        }
    }

    /// Abort retry waits once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    fn is_shutdown(&self) -> bool {
        self.shutdown.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Perform one logical request
    ///
    /// A 2xx response yields its JSON body, or `Value::Null` when the body is
    /// empty. Connection failures, timeouts and statuses in the retry set are
    /// retried; anything else fails immediately.
    ///
    /// # Errors
    ///
    /// - [`TransportError::RetriesExhausted`] after `max_attempts` transient failures
    /// - [`TransportError::Status`] for a non-retryable status
    /// - [`TransportError::InvalidResponse`] for a malformed JSON body
    /// - [`TransportError::Cancelled`] if shutdown is signalled
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, TransportError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_status = None;
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if self.is_shutdown() {
                return Err(TransportError::Cancelled {
                    method: method.to_string(),
                    url: url.to_string(),
                    attempts: attempt - 1,
                });
            }

            tracing::debug!(
                method = %method,
                url = %url,
                attempt = attempt,
                max_attempts = max_attempts,
                "Sending request"
            );

            match self.attempt(&method, url, body).await {
                Ok(value) => {
                    tracing::debug!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        "Request succeeded"
                    );
                    return Ok(value);
                }
                Err(AttemptError::Terminal(err)) => {
                    tracing::error!(
                        method = %method,
                        url = %url,
                        attempt = attempt,
                        error = %err,
                        "Request failed with non-retryable error"
                    );
                    return Err(err);
                }
                Err(AttemptError::Transient { status, message }) => {
                    last_status = status;
                    last_error = message;

                    if attempt < max_attempts {
                        let delay = self.policy.next_delay(attempt);
                        log_retry_attempt!(method, url, attempt, max_attempts, delay, last_error);

                        if !self.wait(delay).await {
                            tracing::info!(
                                method = %method,
                                url = %url,
                                attempt = attempt,
                                "Retry wait aborted by shutdown"
                            );
                            return Err(TransportError::Cancelled {
                                method: method.to_string(),
                                url: url.to_string(),
                                attempts: attempt,
                            });
                        }
                    }
                }
            }
        }

        tracing::error!(
            method = %method,
            url = %url,
            attempts = max_attempts,
            last_status = ?last_status,
            error = %last_error,
            "All attempts failed"
        );

        Err(TransportError::RetriesExhausted {
            method: method.to_string(),
            url: url.to_string(),
            attempts: max_attempts,
            last_status,
            last_error,
        })
    }

    /// Sleep for `delay`; returns false if shutdown interrupted the wait
    async fn wait(&self, delay: Duration) -> bool {
        let Some(shutdown) = &self.shutdown else {
            tokio::time::sleep(delay).await;
            return true;
        };

        let mut shutdown = shutdown.clone();
        let signalled = async move {
            if shutdown.wait_for(|stop| *stop).await.is_err() {
                // Sender gone: nobody can cancel any more
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            _ = signalled => false,
        }
    }

    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
    ) -> std::result::Result<Value, AttemptError> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return Err(AttemptError::Terminal(TransportError::InvalidRequest {
                    method: method.to_string(),
                    url: url.to_string(),
                    message: e.to_string(),
                }))
            }
            Err(e) => {
                return Err(AttemptError::Transient {
                    status: None,
                    message: describe_send_error(&e),
                })
            }
        };

        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await.map_err(|e| AttemptError::Transient {
                status: Some(status.as_u16()),
                message: format!("Failed to read response body: {e}"),
            })?;

            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }

            return serde_json::from_slice(&bytes).map_err(|e| {
                AttemptError::Terminal(TransportError::InvalidResponse {
                    method: method.to_string(),
                    url: url.to_string(),
                    message: format!("Invalid JSON response: {e}"),
                })
            });
        }

        let code = status.as_u16();
        let text = truncate(response.text().await.unwrap_or_default());

        if self.policy.is_retryable_status(code) {
            Err(AttemptError::Transient {
                status: Some(code),
                message: format!("Server error {code}: {text}"),
            })
        } else {
            Err(AttemptError::Terminal(TransportError::Status {
                method: method.to_string(),
                url: url.to_string(),
                status: code,
                body: text,
            }))
        }
    }
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {err}")
    } else if err.is_connect() {
        format!("Connection failed: {err}")
    } else {
        format!("Request failed: {err}")
    }
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_ERROR_BODY_CHARS {
        text
    } else {
        let mut short: String = text.chars().take(MAX_ERROR_BODY_CHARS).collect();
        short.push('…');
        short
    }
}
