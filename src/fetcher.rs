//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the HTTP client with the fixed user agent and timeout
//! - GET requests for text (pages, stylesheets) and binary (images) bodies
//! - Retry logic with exponential backoff for transient failures
//! - Error classification

use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Browser-like user agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                              AppleWebKit/537.36 (KHTML, like Gecko) \
                              Chrome/124.0 Safari/537.36";

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Total number of attempts per fetch (first try included)
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on every further attempt
pub const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Status codes that are retried
pub const RETRYABLE_STATUSES: &[u16] = &[408, 429, 500, 502, 503, 504];

/// Reasons a fetch produced no body
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx status that is not worth retrying
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Every attempt hit a transient failure
    #[error("gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    /// Any other client failure (invalid URL, TLS, redirect loop, ...)
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// A binary body together with its declared content type
#[derive(Debug, Clone)]
pub struct FetchedBytes {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Outcome of a single attempt inside the retry loop
enum Attempt<T> {
    Done(T),
    Retry(String),
    Fail(FetchError),
}

/// Builds the HTTP client shared by all fetches
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrying HTTP GET for text and binary content
///
/// Holds only immutable configuration; clones share the same connection pool
/// and can be used concurrently.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    backoff_base: Duration,
}

impl Fetcher {
    /// Creates a fetcher with the standard client and backoff
    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client()?))
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            backoff_base: BACKOFF_BASE,
        }
    }

    /// Overrides the delay before the first retry
    pub fn with_backoff_base(mut self, backoff_base: Duration) -> Self {
        self.backoff_base = backoff_base;
        self
    }

    /// Delay after the given zero-based attempt: base, 2*base, 4*base, ...
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt)
    }

    /// Fetches a URL and decodes the body as text
    ///
    /// The body is decoded with the charset declared by the server, falling
    /// back to UTF-8.
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.fetch_with_retry(url, |response| async move {
            response.text().await
        })
        .await
    }

    /// Fetches a URL and returns the raw body plus its `Content-Type`
    pub async fn fetch_bytes(&self, url: &str) -> Result<FetchedBytes, FetchError> {
        self.fetch_with_retry(url, |response| async move {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>(FetchedBytes {
                bytes: bytes.to_vec(),
                content_type,
            })
        })
        .await
    }

    /// Runs the GET/read cycle up to `MAX_ATTEMPTS` times
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Read body, done |
    /// | HTTP 408, 429, 500, 502, 503, 504 | Back off, retry |
    /// | Timeout / connection error | Back off, retry |
    /// | Any other status | Immediate `Status` error |
    /// | Any other client error | Immediate `Request` error |
    async fn fetch_with_retry<T, F, Fut>(&self, url: &str, read: F) -> Result<T, FetchError>
    where
        F: Fn(Response) -> Fut,
        Fut: std::future::Future<Output = Result<T, reqwest::Error>>,
    {
        let mut last = String::new();

        for attempt in 0..MAX_ATTEMPTS {
            match self.attempt(url, &read).await {
                Attempt::Done(value) => return Ok(value),
                Attempt::Fail(err) => {
                    tracing::debug!("Fetch failed for {}: {}", url, err);
                    return Err(err);
                }
                Attempt::Retry(reason) => {
                    last = reason;
                }
            }

            if attempt + 1 < MAX_ATTEMPTS {
                let delay = self.backoff_delay(attempt);
                tracing::warn!(
                    "Transient failure for {} ({}), retrying in {:?} (attempt {}/{})",
                    url,
                    last,
                    delay,
                    attempt + 1,
                    MAX_ATTEMPTS
                );
                tokio::time::sleep(delay).await;
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
            last,
        })
    }

    async fn attempt<T, F, Fut>(&self, url: &str, read: &F) -> Attempt<T>
    where
        F: Fn(Response) -> Fut,
        Fut: std::future::Future<Output = Result<T, reqwest::Error>>,
    {
        tracing::debug!("GET {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(url, e),
        };

        let status = response.status();
        if !status.is_success() {
            if is_retryable(status) {
                return Attempt::Retry(format!("HTTP {}", status.as_u16()));
            }
            return Attempt::Fail(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        match read(response).await {
            Ok(value) => Attempt::Done(value),
            Err(e) => classify_error(url, e),
        }
    }
}

/// Returns true for the status codes that warrant another attempt
pub fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Classifies a client error into retry or immediate failure
fn classify_error<T>(url: &str, e: reqwest::Error) -> Attempt<T> {
    if e.is_timeout() {
        Attempt::Retry("request timeout".to_string())
    } else if e.is_connect() {
        Attempt::Retry(format!("connection error: {}", e))
    } else {
        Attempt::Fail(FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
