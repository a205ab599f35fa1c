//! HTTP document fetcher
//!
//! Performs a single GET and reads the whole body. Non-2xx statuses and
//! deadline overruns are errors; nothing is retried.

use crate::error::FetchError;
use crate::extractor::ExtractOptions;
use crate::fetchers::DocumentFetcher;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Accept header sent with every request
const ACCEPT_HTML: &str = "text/html, application/xhtml+xml, */*;q=0.8";

/// Stand-in deadline for timeouts too large to add to the clock (30 years)
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Default HTTP fetcher
pub struct HttpFetcher;

impl HttpFetcher {
    /// Create a new HTTP fetcher
    pub fn new() -> Self {
        Self
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url, options: &ExtractOptions) -> Result<Bytes, FetchError> {
        // Build headers
        let mut headers = HeaderMap::new();
        let user_agent = options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(FetchError::ClientBuildError)?;

        let deadline = deadline_after(options.timeout);

        let response = tokio::time::timeout_at(deadline, client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Received response");
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Non-success status");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = read_body_until(response, deadline).await?;
        debug!(url = %url, size = body.len(), "Read response body");
        Ok(body)
    }
}

/// Deadline `timeout` from now, saturating far in the future on overflow
fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Read the complete response body, failing if `deadline` passes first
async fn read_body_until(
    response: reqwest::Response,
    deadline: Instant,
) -> Result<Bytes, FetchError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    loop {
        let chunk_future = stream.next();
        let timeout_future = tokio::time::sleep_until(deadline);

        tokio::select! {
            chunk = chunk_future => {
                match chunk {
                    Some(Ok(bytes)) => {
                        body.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        warn!("Error reading body chunk: {}", e);
                        return Err(FetchError::BodyReadError(e));
                    }
                    None => {
                        return Ok(Bytes::from(body));
                    }
                }
            }
            _ = timeout_future => {
                warn!(received = body.len(), "Body timeout reached, discarding partial content");
                return Err(FetchError::Timeout);
            }
        }
    }
}
