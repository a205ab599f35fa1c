//! Form extractor for FormScan
//!
//! This module provides the main entry points: [`FormExtractor`] binds a
//! validated address, and [`extract`] runs a one-off extraction with
//! default options.

use crate::error::{AddressError, FormExtractionError};
use crate::extract::{decode_body, extract_fields};
use crate::fetchers::{DocumentFetcher, HttpFetcher};
use crate::types::FormField;
use crate::DEFAULT_MATCH_TAG;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Connect timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total timeout (connect, response and body)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Extraction options that can be configured via the builder
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Tag name of the elements collected as fields
    pub match_tag: String,
    /// Deadline for establishing the connection
    pub connect_timeout: Duration,
    /// Deadline for the whole request including the body
    pub timeout: Duration,
    /// Fail on any error the HTML parser had to recover from
    pub strict: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            match_tag: DEFAULT_MATCH_TAG.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
            strict: false,
        }
    }
}

/// Fetch `address` once and extract its form fields with default options
///
/// For custom options, use [`FormExtractor::builder`].
pub async fn extract(address: &str) -> Result<Vec<FormField>, FormExtractionError> {
    FormExtractor::new(address)?.extract().await
}

/// Validate an address: a URL with an http(s) scheme and a host
fn parse_address(address: &str) -> Result<Url, AddressError> {
    let url = Url::parse(address.trim()).map_err(AddressError::Malformed)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AddressError::UnsupportedScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(AddressError::MissingHost),
    }
}

/// Builder for configuring a [`FormExtractor`]
///
/// The address is validated in [`build`](Self::build), never earlier.
pub struct FormExtractorBuilder {
    address: String,
    options: ExtractOptions,
    fetcher: Option<Arc<dyn DocumentFetcher>>,
}

impl FormExtractorBuilder {
    fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            options: ExtractOptions::default(),
            fetcher: None,
        }
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set the tag name collected as fields
    pub fn match_tag(mut self, tag: impl Into<String>) -> Self {
        self.options.match_tag = tag.into();
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set the total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = timeout;
        self
    }

    /// Reject documents the parser had to repair
    pub fn strict(mut self, strict: bool) -> Self {
        self.options.strict = strict;
        self
    }

    /// Replace all options at once
    pub fn options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a custom document fetcher instead of [`HttpFetcher`]
    pub fn fetcher(mut self, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Validate the address and build the extractor
    pub fn build(self) -> Result<FormExtractor, FormExtractionError> {
        let url = parse_address(&self.address)?;
        Ok(FormExtractor {
            url,
            options: self.options,
            fetcher: self
                .fetcher
                .unwrap_or_else(|| Arc::new(HttpFetcher::new())),
        })
    }
}

/// Extracts form fields from the document at one address
///
/// Each call to [`extract`](Self::extract) fetches and parses the document
/// afresh; nothing is cached between calls.
#[derive(Clone)]
pub struct FormExtractor {
    url: Url,
    options: ExtractOptions,
    fetcher: Arc<dyn DocumentFetcher>,
}

impl std::fmt::Debug for FormExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormExtractor")
            .field("url", &self.url.as_str())
            .field("options", &self.options)
            .field("fetcher", &self.fetcher.name())
            .finish()
    }
}

impl FormExtractor {
    /// Create an extractor with default options
    ///
    /// Fails with [`FormExtractionError::InvalidAddress`] if `address` is not
    /// an http(s) URL with a host. No network access happens here.
    pub fn new(address: &str) -> Result<Self, FormExtractionError> {
        Self::builder(address).build()
    }

    /// Create a builder for an extractor bound to `address`
    pub fn builder(address: impl Into<String>) -> FormExtractorBuilder {
        FormExtractorBuilder::new(address)
    }

    /// The validated address
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The options in effect
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Fetch the document and collect its form fields
    ///
    /// Returns every matching element beneath every `<form>`, in document
    /// order. Either the whole sequence is returned or an error; never a
    /// partial result.
    pub async fn extract(&self) -> Result<Vec<FormField>, FormExtractionError> {
        debug!(fetcher = self.fetcher.name(), url = %self.url, "Fetching document");

        let body = self
            .fetcher
            .fetch(&self.url, &self.options)
            .await
            .inspect_err(|e| warn!(url = %self.url, error = %e, "Fetch failed"))?;

        let text = decode_body(body)
            .inspect_err(|e| warn!(url = %self.url, error = %e, "Parse failed"))?;
        let fields = extract_fields(&text, &self.options)
            .inspect_err(|e| warn!(url = %self.url, error = %e, "Parse failed"))?;
        Ok(fields)
    }
}
