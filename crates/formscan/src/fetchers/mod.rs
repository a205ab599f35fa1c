//! Document fetchers
//!
//! Design: the one network read an extraction performs goes through a
//! [`DocumentFetcher`]. [`HttpFetcher`] is the default; other sources can
//! be plugged in through
//! [`FormExtractorBuilder::fetcher`](crate::FormExtractorBuilder::fetcher).

mod http;

pub use http::HttpFetcher;

use crate::error::FetchError;
use crate::extractor::ExtractOptions;
use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

/// Trait for retrieving the raw document body
///
/// Implementations return the complete body or an error; a partial body is
/// never returned.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Unique identifier for this fetcher (for logging/debugging)
    fn name(&self) -> &'static str;

    /// Fetch the full body at `url`
    async fn fetch(&self, url: &Url, options: &ExtractOptions) -> Result<Bytes, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl DocumentFetcher for StaticFetcher {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch(&self, _url: &Url, _options: &ExtractOptions) -> Result<Bytes, FetchError> {
            Ok(Bytes::from_static(self.0.as_bytes()))
        }
    }

    #[test]
    fn test_fetcher_as_trait_object() {
        let fetcher: Box<dyn DocumentFetcher> = Box::new(StaticFetcher("<form></form>"));
        let url = Url::parse("https://example.com/login").unwrap();
        let options = ExtractOptions::default();

        let body = tokio_test::block_on(fetcher.fetch(&url, &options)).unwrap();
        assert_eq!(fetcher.name(), "static");
        assert_eq!(&body[..], b"<form></form>");
    }

    #[test]
    fn test_http_fetcher_name() {
        assert_eq!(HttpFetcher::new().name(), "http");
    }
}
