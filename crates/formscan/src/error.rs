//! Error types for FormScan

use thiserror::Error;

/// Reasons an address is rejected at construction time
#[derive(Debug, Error)]
pub enum AddressError {
    /// Text could not be parsed as a URL
    #[error("malformed URL: {0}")]
    Malformed(#[source] url::ParseError),

    /// URL parsed but uses a scheme other than http or https
    #[error("unsupported scheme '{0}': must be http or https")]
    UnsupportedScheme(String),

    /// URL has no host component
    #[error("URL has no host")]
    MissingHost,
}

/// Errors that can occur while retrieving the document body
#[derive(Debug, Error)]
pub enum FetchError {
    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request or body read exceeded the configured deadline
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Server returned HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Response stream failed part way through
    #[error("Failed to read response body")]
    BodyReadError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus {
                status: status.as_u16(),
            }
        } else if err.is_body() || err.is_decode() {
            FetchError::BodyReadError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors that can occur while turning the body into a document tree
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body bytes are not valid UTF-8
    #[error("Document is not valid UTF-8")]
    InvalidEncoding(#[source] std::string::FromUtf8Error),

    /// Parser reported errors and strict parsing was requested
    #[error("Malformed document: {}", summarize(.errors))]
    Malformed { errors: Vec<String> },
}

fn summarize(errors: &[String]) -> String {
    let first = errors.first().map(String::as_str).unwrap_or("unknown error");
    format!("{} ({} parser error(s))", first, errors.len())
}

/// Error reported by [`FormExtractor`](crate::FormExtractor)
///
/// Every failure of construction or extraction is one of these variants.
/// The message names the stage only; the specific cause is the
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum FormExtractionError {
    /// Address rejected before any network access
    #[error("Invalid address")]
    InvalidAddress(#[from] AddressError),

    /// Document could not be retrieved
    #[error("Fetch failed")]
    Fetch(#[from] FetchError),

    /// Document could not be parsed
    #[error("Parse failed")]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            AddressError::UnsupportedScheme("ftp".to_string()).to_string(),
            "unsupported scheme 'ftp': must be http or https"
        );
        assert_eq!(AddressError::MissingHost.to_string(), "URL has no host");
        assert_eq!(FetchError::Timeout.to_string(), "Request timed out");
        assert_eq!(
            FetchError::HttpStatus { status: 404 }.to_string(),
            "Server returned HTTP status 404"
        );
    }

    #[test]
    fn test_malformed_message_reports_first_error() {
        let err = ParseError::Malformed {
            errors: vec!["Unexpected token".to_string(), "Bad DOCTYPE".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Malformed document: Unexpected token (2 parser error(s))"
        );
    }

    #[test]
    fn test_wrapper_keeps_source() {
        let err = FormExtractionError::from(FetchError::HttpStatus { status: 500 });
        assert_eq!(err.to_string(), "Fetch failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Server returned HTTP status 500"));

        let err = FormExtractionError::from(AddressError::MissingHost);
        assert_eq!(err.to_string(), "Invalid address");
        assert!(matches!(
            err,
            FormExtractionError::InvalidAddress(AddressError::MissingHost)
        ));
    }

    #[test]
    fn test_invalid_encoding_from_utf8_error() {
        let utf8_err = String::from_utf8(vec![0xff, 0xfe]).unwrap_err();
        let err = FormExtractionError::from(ParseError::InvalidEncoding(utf8_err));
        assert_eq!(err.to_string(), "Parse failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Document is not valid UTF-8"));
    }
}
