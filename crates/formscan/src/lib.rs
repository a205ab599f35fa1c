//! FormScan - form field extraction from web pages
//!
//! This crate fetches an HTML document and returns the fields of its
//! forms as a flat, ordered list of [`FormField`] records.
//!
//! ```no_run
//! # async fn run() -> Result<(), formscan::FormExtractionError> {
//! let extractor = formscan::FormExtractor::new("https://example.com/login")?;
//! for field in extractor.extract().await? {
//!     println!("{} {} {}", field.name, field.field_type, field.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Traversal
//!
//! Every `<form>` element is walked depth-first, pre-order. Each element
//! whose tag equals the match tag (by default [`DEFAULT_MATCH_TAG`])
//! yields one record with its `id`, `name`, `type` and `value` attributes;
//! missing attributes become empty strings.
//!
//! ## Fetchers
//!
//! The network read goes through a [`DocumentFetcher`]. [`HttpFetcher`] is
//! used unless another one is supplied to the builder.

mod error;
mod extract;
mod extractor;
pub mod fetchers;
mod types;

pub use error::{AddressError, FetchError, FormExtractionError, ParseError};
pub use extract::extract_fields;
pub use extractor::{extract, ExtractOptions, FormExtractor, FormExtractorBuilder};
pub use fetchers::{DocumentFetcher, HttpFetcher};
pub use types::FormField;

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "FormScan/1.0";

/// Tag name collected as a field unless configured otherwise
pub const DEFAULT_MATCH_TAG: &str = "input";

/// JSON schema of a single [`FormField`] record
pub fn field_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(FormField);
    serde_json::to_value(schema).unwrap_or_default()
}
