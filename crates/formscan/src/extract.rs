//! Document parsing and form field traversal
//!
//! Design: the parsed tree lives only inside [`extract_fields`]. Every
//! `<form>` element is walked depth-first, pre-order, and each element
//! whose tag equals the match tag becomes one [`FormField`].

use crate::error::ParseError;
use crate::extractor::ExtractOptions;
use crate::types::FormField;
use bytes::Bytes;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Tag name of the elements whose subtrees are scanned
const FORM_TAG: &str = "form";

/// Extract form fields from an HTML document string
///
/// Runs the same parse and traversal as
/// [`FormExtractor::extract`](crate::FormExtractor::extract) without any
/// network access.
pub fn extract_fields(
    html: &str,
    options: &ExtractOptions,
) -> Result<Vec<FormField>, ParseError> {
    let document = parse_document(html, options.strict)?;
    let fields = collect_fields(&document, &options.match_tag);
    debug!(
        match_tag = %options.match_tag,
        count = fields.len(),
        "Collected form fields"
    );
    Ok(fields)
}

/// Decode a fetched body as UTF-8 text
pub(crate) fn decode_body(body: Bytes) -> Result<String, ParseError> {
    String::from_utf8(body.to_vec()).map_err(ParseError::InvalidEncoding)
}

/// Parse text into a document tree
///
/// html5ever recovers from nearly any input; in strict mode the errors it
/// recorded while recovering are reported instead.
fn parse_document(html: &str, strict: bool) -> Result<Html, ParseError> {
    let document = Html::parse_document(html);
    if strict && !document.errors.is_empty() {
        let errors = document.errors.iter().map(|e| e.to_string()).collect();
        return Err(ParseError::Malformed { errors });
    }
    Ok(document)
}

/// Collect fields beneath every form, forms taken in document order
fn collect_fields(document: &Html, match_tag: &str) -> Vec<FormField> {
    let mut fields = Vec::new();
    let forms = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name().eq_ignore_ascii_case(FORM_TAG));

    for form in forms {
        visit(form, match_tag, &mut fields);
    }
    fields
}

/// Pre-order walk over `form` and its element descendants
///
/// Uses an explicit stack so nesting depth is bounded by memory, not by
/// the thread stack. Children are pushed in reverse to pop in order.
fn visit(form: ElementRef<'_>, match_tag: &str, fields: &mut Vec<FormField>) {
    let mut stack = vec![form];
    while let Some(element) = stack.pop() {
        if element.value().name().eq_ignore_ascii_case(match_tag) {
            fields.push(FormField::from_element(element));
        }
        stack.extend(element.children().rev().filter_map(ElementRef::wrap));
    }
}
