//! Core types for FormScan

use schemars::JsonSchema;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// One form control found in a document
///
/// Attributes absent on the source element are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FormField {
    /// Value of the `id` attribute
    pub id: String,

    /// Value of the `name` attribute
    pub name: String,

    /// Value of the `value` attribute
    pub value: String,

    /// Value of the `type` attribute
    #[serde(rename = "type")]
    pub field_type: String,
}

impl FormField {
    /// Create a field from its four attribute values
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        field_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: value.into(),
            field_type: field_type.into(),
        }
    }

    /// Read the field attributes off a parsed element
    pub(crate) fn from_element(element: ElementRef<'_>) -> Self {
        let attr = |key: &str| element.value().attr(key).unwrap_or_default();
        Self::new(attr("id"), attr("name"), attr("value"), attr("type"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_from_element_reads_attributes() {
        let html = Html::parse_fragment(
            r#"<input id="email" name="user_email" type="email" value="a@b.c">"#,
        );
        let selector = Selector::parse("input").unwrap();
        let element = html.select(&selector).next().unwrap();

        assert_eq!(
            FormField::from_element(element),
            FormField::new("email", "user_email", "a@b.c", "email")
        );
    }

    #[test]
    fn test_from_element_missing_attributes_are_empty() {
        let html = Html::parse_fragment(r#"<input name="q">"#);
        let selector = Selector::parse("input").unwrap();
        let element = html.select(&selector).next().unwrap();

        let field = FormField::from_element(element);
        assert_eq!(field.name, "q");
        assert_eq!(field.id, "");
        assert_eq!(field.value, "");
        assert_eq!(field.field_type, "");
    }

    #[test]
    fn test_field_serialization_uses_type_key() {
        let field = FormField::new("a", "n1", "", "text");
        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains("\"type\":\"text\""));
        assert!(!json.contains("field_type"));

        let back: FormField = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }
}
