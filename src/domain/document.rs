//! Quote and fragment documents
//!
//! A quote document is a JSON object identified by a configurable key field.
//! Fragments carry the key field, one extracted subtree and, when present in
//! the source, the tracking subtree.

use crate::domain::errors::SplitterError;
use crate::domain::Result;
use serde_json::{Map, Value};

/// A parsed composite quote document
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDocument {
    fields: Map<String, Value>,
}

impl QuoteDocument {
    /// Parses raw object bytes
    ///
    /// # Errors
    ///
    /// Returns [`SplitterError::Content`] if the bytes are not UTF-8 JSON or
    /// the top-level value is not an object.
    pub fn parse(path: &str, bytes: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(bytes).map_err(|e| SplitterError::Content {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(SplitterError::Content {
                path: path.to_string(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Top-level field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether the document has a top-level field, whatever its value
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Identity of the document
    ///
    /// Missing and falsy values (`null`, `false`, `0`, `""`, `[]`, `{}`) yield `None`.
    pub fn key_value(&self, key_field: &str) -> Option<&Value> {
        self.get(key_field).filter(|v| is_truthy(v))
    }
}

/// A derived per-object document
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDocument {
    object_name: String,
    body: Map<String, Value>,
}

impl FragmentDocument {
    /// Builds `{ key_field, object_name, tracking? }` in that order
    pub fn build(
        key_field: &str,
        key_value: &Value,
        object_name: &str,
        subtree: &Value,
        tracking: Option<(&str, &Value)>,
    ) -> Self {
        let mut body = Map::new();
        body.insert(key_field.to_string(), key_value.clone());
        body.insert(object_name.to_string(), subtree.clone());
        if let Some((tracking_field, tracking_value)) = tracking {
            body.insert(tracking_field.to_string(), tracking_value.clone());
        }

        Self {
            object_name: object_name.to_string(),
            body,
        }
    }

    /// Name of the extracted object
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Fragment content
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Pretty-printed UTF-8 JSON with two-space indentation
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.body)?)
    }
}

/// Truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Text form of a key value for use in object names
///
/// Strings are used verbatim, other values as their JSON text.
pub fn key_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let doc = QuoteDocument::parse("q.json", br#"{"QuoteId":"Q1","Pricing":{}}"#).unwrap();
        assert!(doc.contains("Pricing"));
        assert_eq!(doc.get("QuoteId"), Some(&json!("Q1")));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = QuoteDocument::parse("q.json", b"{not json").unwrap_err();
        assert!(matches!(err, SplitterError::Content { .. }));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = QuoteDocument::parse("q.json", b"[1,2,3]").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_key_value_falsy() {
        for raw in [
            r#"{"QuoteId":""}"#,
            r#"{"QuoteId":null}"#,
            r#"{"QuoteId":0}"#,
            r#"{"QuoteId":false}"#,
            r#"{"QuoteId":[]}"#,
            r#"{"QuoteId":{}}"#,
            r#"{"Other":"Q1"}"#,
        ] {
            let doc = QuoteDocument::parse("q.json", raw.as_bytes()).unwrap();
            assert!(doc.key_value("QuoteId").is_none(), "{raw} should be unkeyed");
        }
    }

    #[test]
    fn test_key_value_truthy() {
        let doc = QuoteDocument::parse("q.json", br#"{"QuoteId":42}"#).unwrap();
        assert_eq!(doc.key_value("QuoteId"), Some(&json!(42)));
    }

    #[test]
    fn test_fragment_field_order() {
        let fragment = FragmentDocument::build(
            "QuoteId",
            &json!("Q1"),
            "Pricing",
            &json!({"amount": 10}),
            Some(("Tracking", &json!({"agent": "x"}))),
        );
        let keys: Vec<&String> = fragment.body().keys().collect();
        assert_eq!(keys, ["QuoteId", "Pricing", "Tracking"]);
        assert_eq!(fragment.object_name(), "Pricing");
    }

    #[test]
    fn test_fragment_bytes_are_pretty_utf8() {
        let fragment =
            FragmentDocument::build("QuoteId", &json!("Q1"), "Notes", &json!("café"), None);
        let text = String::from_utf8(fragment.to_bytes().unwrap()).unwrap();
        assert_eq!(text, "{\n  \"QuoteId\": \"Q1\",\n  \"Notes\": \"café\"\n}");
    }

    #[test]
    fn test_key_display() {
        assert_eq!(key_display(&json!("Q1")), "Q1");
        assert_eq!(key_display(&json!(42)), "42");
    }
}
