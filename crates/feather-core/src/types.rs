//! The generic JSON value tree.
//!
//! `JsonValue` is the pivot between text and typed values: the parser
//! produces it, the encoder consumes it, and the binder converts typed
//! values to and from it. Numbers are always `f64`; objects keep their
//! insertion order so re-encoding reproduces the original key order.

use indexmap::IndexMap;

/// Ordered string-keyed map used for JSON objects.
pub type Map = IndexMap<String, JsonValue>;

/// A JSON document value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    /// Every JSON number, integral or not.
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    /// Key-value pairs in insertion order.
    Object(Map),
}

impl JsonValue {
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// True for `null` and for the literal strings `"null"` / `"undefined"`,
    /// which the binder treats the same way as a missing value.
    pub fn is_null_like(&self) -> bool {
        match self {
            JsonValue::Null => true,
            JsonValue::String(s) => s == "null" || s == "undefined",
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value from an object by key.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Returns the kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

impl From<bool> for JsonValue {
    fn from(b: bool) -> Self {
        JsonValue::Bool(b)
    }
}

impl From<f64> for JsonValue {
    fn from(n: f64) -> Self {
        JsonValue::Number(n)
    }
}

impl From<i32> for JsonValue {
    fn from(n: i32) -> Self {
        JsonValue::Number(f64::from(n))
    }
}

impl From<&str> for JsonValue {
    fn from(s: &str) -> Self {
        JsonValue::String(s.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(s: String) -> Self {
        JsonValue::String(s)
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(items: Vec<JsonValue>) -> Self {
        JsonValue::Array(items)
    }
}

impl From<Map> for JsonValue {
    fn from(map: Map) -> Self {
        JsonValue::Object(map)
    }
}

impl FromIterator<(String, JsonValue)> for JsonValue {
    fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
        JsonValue::Object(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_like() {
        assert!(JsonValue::Null.is_null_like());
        assert!(JsonValue::from("null").is_null_like());
        assert!(JsonValue::from("undefined").is_null_like());
        assert!(!JsonValue::from("nil").is_null_like());
        assert!(!JsonValue::Bool(false).is_null_like());
    }

    #[test]
    fn test_accessors() {
        assert_eq!(JsonValue::Bool(true).as_bool(), Some(true));
        assert_eq!(JsonValue::Number(4.0).as_f64(), Some(4.0));
        assert_eq!(JsonValue::from("x").as_str(), Some("x"));
        assert_eq!(JsonValue::Null.as_str(), None);
    }

    #[test]
    fn test_object_keeps_insertion_order() {
        let value: JsonValue = [
            ("z".to_string(), JsonValue::from(1)),
            ("a".to_string(), JsonValue::from(2)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["z", "a"]);
        assert_eq!(value.get("a"), Some(&JsonValue::Number(2.0)));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(JsonValue::Null.kind(), "null");
        assert_eq!(JsonValue::Number(0.0).kind(), "number");
        assert_eq!(JsonValue::Array(vec![]).kind(), "array");
        assert_eq!(JsonValue::Object(Map::new()).kind(), "object");
    }
}
