//! Tolerant field lookups.
//!
//! Hardware tool output varies by vendor and firmware, so a missing or
//! mistyped field is read as "unknown" (an empty string) rather than an
//! error.

use serde_json::{Map, Value};

/// Returns the string stored under `key`, or `""` when the key is absent or
/// holds a non-string value.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::dmi::field;
/// use serde_json::json;
///
/// let values = json!({"vendor": "AMI", "size": 16384});
/// let values = values.as_object().unwrap();
/// assert_eq!(field(values, "vendor"), "AMI");
/// assert_eq!(field(values, "size"), "");
/// assert_eq!(field(values, "missing"), "");
/// ```
pub fn field(values: &Map<String, Value>, key: &str) -> String {
    values
        .get(key)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .unwrap_or_default()
}

/// Like [`field`], falling back to `fallback` when `key` yields nothing.
pub fn field_or(values: &Map<String, Value>, key: &str, fallback: &str) -> String {
    let primary = field(values, key);
    if primary.is_empty() {
        field(values, fallback)
    } else {
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_missing_and_mistyped_keys_are_empty() {
        let values = map(json!({
            "number": 4,
            "flag": true,
            "list": ["a", "b"],
            "object": {"nested": "x"},
            "null": null,
        }));
        for key in ["absent", "number", "flag", "list", "object", "null"] {
            assert_eq!(field(&values, key), "", "key {key}");
        }
    }

    #[test]
    fn test_string_value_is_returned_verbatim() {
        let values = map(json!({"version": "  3.2 "}));
        assert_eq!(field(&values, "version"), "  3.2 ");
    }

    #[test]
    fn test_field_or_prefers_primary() {
        let values = map(json!({"reference_designation": "LAN1", "description": "Intel i350"}));
        assert_eq!(field_or(&values, "reference_designation", "description"), "LAN1");

        let values = map(json!({"description": "Intel i350"}));
        assert_eq!(field_or(&values, "reference_designation", "description"), "Intel i350");

        let values = map(json!({}));
        assert_eq!(field_or(&values, "reference_designation", "description"), "");
    }
}
