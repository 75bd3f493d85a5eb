//! JSON record parsing for `jc --dmidecode` output.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::DmiRecord;
use crate::error::{InventoryError, Result};

/// Wire shape of one filter record. Extra keys (`handle`, `type`, `bytes`)
/// are ignored.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    description: Value,
    #[serde(default)]
    values: Value,
}

/// Parses a JSON array of `{description, values}` records.
///
/// Source order is preserved and repeated descriptions are kept as separate
/// records. A non-string `description` reads as empty. Records whose
/// `values` is absent or not an object (header-only entries) are skipped.
///
/// # Errors
///
/// Returns [`InventoryError::Json`] when the input is not valid JSON or an
/// element is not an object, and [`InventoryError::Parse`] when the top
/// level is not an array.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::dmi::parse_dmi_records;
///
/// let json = r#"[
///   {"description": "Memory Device", "values": {"size": "16 GB"}},
///   {"description": "Memory Device", "values": {"size": "32 GB"}}
/// ]"#;
/// let records = parse_dmi_records(json).unwrap();
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[1].values["size"], "32 GB");
/// ```
pub fn parse_dmi_records(output: &str) -> Result<Vec<DmiRecord>> {
    let top: Value = serde_json::from_str(output)?;
    if !top.is_array() {
        return Err(InventoryError::Parse(
            "dmidecode JSON output is not an array of records".to_string(),
        ));
    }
    let raw: Vec<RawRecord> = serde_json::from_value(top)?;

    let mut records = Vec::with_capacity(raw.len());
    for (index, record) in raw.into_iter().enumerate() {
        let description = match record.description {
            Value::String(text) => text,
            _ => String::new(),
        };
        let Value::Object(values) = record.values else {
            debug!(index, description = %description, "Skipping record without values");
            continue;
        };
        records.push(DmiRecord {
            description,
            values,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_order_and_repeats() {
        let json = r#"[
          {"handle": "0x0011", "type": 4, "bytes": 48, "description": "Processor Information",
           "values": {"socket_designation": "CPU1", "core_count": "10"}},
          {"handle": "0x0012", "type": 4, "bytes": 48, "description": "Processor Information",
           "values": {"socket_designation": "CPU2", "core_count": "12"}}
        ]"#;
        let records = parse_dmi_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].values["socket_designation"], "CPU1");
        assert_eq!(records[1].values["core_count"], "12");
    }

    #[test]
    fn test_skips_records_without_values_object() {
        let json = r#"[
          {"description": "End Of Table", "values": null},
          {"description": "Inactive"},
          {"description": "BIOS Information", "values": {"vendor": "AMI"}}
        ]"#;
        let records = parse_dmi_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "BIOS Information");
    }

    #[test]
    fn test_non_string_description_reads_empty() {
        let records = parse_dmi_records(r#"[{"description": 7, "values": {}}]"#).unwrap();
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn test_keeps_non_string_values() {
        let json = r#"[{"description": "Memory Device", "values": {"size": 16384, "flags": ["a"]}}]"#;
        let records = parse_dmi_records(json).unwrap();
        assert_eq!(records[0].values["size"], 16384);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = parse_dmi_records("[{\"description\": ").unwrap_err();
        assert!(matches!(err, InventoryError::Json(_)));
    }

    #[test]
    fn test_top_level_object_is_parse_error() {
        let err = parse_dmi_records(r#"{"description": "BIOS Information"}"#).unwrap_err();
        assert!(matches!(err, InventoryError::Parse(_)));
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_dmi_records("[]").unwrap().is_empty());
    }
}
