//! Hardware inventory (dmidecode) parsing.
//!
//! Two input formats feed the same pipeline:
//!
//! - flat indented text as `dmidecode` prints it ([`text`]), and
//! - the JSON array of `{description, values}` records produced by piping
//!   `dmidecode` through `jc --dmidecode` ([`json`]).
//!
//! Both are reduced to a sequence of [`DmiRecord`]s, which the
//! [`classify`] module routes into a [`SystemReport`] using the tolerant
//! lookups in [`fields`].
//!
//! [`SystemReport`]: hw_inventory_core::SystemReport

pub mod classify;
pub mod fields;
pub mod json;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub use classify::{SectionKind, apply_record, build_report};
pub use fields::{field, field_or};
pub use json::parse_dmi_records;
pub use text::{FieldMap, Sections, normalize_key, parse_key_value_blocks, text_records};

/// Which dmidecode output format to request and parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum DmiInputFormat {
    /// JSON records from the `jc --dmidecode` filter.
    #[default]
    Json,
    /// Raw flat text.
    Text,
}

/// One section of hardware attributes.
///
/// `values` keys follow the JSON filter's naming (`release_date`,
/// `serial_number`); values may be any JSON type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DmiRecord {
    pub description: String,
    pub values: Map<String, Value>,
}

impl DmiRecord {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            values: Map::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

/// Parses raw dmidecode output in the given format into records.
///
/// # Errors
///
/// Returns [`Parse`](crate::InventoryError::Parse) or
/// [`Json`](crate::InventoryError::Json) when JSON input is malformed. Text
/// input never fails.
pub fn parse_dmi_output(output: &str, format: DmiInputFormat) -> Result<Vec<DmiRecord>> {
    match format {
        DmiInputFormat::Json => parse_dmi_records(output),
        DmiInputFormat::Text => Ok(text_records(output)),
    }
}
