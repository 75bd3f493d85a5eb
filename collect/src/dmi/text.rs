//! Flat dmidecode text parsing.
//!
//! Section titles are unindented lines, fields are indented `Key: Value`
//! lines, and blank lines end a section.

use std::collections::{BTreeMap, HashMap};
use std::ops::Index;

use serde_json::Value;

use super::DmiRecord;

/// Field name to value for one text section.
pub type FieldMap = BTreeMap<String, String>;

/// Text sections in the order their titles first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    entries: Vec<(String, FieldMap)>,
    positions: HashMap<String, usize>,
}

impl Sections {
    /// Starts a block for `title`, discarding fields of an earlier block
    /// with the same title. Returns the block's position.
    fn open(&mut self, title: &str) -> usize {
        if let Some(&position) = self.positions.get(title) {
            self.entries[position].1.clear();
            return position;
        }
        let position = self.entries.len();
        self.entries.push((title.to_string(), FieldMap::new()));
        self.positions.insert(title.to_string(), position);
        position
    }

    pub fn get(&self, title: &str) -> Option<&FieldMap> {
        self.positions
            .get(title)
            .map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldMap)> {
        self.entries
            .iter()
            .map(|(title, fields)| (title.as_str(), fields))
    }
}

impl Index<&str> for Sections {
    type Output = FieldMap;

    fn index(&self, title: &str) -> &FieldMap {
        match self.get(title) {
            Some(fields) => fields,
            None => panic!("no section titled {title:?}"),
        }
    }
}

impl IntoIterator for Sections {
    type Item = (String, FieldMap);
    type IntoIter = std::vec::IntoIter<(String, FieldMap)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Splits flat text into `title -> fields`, in source order.
///
/// An unindented non-blank line opens a section with an empty mapping. A
/// blank line closes it, so indented lines that trail a block are dropped.
/// Indented lines under an open section are split on the first `:`; key and
/// value are trimmed. Indented lines without a `:` (list continuations such
/// as BIOS characteristics) are ignored.
///
/// A title that appears more than once keeps only its last block, at the
/// position of its first appearance. Callers that need every instance of a
/// repeating section rely on dmidecode numbering those titles
/// (`Memory Device 1`, `Memory Device 2`).
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::dmi::parse_key_value_blocks;
///
/// let text = "BIOS Information\n\tVendor: American Megatrends Inc.\n\tVersion: 3.2\n\n";
/// let sections = parse_key_value_blocks(text);
/// assert_eq!(sections["BIOS Information"]["Vendor"], "American Megatrends Inc.");
/// ```
pub fn parse_key_value_blocks(text: &str) -> Sections {
    let mut sections = Sections::default();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            current = None;
            continue;
        }

        if !line.starts_with(char::is_whitespace) {
            current = Some(sections.open(line.trim()));
            continue;
        }

        let Some(position) = current else {
            continue;
        };
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        sections.entries[position]
            .1
            .insert(key.to_string(), value.trim().to_string());
    }

    sections
}

/// Converts a display field name to the JSON filter's key style.
///
/// Trims the name, lower-cases it and replaces each space with `_`. Other
/// punctuation is kept, so `Non-Volatile Size` becomes `non-volatile_size`.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::dmi::normalize_key;
///
/// assert_eq!(normalize_key("Release Date"), "release_date");
/// assert_eq!(normalize_key("UUID"), "uuid");
/// assert_eq!(normalize_key("Max Power Capacity"), "max_power_capacity");
/// ```
pub fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(' ', "_")
}

/// Parses flat text into records with normalized field keys.
///
/// Records come out in source order.
pub fn text_records(text: &str) -> Vec<DmiRecord> {
    parse_key_value_blocks(text)
        .into_iter()
        .map(|(title, fields)| DmiRecord {
            description: title,
            values: fields
                .into_iter()
                .map(|(key, value)| (normalize_key(&key), Value::String(value)))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# dmidecode 3.3
Getting SMBIOS data from sysfs.

Handle 0x0000, DMI type 0, 26 bytes
BIOS Information
\tVendor: American Megatrends Inc.
\tVersion: 3.2
\tRelease Date: 10/15/2019
\tCharacteristics:
\t\tPCI is supported
\t\tBIOS is upgradeable

Handle 0x0001, DMI type 1, 27 bytes
System Information
\tManufacturer: Supermicro
\tProduct Name: SYS-1029P-WTR
\tUUID: 00000000-0000-0000-0000-AC1F6B8A1B2C
";

    #[test]
    fn test_sections_and_fields() {
        let sections = parse_key_value_blocks(SAMPLE);
        let bios = &sections["BIOS Information"];
        assert_eq!(bios["Vendor"], "American Megatrends Inc.");
        assert_eq!(bios["Release Date"], "10/15/2019");
        assert_eq!(bios["Characteristics"], "");
        assert!(!bios.contains_key("PCI is supported"));

        let system = &sections["System Information"];
        assert_eq!(system["Product Name"], "SYS-1029P-WTR");
        assert_eq!(system["UUID"], "00000000-0000-0000-0000-AC1F6B8A1B2C");
    }

    #[test]
    fn test_handle_lines_become_empty_sections() {
        let sections = parse_key_value_blocks(SAMPLE);
        assert!(sections["Handle 0x0000, DMI type 0, 26 bytes"].is_empty());
        assert!(sections["# dmidecode 3.3"].is_empty());
    }

    #[test]
    fn test_value_split_on_first_colon_only() {
        let text = "System Boot Information\n\tStatus: Time: 12:30:00\n";
        let sections = parse_key_value_blocks(text);
        assert_eq!(sections["System Boot Information"]["Status"], "Time: 12:30:00");
    }

    #[test]
    fn test_blank_line_drops_trailing_indented_lines() {
        let text = "Chassis Information\n\tType: Rack Mount Chassis\n\n\tLock: Not Present\n";
        let sections = parse_key_value_blocks(text);
        let chassis = &sections["Chassis Information"];
        assert_eq!(chassis.len(), 1);
        assert!(!chassis.contains_key("Lock"));
    }

    #[test]
    fn test_indented_line_before_any_section_is_ignored() {
        let sections = parse_key_value_blocks("\tVendor: Nobody\nBIOS Information\n\tVersion: 1\n");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["BIOS Information"]["Version"], "1");
    }

    #[test]
    fn test_repeated_title_keeps_last_block() {
        let text = "\
Memory Device
\tSize: 16 GB
\tLocator: DIMMA1

Memory Device
\tSize: 32 GB
";
        let sections = parse_key_value_blocks(text);
        let memory = &sections["Memory Device"];
        assert_eq!(memory["Size"], "32 GB");
        assert!(!memory.contains_key("Locator"));
    }

    #[test]
    fn test_crlf_input() {
        let sections = parse_key_value_blocks("BIOS Information\r\n\tVendor: AMI\r\n\r\n");
        assert_eq!(sections["BIOS Information"]["Vendor"], "AMI");
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Product Name"), "product_name");
        assert_eq!(normalize_key("Current Speed"), "current_speed");
        assert_eq!(normalize_key("  Type Instance "), "type_instance");
        assert_eq!(normalize_key("Model Part Number"), "model_part_number");
        assert_eq!(normalize_key("Bus Address"), "bus_address");
        assert_eq!(normalize_key("Hot Replaceable"), "hot_replaceable");
    }

    #[test]
    fn test_normalize_key_keeps_punctuation() {
        assert_eq!(normalize_key("Non-Volatile Size"), "non-volatile_size");
        assert_eq!(normalize_key("Wake-up Type"), "wake-up_type");
    }

    #[test]
    fn test_sections_keep_source_order() {
        let text: String = (1..=12)
            .map(|i| format!("Memory Device {i}\n\tLocator: DIMM{i}\n\n"))
            .collect();
        let sections = parse_key_value_blocks(&text);
        let titles: Vec<&str> = sections
            .iter()
            .map(|(title, _)| title)
            .collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("Memory Device {i}")).collect();
        assert_eq!(titles, expected);

        let slots: Vec<String> = text_records(&text)
            .iter()
            .map(|record| record.values["locator"].as_str().unwrap_or_default().to_string())
            .collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("DIMM{i}")).collect();
        assert_eq!(slots, expected);
    }

    #[test]
    fn test_repeated_title_keeps_first_position() {
        let text = "BIOS Information\n\tVendor: A\n\nSystem Information\n\tFamily: X\n\nBIOS Information\n\tVendor: B\n";
        let sections = parse_key_value_blocks(text);
        let titles: Vec<&str> = sections.iter().map(|(title, _)| title).collect();
        assert_eq!(titles, ["BIOS Information", "System Information"]);
        assert_eq!(sections["BIOS Information"]["Vendor"], "B");
    }

    #[test]
    fn test_text_records_normalize_keys() {
        let records = text_records(SAMPLE);
        let bios = records
            .iter()
            .find(|r| r.description == "BIOS Information")
            .unwrap();
        assert_eq!(bios.values["release_date"], "10/15/2019");
        assert_eq!(bios.values["vendor"], "American Megatrends Inc.");
    }
}
