//! Section routing into the report model.
//!
//! Singleton sections are matched by exact title. Repeating sections are
//! matched by prefix, because flat text may number repeated titles while the
//! JSON filter repeats the bare title verbatim. Anything else is ignored.

use hw_inventory_core::{
    BaseboardInfo, BiosInfo, ChassisInfo, MemoryInfo, OnboardDeviceInfo, PowerSupplyInfo,
    ProcessorInfo, SystemInfo, SystemReport, SystemSlotInfo,
};
use tracing::trace;

use super::DmiRecord;
use super::fields::{field, field_or};

/// Destination entity for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Bios,
    System,
    Baseboard,
    Chassis,
    Processor,
    Memory,
    SystemSlot,
    PowerSupply,
    OnboardDevice,
}

const EXACT_TITLES: &[(&str, SectionKind)] = &[
    ("BIOS Information", SectionKind::Bios),
    ("System Information", SectionKind::System),
    ("Base Board Information", SectionKind::Baseboard),
    ("Chassis Information", SectionKind::Chassis),
];

const PREFIX_TITLES: &[(&str, SectionKind)] = &[
    ("Processor Information", SectionKind::Processor),
    ("Memory Device", SectionKind::Memory),
    ("System Slot", SectionKind::SystemSlot),
    ("System Power Supply", SectionKind::PowerSupply),
    ("Onboard Device", SectionKind::OnboardDevice),
    ("On Board Device", SectionKind::OnboardDevice),
];

// Distinct SMBIOS structures that share a routed prefix.
const EXCLUDED_TITLES: &[&str] = &["Memory Device Mapped Address"];

impl SectionKind {
    /// Routes a section title or record description.
    ///
    /// # Examples
    ///
    /// ```
    /// use hw_inventory_collect::dmi::SectionKind;
    ///
    /// assert_eq!(SectionKind::classify("BIOS Information"), Some(SectionKind::Bios));
    /// assert_eq!(SectionKind::classify("Memory Device 3"), Some(SectionKind::Memory));
    /// assert_eq!(SectionKind::classify("Cache Information"), None);
    /// ```
    pub fn classify(title: &str) -> Option<Self> {
        let title = title.trim();
        if let Some((_, kind)) = EXACT_TITLES.iter().find(|(exact, _)| *exact == title) {
            return Some(*kind);
        }
        if EXCLUDED_TITLES.iter().any(|excluded| title.starts_with(excluded)) {
            return None;
        }
        PREFIX_TITLES
            .iter()
            .find(|(prefix, _)| title.starts_with(prefix))
            .map(|(_, kind)| *kind)
    }

    /// Returns `true` for kinds that append to a sequence.
    pub fn is_repeating(self) -> bool {
        !matches!(
            self,
            Self::Bios | Self::System | Self::Baseboard | Self::Chassis
        )
    }
}

/// Maps one record into `report`.
///
/// Singletons are replaced, repeating kinds are appended. Returns the kind
/// the record was routed to, or `None` (leaving the report untouched) when
/// the description is not recognized.
pub fn apply_record(report: &mut SystemReport, record: &DmiRecord) -> Option<SectionKind> {
    let Some(kind) = SectionKind::classify(&record.description) else {
        trace!(description = %record.description, "Ignoring unclassified section");
        return None;
    };
    let values = &record.values;

    match kind {
        SectionKind::Bios => {
            report.bios = BiosInfo {
                vendor: field(values, "vendor"),
                version: field(values, "version"),
                release_date: field(values, "release_date"),
            };
        }
        SectionKind::System => {
            report.system = SystemInfo {
                manufacturer: field(values, "manufacturer"),
                product_name: field(values, "product_name"),
                version: field(values, "version"),
                serial_number: field(values, "serial_number"),
                uuid: field(values, "uuid"),
                family: field(values, "family"),
            };
        }
        SectionKind::Baseboard => {
            report.baseboard = BaseboardInfo {
                manufacturer: field(values, "manufacturer"),
                product_name: field(values, "product_name"),
                version: field(values, "version"),
                serial_number: field(values, "serial_number"),
                asset_tag: field(values, "asset_tag"),
            };
        }
        SectionKind::Chassis => {
            report.chassis = ChassisInfo {
                manufacturer: field(values, "manufacturer"),
                chassis_type: field(values, "type"),
                version: field(values, "version"),
                serial_number: field(values, "serial_number"),
                asset_tag: field(values, "asset_tag"),
            };
        }
        SectionKind::Processor => report.processors.push(ProcessorInfo {
            family: field(values, "family"),
            manufacturer: field(values, "manufacturer"),
            version: field(values, "version"),
            frequency: field(values, "current_speed"),
            cores: field(values, "core_count"),
            threads: field(values, "thread_count"),
        }),
        SectionKind::Memory => report.memory.push(MemoryInfo {
            model: field(values, "part_number"),
            size: field(values, "size"),
            speed: field(values, "speed"),
            slot: field(values, "locator"),
        }),
        SectionKind::SystemSlot => report.system_slots.push(SystemSlotInfo {
            slot_type: field(values, "type"),
            usage: field(values, "current_usage"),
            status: field(values, "status"),
            bus_address: field(values, "bus_address"),
            designation: field(values, "designation"),
        }),
        SectionKind::PowerSupply => report.system_power_supplies.push(PowerSupplyInfo {
            power_unit_group: field(values, "power_unit_group"),
            location: field(values, "location"),
            name: field(values, "name"),
            manufacturer: field(values, "manufacturer"),
            asset_tag: field(values, "asset_tag"),
            model_part_number: field(values, "model_part_number"),
            max_power_capacity: field(values, "max_power_capacity"),
            status: field(values, "status"),
            supply_type: field(values, "type"),
            plugged: field(values, "plugged"),
            hot_replaceable: field(values, "hot_replaceable"),
            cooling_device_handle: field(values, "cooling_device_handle"),
        }),
        // Legacy type 10 entries carry a `Description` instead of a
        // reference designation.
        SectionKind::OnboardDevice => report.onboard_devices.push(OnboardDeviceInfo {
            reference_designation: field_or(values, "reference_designation", "description"),
            device_type: field(values, "type"),
            status: field(values, "status"),
            type_instance: field(values, "type_instance"),
        }),
    }

    Some(kind)
}

/// Folds records into a fresh report in sequence order.
pub fn build_report<'a, I>(records: I) -> SystemReport
where
    I: IntoIterator<Item = &'a DmiRecord>,
{
    let mut report = SystemReport::default();
    for record in records {
        apply_record(&mut report, record);
    }
    report
}
