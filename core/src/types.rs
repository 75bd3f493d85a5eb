//! Report type definitions for hardware inventory snapshots.
//!
//! Every leaf field is a display string exactly as the source tool printed
//! it. Nothing here parses numbers or validates enumerations; an empty string
//! means the source did not report the value.

use serde::{Deserialize, Serialize};

/// BIOS vendor and revision (`BIOS Information`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiosInfo {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
}

/// System identity (`System Information`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub manufacturer: String,
    pub product_name: String,
    pub version: String,
    pub serial_number: String,
    pub uuid: String,
    pub family: String,
}

/// Motherboard identity (`Base Board Information`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseboardInfo {
    pub manufacturer: String,
    pub product_name: String,
    pub version: String,
    pub serial_number: String,
    pub asset_tag: String,
}

/// Enclosure identity (`Chassis Information`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChassisInfo {
    pub manufacturer: String,
    #[serde(rename = "type")]
    pub chassis_type: String,
    pub version: String,
    pub serial_number: String,
    pub asset_tag: String,
}

/// One populated CPU socket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorInfo {
    pub family: String,
    pub manufacturer: String,
    pub version: String,
    /// Current speed as reported (e.g. `2400 MHz`).
    pub frequency: String,
    pub cores: String,
    pub threads: String,
}

/// One memory slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    /// Module part number.
    pub model: String,
    pub size: String,
    pub speed: String,
    /// Slot locator (e.g. `DIMMA1`).
    pub slot: String,
}

/// One expansion slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSlotInfo {
    #[serde(rename = "type")]
    pub slot_type: String,
    pub usage: String,
    pub status: String,
    pub bus_address: String,
    pub designation: String,
}

/// One power supply unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSupplyInfo {
    pub power_unit_group: String,
    pub location: String,
    pub name: String,
    pub manufacturer: String,
    pub asset_tag: String,
    pub model_part_number: String,
    pub max_power_capacity: String,
    pub status: String,
    #[serde(rename = "type")]
    pub supply_type: String,
    pub plugged: String,
    pub hot_replaceable: String,
    pub cooling_device_handle: String,
}

/// One device integrated on the motherboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardDeviceInfo {
    pub reference_designation: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub status: String,
    pub type_instance: String,
}

/// RAID controller summary plus its drive topology.
///
/// Counts and health codes are carried through as the controller tool
/// printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaidCardInfo {
    pub controller_id: String,
    pub model: String,
    pub ports: String,
    pub pds: String,
    pub dgs: String,
    pub dnopt: String,
    pub vds: String,
    pub vnopt: String,
    pub bbu: String,
    pub spr: String,
    pub ds: String,
    pub ehs: String,
    pub asos: String,
    pub hlth: String,
    pub virtual_drives: Vec<VirtualDriveInfo>,
    pub physical_drives: Vec<PhysicalDriveInfo>,
}

impl RaidCardInfo {
    /// Returns `true` when no controller has been recorded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One logical RAID volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDriveInfo {
    /// Drive group / virtual drive pair (e.g. `0/0`).
    pub dg_vd: String,
    /// RAID level (e.g. `RAID1`).
    #[serde(rename = "type")]
    pub raid_type: String,
    pub state: String,
    pub access: String,
    pub consist: String,
    pub cache: String,
    pub cac: String,
    pub scc: String,
    pub size: String,
    pub name: String,
}

/// One physical drive attached to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalDriveInfo {
    /// Enclosure and slot (e.g. `252:0`).
    pub eid_slt: String,
    pub did: String,
    pub state: String,
    pub dg: String,
    pub size: String,
    pub intf: String,
    pub med: String,
    pub sed: String,
    pub pi: String,
    pub se_sz: String,
    pub model: String,
    pub sp: String,
    #[serde(rename = "type")]
    pub drive_type: String,
}

/// BMC network identity and local user accounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpmiInfo {
    pub ip: String,
    pub mac: String,
    pub users: Vec<IpmiUser>,
}

/// One BMC user account row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpmiUser {
    pub user_id: String,
    pub user_name: String,
    pub privilege_level: String,
    pub enable: String,
}

/// The complete hardware snapshot for one host.
///
/// Built once per run and never mutated after it has been rendered.
///
/// # Examples
///
/// ```
/// use hw_inventory_core::{ProcessorInfo, SystemReport};
///
/// let mut report = SystemReport::default();
/// report.system.manufacturer = "Supermicro".into();
/// report.processors.push(ProcessorInfo {
///     version: "Intel(R) Xeon(R) Silver 4210".into(),
///     ..Default::default()
/// });
///
/// assert_eq!(report.processors.len(), 1);
/// assert!(report.raid_card_info.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemReport {
    pub bios: BiosInfo,
    pub system: SystemInfo,
    pub baseboard: BaseboardInfo,
    pub chassis: ChassisInfo,
    pub processors: Vec<ProcessorInfo>,
    pub memory: Vec<MemoryInfo>,
    pub system_slots: Vec<SystemSlotInfo>,
    pub system_power_supplies: Vec<PowerSupplyInfo>,
    pub onboard_devices: Vec<OnboardDeviceInfo>,
    pub raid_card_info: RaidCardInfo,
    pub ipmi: IpmiInfo,
}
