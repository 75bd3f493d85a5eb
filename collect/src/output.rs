//! Report rendering and snapshot persistence.

use std::fs;
use std::path::{Path, PathBuf};

use hw_inventory_core::{SystemReport, report_file_name};

use crate::error::Result;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Pretty JSON with two-space indentation.
    #[default]
    Json,
    Yaml,
    /// Human-readable summary.
    Table,
}

/// Renders a report in the requested format.
///
/// # Errors
///
/// Returns [`Json`](crate::InventoryError::Json) or
/// [`Yaml`](crate::InventoryError::Yaml) when serialization fails.
pub fn format_report(report: &SystemReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        OutputFormat::Table => Ok(report_to_table(report)),
    }
}

/// Writes `rendered` to `<dir>/<manufacturer>_<product>_<serial>.txt`.
///
/// Creates `dir` when it does not exist. Returns the written path.
pub fn write_snapshot(report: &SystemReport, rendered: &str, dir: &Path) -> Result<PathBuf> {
    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(report_file_name(report));
    fs::write(&path, rendered)?;
    Ok(path)
}

fn push_row(out: &mut String, label: &str, value: &str) {
    if !value.is_empty() {
        out.push_str(&format!("  {label:<14} {value}\n"));
    }
}

fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn report_to_table(report: &SystemReport) -> String {
    let mut out = String::new();

    let system = &report.system;
    out.push_str(&format!(
        "System: {} {}  Serial: {}\n",
        system.manufacturer, system.product_name, system.serial_number
    ));
    push_row(&mut out, "UUID", &system.uuid);
    push_row(&mut out, "Family", &system.family);
    let bios = &report.bios;
    push_row(
        &mut out,
        "BIOS",
        &join_present(&[
            bios.vendor.as_str(),
            bios.version.as_str(),
            bios.release_date.as_str(),
        ]),
    );
    let board = &report.baseboard;
    push_row(
        &mut out,
        "Baseboard",
        &join_present(&[board.manufacturer.as_str(), board.product_name.as_str()]),
    );
    push_row(&mut out, "Chassis", &report.chassis.chassis_type);

    if !report.processors.is_empty() {
        out.push_str(&format!("\nProcessors ({}):\n", report.processors.len()));
        for cpu in &report.processors {
            out.push_str(&format!(
                "  {}  {} cores / {} threads  {}\n",
                cpu.version, cpu.cores, cpu.threads, cpu.frequency
            ));
        }
    }

    if !report.memory.is_empty() {
        out.push_str(&format!("\nMemory ({} slots):\n", report.memory.len()));
        let width = report
            .memory
            .iter()
            .map(|m| m.slot.len())
            .max()
            .unwrap_or(4);
        for module in &report.memory {
            out.push_str(&format!(
                "  {:<width$}  {}  {}  {}\n",
                module.slot, module.size, module.speed, module.model
            ));
        }
    }

    if !report.system_slots.is_empty() {
        out.push_str(&format!("\nSlots ({}):\n", report.system_slots.len()));
        for slot in &report.system_slots {
            out.push_str(&format!(
                "  {}  {}  {}\n",
                slot.designation, slot.slot_type, slot.usage
            ));
        }
    }

    if !report.system_power_supplies.is_empty() {
        out.push_str(&format!(
            "\nPower supplies ({}):\n",
            report.system_power_supplies.len()
        ));
        for psu in &report.system_power_supplies {
            out.push_str(&format!(
                "  {}  {}  {}  {}\n",
                psu.location, psu.model_part_number, psu.max_power_capacity, psu.status
            ));
        }
    }

    if !report.onboard_devices.is_empty() {
        out.push_str(&format!(
            "\nOnboard devices ({}):\n",
            report.onboard_devices.len()
        ));
        for device in &report.onboard_devices {
            out.push_str(&format!(
                "  {}  {}  {}\n",
                device.reference_designation, device.device_type, device.status
            ));
        }
    }

    let raid = &report.raid_card_info;
    if !raid.is_empty() {
        out.push_str(&format!(
            "\nRAID controller {}: {}  health: {}\n",
            raid.controller_id, raid.model, raid.hlth
        ));
        for vd in &raid.virtual_drives {
            out.push_str(&format!(
                "  VD {}  {}  {}  {}  {}\n",
                vd.dg_vd, vd.raid_type, vd.state, vd.size, vd.name
            ));
        }
        for pd in &raid.physical_drives {
            out.push_str(&format!(
                "  PD {}  {}  {}  {}  {}\n",
                pd.eid_slt, pd.state, pd.size, pd.med, pd.model
            ));
        }
    }

    let ipmi = &report.ipmi;
    if !ipmi.ip.is_empty() || !ipmi.mac.is_empty() || !ipmi.users.is_empty() {
        out.push_str(&format!("\nBMC: {}  MAC: {}\n", ipmi.ip, ipmi.mac));
        for user in &ipmi.users {
            out.push_str(&format!(
                "  {}  {}  {}  {}\n",
                user.user_id, user.user_name, user.privilege_level, user.enable
            ));
        }
    }

    out
}
