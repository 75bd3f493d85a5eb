//! RAID topology from `storcli` JSON output.
//!
//! Collection is two-phase: `storcli show all J` lists controllers with a
//! `System Overview` summary row each, then `storcli /c<id> show all J`
//! returns the `VD LIST` and `PD LIST` for one controller. The tool prints
//! counts and codes as either strings or numbers; every scalar is carried
//! through as a display string without interpretation.

use hw_inventory_core::{PhysicalDriveInfo, RaidCardInfo, VirtualDriveInfo};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{InventoryError, Result};
use crate::platform::Platform;
use crate::runner::CommandRunner;

/// Decodes any JSON scalar as its display text. `null` becomes `""`;
/// arrays and objects keep their compact JSON form.
fn display_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct StorcliOutput {
    #[serde(rename = "Controllers", default)]
    controllers: Option<Vec<ControllerEntry>>,
}

#[derive(Debug, Deserialize)]
struct ControllerEntry {
    #[serde(rename = "Response Data", default)]
    response_data: Option<ResponseData>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponseData {
    #[serde(rename = "System Overview", default)]
    system_overview: Vec<OverviewRow>,
    #[serde(rename = "VD LIST", default)]
    vd_list: Vec<VirtualDriveRow>,
    #[serde(rename = "PD LIST", default)]
    pd_list: Vec<PhysicalDriveRow>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OverviewRow {
    #[serde(rename = "Ctl", deserialize_with = "display_string")]
    ctl: String,
    #[serde(rename = "Model", deserialize_with = "display_string")]
    model: String,
    #[serde(rename = "Ports", deserialize_with = "display_string")]
    ports: String,
    #[serde(rename = "PDs", deserialize_with = "display_string")]
    pds: String,
    #[serde(rename = "DGs", deserialize_with = "display_string")]
    dgs: String,
    #[serde(rename = "DNOpt", deserialize_with = "display_string")]
    dnopt: String,
    #[serde(rename = "VDs", deserialize_with = "display_string")]
    vds: String,
    #[serde(rename = "VNOpt", deserialize_with = "display_string")]
    vnopt: String,
    #[serde(rename = "BBU", deserialize_with = "display_string")]
    bbu: String,
    #[serde(rename = "sPR", deserialize_with = "display_string")]
    spr: String,
    #[serde(rename = "DS", deserialize_with = "display_string")]
    ds: String,
    #[serde(rename = "EHS", deserialize_with = "display_string")]
    ehs: String,
    #[serde(rename = "ASOs", deserialize_with = "display_string")]
    asos: String,
    #[serde(rename = "Hlth", deserialize_with = "display_string")]
    hlth: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VirtualDriveRow {
    #[serde(rename = "DG/VD", deserialize_with = "display_string")]
    dg_vd: String,
    #[serde(rename = "TYPE", deserialize_with = "display_string")]
    raid_type: String,
    #[serde(rename = "State", deserialize_with = "display_string")]
    state: String,
    #[serde(rename = "Access", deserialize_with = "display_string")]
    access: String,
    #[serde(rename = "Consist", deserialize_with = "display_string")]
    consist: String,
    #[serde(rename = "Cache", deserialize_with = "display_string")]
    cache: String,
    #[serde(rename = "Cac", deserialize_with = "display_string")]
    cac: String,
    #[serde(rename = "sCC", deserialize_with = "display_string")]
    scc: String,
    #[serde(rename = "Size", deserialize_with = "display_string")]
    size: String,
    #[serde(rename = "Name", deserialize_with = "display_string")]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PhysicalDriveRow {
    #[serde(rename = "EID:Slt", deserialize_with = "display_string")]
    eid_slt: String,
    #[serde(rename = "DID", deserialize_with = "display_string")]
    did: String,
    #[serde(rename = "State", deserialize_with = "display_string")]
    state: String,
    #[serde(rename = "DG", deserialize_with = "display_string")]
    dg: String,
    #[serde(rename = "Size", deserialize_with = "display_string")]
    size: String,
    #[serde(rename = "Intf", deserialize_with = "display_string")]
    intf: String,
    #[serde(rename = "Med", deserialize_with = "display_string")]
    med: String,
    #[serde(rename = "SED", deserialize_with = "display_string")]
    sed: String,
    #[serde(rename = "PI", deserialize_with = "display_string")]
    pi: String,
    #[serde(rename = "SeSz", deserialize_with = "display_string")]
    se_sz: String,
    #[serde(rename = "Model", deserialize_with = "display_string")]
    model: String,
    #[serde(rename = "Sp", deserialize_with = "display_string")]
    sp: String,
    #[serde(rename = "Type", deserialize_with = "display_string")]
    drive_type: String,
}

impl From<OverviewRow> for RaidCardInfo {
    fn from(row: OverviewRow) -> Self {
        Self {
            controller_id: row.ctl,
            model: row.model,
            ports: row.ports,
            pds: row.pds,
            dgs: row.dgs,
            dnopt: row.dnopt,
            vds: row.vds,
            vnopt: row.vnopt,
            bbu: row.bbu,
            spr: row.spr,
            ds: row.ds,
            ehs: row.ehs,
            asos: row.asos,
            hlth: row.hlth,
            virtual_drives: Vec::new(),
            physical_drives: Vec::new(),
        }
    }
}

impl From<VirtualDriveRow> for VirtualDriveInfo {
    fn from(row: VirtualDriveRow) -> Self {
        Self {
            dg_vd: row.dg_vd,
            raid_type: row.raid_type,
            state: row.state,
            access: row.access,
            consist: row.consist,
            cache: row.cache,
            cac: row.cac,
            scc: row.scc,
            size: row.size,
            name: row.name,
        }
    }
}

impl From<PhysicalDriveRow> for PhysicalDriveInfo {
    fn from(row: PhysicalDriveRow) -> Self {
        Self {
            eid_slt: row.eid_slt,
            did: row.did,
            state: row.state,
            dg: row.dg,
            size: row.size,
            intf: row.intf,
            med: row.med,
            sed: row.sed,
            pi: row.pi,
            se_sz: row.se_sz,
            model: row.model,
            sp: row.sp,
            drive_type: row.drive_type,
        }
    }
}

fn controllers(output: &str) -> Result<Vec<ControllerEntry>> {
    let parsed: StorcliOutput = serde_json::from_str(output)?;
    match parsed.controllers {
        Some(controllers) if !controllers.is_empty() => Ok(controllers),
        _ => Err(InventoryError::MissingData(
            "no controllers found in storcli output".to_string(),
        )),
    }
}

/// Parses the `show all` overview into one summary record per controller.
///
/// Controllers whose response lacks a `System Overview` row are skipped.
/// The returned records have empty drive lists.
///
/// # Errors
///
/// - [`InventoryError::MissingData`] when `Controllers` is absent or empty.
/// - [`InventoryError::Json`] when the output is malformed.
pub fn parse_controller_overview(output: &str) -> Result<Vec<RaidCardInfo>> {
    let mut cards = Vec::new();
    for entry in controllers(output)? {
        let Some(row) = entry
            .response_data
            .and_then(|data| data.system_overview.into_iter().next())
        else {
            debug!("Skipping controller entry without System Overview");
            continue;
        };
        cards.push(RaidCardInfo::from(row));
    }
    Ok(cards)
}

/// Parses a `/c<id> show all` response into its drive lists.
///
/// A missing `VD LIST` or `PD LIST` yields an empty list.
///
/// # Errors
///
/// - [`InventoryError::MissingData`] when `Controllers` is absent or empty.
/// - [`InventoryError::Json`] when the output is malformed.
pub fn parse_controller_detail(
    output: &str,
) -> Result<(Vec<VirtualDriveInfo>, Vec<PhysicalDriveInfo>)> {
    let entry = controllers(output)?
        .into_iter()
        .next()
        .and_then(|entry| entry.response_data)
        .unwrap_or_default();
    let virtual_drives = entry.vd_list.into_iter().map(VirtualDriveInfo::from).collect();
    let physical_drives = entry.pd_list.into_iter().map(PhysicalDriveInfo::from).collect();
    Ok((virtual_drives, physical_drives))
}

/// Runs both storcli phases and returns the controller record.
///
/// The report holds a single RAID record, so when several controllers are
/// present only the last one whose detail query succeeds is kept. A failed
/// detail query skips that controller.
///
/// # Errors
///
/// Fails when the overview call fails or reports no controllers.
pub fn collect_raid(runner: &dyn CommandRunner, platform: &Platform) -> Result<RaidCardInfo> {
    let overview = runner.run(&platform.storcli_overview())?;
    let cards = parse_controller_overview(&overview)?;
    if cards.len() > 1 {
        warn!(
            controllers = cards.len(),
            "Multiple RAID controllers found, only the last one is reported"
        );
    }

    let mut selected = RaidCardInfo::default();
    for mut card in cards {
        let invocation = platform.storcli_controller(&card.controller_id);
        let detail = match runner.run(&invocation) {
            Ok(detail) => detail,
            Err(err) => {
                warn!(controller = %card.controller_id, error = %err, "Failed to get controller details");
                continue;
            }
        };
        let (virtual_drives, physical_drives) = match parse_controller_detail(&detail) {
            Ok(lists) => lists,
            Err(err) => {
                warn!(controller = %card.controller_id, error = %err, "Failed to parse controller details");
                continue;
            }
        };
        info!(
            controller = %card.controller_id,
            model = %card.model,
            virtual_drives = virtual_drives.len(),
            physical_drives = physical_drives.len(),
            "Collected RAID controller"
        );
        card.virtual_drives = virtual_drives;
        card.physical_drives = physical_drives;
        selected = card;
    }

    Ok(selected)
}
