//! One inventory run.
//!
//! The hardware dump is the backbone of the report and its failure aborts the
//! run. RAID and BMC data are best effort: a failing tool is logged, noted in
//! [`CollectionOutcome::warnings`], and leaves its part of the report empty.

use hw_inventory_core::SystemReport;
use tracing::{info, warn};

use crate::dmi::{DmiInputFormat, build_report, parse_dmi_output};
use crate::error::Result;
use crate::platform::Platform;
use crate::runner::CommandRunner;
use crate::{bmc, raid};

/// Which subsystems to query and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryOptions {
    pub input: DmiInputFormat,
    pub collect_raid: bool,
    pub collect_bmc: bool,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            input: DmiInputFormat::default(),
            collect_raid: true,
            collect_bmc: true,
        }
    }
}

/// The report plus a message for every subsystem that was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionOutcome {
    pub report: SystemReport,
    pub warnings: Vec<String>,
}

/// Builds a [`SystemReport`] by querying every tool in sequence.
///
/// # Errors
///
/// Fails only when dmidecode cannot be run or its output cannot be parsed.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::dmi::DmiInputFormat;
/// use hw_inventory_collect::inventory::{InventoryOptions, collect_inventory};
/// use hw_inventory_collect::platform::{OsFamily, Platform};
/// use hw_inventory_collect::runner::CannedRunner;
///
/// let platform = Platform::for_os(OsFamily::Unix);
/// let runner = CannedRunner::new().with(
///     platform.dmidecode(DmiInputFormat::Json),
///     r#"[{"description": "BIOS Information", "values": {"vendor": "AMI"}}]"#,
/// );
/// let options = InventoryOptions { collect_raid: false, collect_bmc: false, ..Default::default() };
///
/// let outcome = collect_inventory(&runner, &platform, &options).unwrap();
/// assert_eq!(outcome.report.bios.vendor, "AMI");
/// assert!(outcome.warnings.is_empty());
/// ```
pub fn collect_inventory(
    runner: &dyn CommandRunner,
    platform: &Platform,
    options: &InventoryOptions,
) -> Result<CollectionOutcome> {
    info!(input = ?options.input, "Reading hardware inventory");
    let dump = runner.run(&platform.dmidecode(options.input))?;
    let records = parse_dmi_output(&dump, options.input)?;
    let mut report = build_report(&records);
    info!(
        records = records.len(),
        processors = report.processors.len(),
        memory = report.memory.len(),
        "Parsed hardware inventory"
    );

    let mut warnings = Vec::new();

    if options.collect_raid {
        match raid::collect_raid(runner, platform) {
            Ok(card) => report.raid_card_info = card,
            Err(err) => {
                warn!(error = %err, "RAID information unavailable");
                warnings.push(format!("RAID: {err}"));
            }
        }
    }

    if options.collect_bmc {
        match bmc::collect_ipmi(runner, platform) {
            Ok(ipmi) => report.ipmi = ipmi,
            Err(err) => {
                warn!(error = %err, "BMC information unavailable");
                warnings.push(format!("BMC: {err}"));
            }
        }
    }

    Ok(CollectionOutcome { report, warnings })
}
