//! Server hardware inventory collection.
//!
//! Runs the vendor and OS hardware utilities, scrapes their output and
//! assembles one [`SystemReport`] per host:
//!
//! - `dmidecode`, as flat text or piped through `jc --dmidecode` ([`dmi`])
//! - `storcli` controller overview and per-controller drive lists ([`raid`])
//! - `ipmicfg` BMC network identity and user table ([`bmc`])
//!
//! Every tool call goes through a [`CommandRunner`], so the same pipeline
//! runs against live tools ([`SystemRunner`]) or captured output
//! ([`CannedRunner`]).
//!
//! # Main entry points
//!
//! - [`collect_inventory`]: one full run with the RAID/BMC degradation policy.
//! - [`format_report`] and [`write_snapshot`]: rendering and persistence.
//! - [`InventoryConfig`]: YAML configuration with per-OS defaults.
//!
//! # Example
//!
//! ```
//! use hw_inventory_collect::{
//!     CannedRunner, DmiInputFormat, InventoryOptions, OsFamily, OutputFormat, Platform,
//!     collect_inventory, format_report,
//! };
//!
//! let platform = Platform::for_os(OsFamily::Unix);
//! let dump = "System Information\n\tManufacturer: Supermicro\n\tSerial Number: S292386X9A27158\n\n";
//! let runner = CannedRunner::new().with(platform.dmidecode(DmiInputFormat::Text), dump);
//! let options = InventoryOptions {
//!     input: DmiInputFormat::Text,
//!     collect_raid: false,
//!     collect_bmc: false,
//! };
//!
//! let outcome = collect_inventory(&runner, &platform, &options).unwrap();
//! let json = format_report(&outcome.report, OutputFormat::Json).unwrap();
//! assert!(json.contains("\"serial_number\": \"S292386X9A27158\""));
//! ```
//!
//! [`SystemReport`]: hw_inventory_core::SystemReport

pub mod bmc;
pub mod config;
pub mod dmi;
pub mod error;
pub mod inventory;
pub mod output;
pub mod platform;
pub mod raid;
pub mod runner;

pub use config::InventoryConfig;
pub use dmi::DmiInputFormat;
pub use error::{InventoryError, Result};
pub use inventory::{CollectionOutcome, InventoryOptions, collect_inventory};
pub use output::{OutputFormat, format_report, write_snapshot};
pub use platform::{OsFamily, Platform, ToolOverrides};
pub use runner::{CannedRunner, CommandRunner, Invocation, SystemRunner};
