//! Core report types for server hardware inventory.
//!
//! This crate defines the snapshot model produced by an inventory run:
//!
//! - [`SystemReport`]: the aggregate for one host.
//! - Singleton records: [`BiosInfo`], [`SystemInfo`], [`BaseboardInfo`],
//!   [`ChassisInfo`].
//! - Repeating records: [`ProcessorInfo`], [`MemoryInfo`],
//!   [`SystemSlotInfo`], [`PowerSupplyInfo`], [`OnboardDeviceInfo`].
//! - Storage: [`RaidCardInfo`] with its [`VirtualDriveInfo`] and
//!   [`PhysicalDriveInfo`] lists.
//! - Management controller: [`IpmiInfo`] and [`IpmiUser`].
//!
//! [`report_file_name`] derives the snapshot file name from the system
//! identity.

mod naming;
mod types;

pub use naming::{REPORT_FILE_EXTENSION, report_file_name};
pub use types::*;
