//! Inventory configuration.
//!
//! Every field is optional. An empty file (or no file at all) reproduces the
//! fixed per-OS behavior: JSON dmidecode input, a 120 second deadline per
//! tool, RAID and BMC collection enabled, tools next to the working
//! directory, and the snapshot written to the current directory.
//!
//! # Example YAML
//!
//! ```yaml
//! input: json
//! timeout_secs: 120
//! output_dir: /var/lib/hw-inventory
//! collect_raid: true
//! collect_bmc: false
//! tools:
//!   storcli: /opt/MegaRAID/storcli/storcli64
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dmi::DmiInputFormat;
use crate::error::Result;
use crate::inventory::InventoryOptions;
use crate::platform::{Platform, ToolOverrides};
use crate::runner::DEFAULT_TIMEOUT;

/// Top-level configuration file.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::config::InventoryConfig;
///
/// let config: InventoryConfig = serde_yaml::from_str("collect_bmc: false").unwrap();
/// assert!(!config.collect_bmc);
/// assert!(config.collect_raid);
/// assert_eq!(config.timeout_secs, 120);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// dmidecode output format to request.
    pub input: DmiInputFormat,
    /// Deadline for each external tool, in seconds.
    pub timeout_secs: u64,
    /// Directory for the snapshot file (current directory when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    pub collect_raid: bool,
    pub collect_bmc: bool,
    /// Replacements for the platform table's tool paths.
    pub tools: ToolOverrides,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            input: DmiInputFormat::default(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            output_dir: None,
            collect_raid: true,
            collect_bmc: true,
            tools: ToolOverrides::default(),
        }
    }
}

impl InventoryConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::InventoryError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::InventoryError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::InventoryError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::InventoryError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Directory the snapshot is written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn inventory_options(&self) -> InventoryOptions {
        InventoryOptions {
            input: self.input,
            collect_raid: self.collect_raid,
            collect_bmc: self.collect_bmc,
        }
    }

    /// The host's platform row with configured tool paths applied.
    pub fn platform(&self) -> Platform {
        Platform::current().with_overrides(&self.tools)
    }
}
