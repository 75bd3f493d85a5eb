//! Per-OS tool invocation table.
//!
//! The external tools are expected next to the working directory on Unix
//! hosts and as `.exe` counterparts on Windows. Each OS is one row in
//! [`PLATFORM_TABLE`]; [`Platform::current`] resolves the row once at
//! startup and every invocation is derived from it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dmi::DmiInputFormat;
use crate::runner::Invocation;

/// Operating system family that selects a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Unix,
    Windows,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// One row of the platform table.
#[derive(Debug, Clone, Copy)]
pub struct PlatformRow {
    pub os: OsFamily,
    /// Shell used to run the dmidecode-to-JSON pipeline.
    pub shell: &'static str,
    pub shell_flag: &'static str,
    pub dmidecode: &'static str,
    pub jc: &'static str,
    pub storcli: &'static str,
    pub ipmicfg: &'static str,
    /// Resolve `ipmicfg` against the current directory.
    pub ipmicfg_absolute: bool,
}

pub const PLATFORM_TABLE: &[PlatformRow] = &[
    PlatformRow {
        os: OsFamily::Unix,
        shell: "sh",
        shell_flag: "-c",
        dmidecode: "./dmidecode",
        jc: "./jc",
        storcli: "./storcli",
        ipmicfg: "./ipmicfg",
        ipmicfg_absolute: false,
    },
    PlatformRow {
        os: OsFamily::Windows,
        shell: "cmd.exe",
        shell_flag: "/c",
        dmidecode: "dmidecode.exe",
        jc: "jc.exe",
        storcli: "storcli.exe",
        ipmicfg: "ipmicfg.exe",
        ipmicfg_absolute: true,
    },
];

/// Optional replacements for the table's tool paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOverrides {
    pub dmidecode: Option<String>,
    pub jc: Option<String>,
    pub storcli: Option<String>,
    pub ipmicfg: Option<String>,
}

/// Resolved tool locations for this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub os: OsFamily,
    pub shell: String,
    pub shell_flag: String,
    pub dmidecode: String,
    pub jc: String,
    pub storcli: String,
    pub ipmicfg: String,
}

impl Platform {
    /// Resolves the row for the OS this binary was built for.
    pub fn current() -> Self {
        Self::for_os(OsFamily::current())
    }

    pub fn for_os(os: OsFamily) -> Self {
        let row = PLATFORM_TABLE
            .iter()
            .find(|row| row.os == os)
            .copied()
            .unwrap_or(PLATFORM_TABLE[0]);

        let ipmicfg = if row.ipmicfg_absolute {
            match std::env::current_dir() {
                Ok(dir) => dir.join(row.ipmicfg).to_string_lossy().into_owned(),
                Err(e) => {
                    debug!(error = %e, "Cannot resolve working directory, using bare ipmicfg name");
                    row.ipmicfg.to_string()
                }
            }
        } else {
            row.ipmicfg.to_string()
        };

        Self {
            os: row.os,
            shell: row.shell.to_string(),
            shell_flag: row.shell_flag.to_string(),
            dmidecode: row.dmidecode.to_string(),
            jc: row.jc.to_string(),
            storcli: row.storcli.to_string(),
            ipmicfg,
        }
    }

    /// Applies configured path overrides on top of the table row.
    pub fn with_overrides(mut self, overrides: &ToolOverrides) -> Self {
        if let Some(path) = &overrides.dmidecode {
            self.dmidecode = path.clone();
        }
        if let Some(path) = &overrides.jc {
            self.jc = path.clone();
        }
        if let Some(path) = &overrides.storcli {
            self.storcli = path.clone();
        }
        if let Some(path) = &overrides.ipmicfg {
            self.ipmicfg = path.clone();
        }
        self
    }

    /// Hardware inventory dump, raw or piped through the JSON filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use hw_inventory_collect::dmi::DmiInputFormat;
    /// use hw_inventory_collect::platform::{OsFamily, Platform};
    ///
    /// let platform = Platform::for_os(OsFamily::Unix);
    /// let inv = platform.dmidecode(DmiInputFormat::Json);
    /// assert_eq!(inv.program, "sh");
    /// assert_eq!(inv.args, ["-c", "./dmidecode | ./jc --dmidecode -q"]);
    /// ```
    pub fn dmidecode(&self, input: DmiInputFormat) -> Invocation {
        match input {
            DmiInputFormat::Json => Invocation::new(&self.shell).arg(&self.shell_flag).arg(format!(
                "{} | {} --dmidecode -q",
                self.dmidecode, self.jc
            )),
            DmiInputFormat::Text => Invocation::new(&self.dmidecode),
        }
    }

    /// Controller overview (`show all J`).
    pub fn storcli_overview(&self) -> Invocation {
        Invocation::new(&self.storcli).args(["show", "all", "J"])
    }

    /// Per-controller detail (`/c<id> show all J`).
    pub fn storcli_controller(&self, controller_id: &str) -> Invocation {
        Invocation::new(&self.storcli)
            .arg(format!("/c{controller_id}"))
            .args(["show", "all", "J"])
    }

    /// BMC network identity (`-m`).
    pub fn ipmi_network(&self) -> Invocation {
        Invocation::new(&self.ipmicfg).arg("-m")
    }

    /// BMC user table (`-user list`).
    pub fn ipmi_users(&self) -> Invocation {
        Invocation::new(&self.ipmicfg).args(["-user", "list"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_has_one_row_per_os() {
        for os in [OsFamily::Unix, OsFamily::Windows] {
            assert_eq!(PLATFORM_TABLE.iter().filter(|row| row.os == os).count(), 1);
        }
    }

    #[test]
    fn test_unix_invocations() {
        let platform = Platform::for_os(OsFamily::Unix);
        assert_eq!(
            platform.dmidecode(DmiInputFormat::Text),
            Invocation::new("./dmidecode")
        );
        assert_eq!(
            platform.storcli_overview(),
            Invocation::new("./storcli").args(["show", "all", "J"])
        );
        assert_eq!(
            platform.storcli_controller("0"),
            Invocation::new("./storcli").args(["/c0", "show", "all", "J"])
        );
        assert_eq!(platform.ipmi_network(), Invocation::new("./ipmicfg").arg("-m"));
        assert_eq!(
            platform.ipmi_users(),
            Invocation::new("./ipmicfg").args(["-user", "list"])
        );
    }

    #[test]
    fn test_windows_pipeline_uses_cmd() {
        let platform = Platform::for_os(OsFamily::Windows);
        let inv = platform.dmidecode(DmiInputFormat::Json);
        assert_eq!(inv.program, "cmd.exe");
        assert_eq!(inv.args, ["/c", "dmidecode.exe | jc.exe --dmidecode -q"]);
        assert_eq!(platform.storcli, "storcli.exe");
        assert!(platform.ipmicfg.ends_with("ipmicfg.exe"));
    }

    #[test]
    fn test_overrides_replace_only_given_tools() {
        let overrides = ToolOverrides {
            storcli: Some("/opt/MegaRAID/storcli/storcli64".into()),
            ..Default::default()
        };
        let platform = Platform::for_os(OsFamily::Unix).with_overrides(&overrides);
        assert_eq!(platform.storcli, "/opt/MegaRAID/storcli/storcli64");
        assert_eq!(platform.dmidecode, "./dmidecode");
        assert_eq!(platform.ipmicfg, "./ipmicfg");
    }
}
