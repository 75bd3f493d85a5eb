//! BMC network identity and user accounts from `ipmicfg` output.

use hw_inventory_core::{IpmiInfo, IpmiUser};
use tracing::{debug, info};

use crate::error::Result;
use crate::platform::Platform;
use crate::runner::CommandRunner;

/// Line prefixes of the user table's header, rule and footer.
const USER_TABLE_NOISE: &[&str] = &["User ID", "-------", "Maximum", "Count"];

/// Reads `IP=` and `MAC=` lines from `ipmicfg -m` output.
///
/// Prefixes must start the line. Returns `(ip, mac)`; a missing line leaves
/// its value empty.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::bmc::parse_network;
///
/// let (ip, mac) = parse_network("IP=10.10.1.21\nMAC=0C:C4:7A:3B:5E:10\n");
/// assert_eq!(ip, "10.10.1.21");
/// assert_eq!(mac, "0C:C4:7A:3B:5E:10");
/// ```
pub fn parse_network(output: &str) -> (String, String) {
    let mut ip = String::new();
    let mut mac = String::new();
    for line in output.lines() {
        if let Some(value) = line.strip_prefix("IP=") {
            ip = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("MAC=") {
            mac = value.trim().to_string();
        }
    }
    (ip, mac)
}

/// Parses the pipe-delimited table from `ipmicfg -user list`.
///
/// Header, rule, footer and blank lines are skipped. Every other line must
/// split on `|` into exactly four fields (ID, name, privilege, enabled);
/// lines that do not are skipped.
///
/// # Examples
///
/// ```
/// use hw_inventory_collect::bmc::parse_users;
///
/// let users = parse_users("2           | root             | ADMINISTRATOR   | true        ");
/// assert_eq!(users[0].user_name, "root");
/// assert_eq!(users[0].privilege_level, "ADMINISTRATOR");
/// ```
pub fn parse_users(output: &str) -> Vec<IpmiUser> {
    let mut users = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || USER_TABLE_NOISE.iter().any(|noise| line.starts_with(noise)) {
            continue;
        }
        let parts: Vec<&str> = line.splitn(4, '|').map(str::trim).collect();
        let [user_id, user_name, privilege_level, enable] = parts.as_slice() else {
            debug!(line, "Skipping user table line without four columns");
            continue;
        };
        users.push(IpmiUser {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            privilege_level: privilege_level.to_string(),
            enable: enable.to_string(),
        });
    }
    users
}

/// Queries the BMC for its network identity and user table.
///
/// # Errors
///
/// Fails when either `ipmicfg` call fails; nothing partial is returned.
pub fn collect_ipmi(runner: &dyn CommandRunner, platform: &Platform) -> Result<IpmiInfo> {
    let network = runner.run(&platform.ipmi_network())?;
    let (ip, mac) = parse_network(&network);

    let user_table = runner.run(&platform.ipmi_users())?;
    let users = parse_users(&user_table);

    info!(ip = %ip, users = users.len(), "Collected BMC information");
    Ok(IpmiInfo { ip, mac, users })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InventoryError;
    use crate::platform::OsFamily;
    use crate::runner::CannedRunner;

    const USER_TABLE: &str = "\
Maximum number of Users          : 10
Count of currently enabled Users : 2
 User ID | User Name       | Privilege Level    | Enable
 ------- | -----------     | ---------------    | ------
 2       | ADMIN           | Administrator      | Yes
 3       | monitor         | User               | Yes
";

    #[test]
    fn test_padded_user_line() {
        let users = parse_users("2           | root             | ADMINISTRATOR   | true        ");
        assert_eq!(
            users,
            vec![IpmiUser {
                user_id: "2".into(),
                user_name: "root".into(),
                privilege_level: "ADMINISTRATOR".into(),
                enable: "true".into(),
            }]
        );
    }

    #[test]
    fn test_user_table() {
        let users = parse_users(USER_TABLE);
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id, "2");
        assert_eq!(users[0].user_name, "ADMIN");
        assert_eq!(users[1].privilege_level, "User");
        assert_eq!(users[1].enable, "Yes");
    }

    #[test]
    fn test_header_only_table_has_no_users() {
        let table = "\
Maximum number of Users          : 10
Count of currently enabled Users : 0
 User ID | User Name       | Privilege Level    | Enable
 ------- | -----------     | ---------------    | ------

";
        assert!(parse_users(table).is_empty());
        assert!(parse_users("").is_empty());
    }

    #[test]
    fn test_lines_without_four_columns_are_skipped() {
        let users = parse_users("Error: unable to reach BMC\n4 | guest | USER\n");
        assert!(users.is_empty());
    }

    #[test]
    fn test_extra_pipes_stay_in_last_column() {
        let users = parse_users("5 | svc | OPERATOR | true | extra");
        assert_eq!(users[0].enable, "true | extra");
    }

    #[test]
    fn test_network_missing_lines_are_empty() {
        let (ip, mac) = parse_network("Not able to connect to BMC\n");
        assert_eq!(ip, "");
        assert_eq!(mac, "");
    }

    #[test]
    fn test_network_ignores_indented_lines() {
        let (ip, mac) = parse_network("  IP=10.0.0.9\n\tMAC=aa:bb:cc:dd:ee:ff\n");
        assert_eq!(ip, "");
        assert_eq!(mac, "");
    }

    #[test]
    fn test_network_trims_value() {
        let (ip, mac) = parse_network("IP=  192.168.1.10  \nMAC= 0c:c4:7a:00:00:01\n");
        assert_eq!(ip, "192.168.1.10");
        assert_eq!(mac, "0c:c4:7a:00:00:01");
    }

    #[test]
    fn test_collect_ipmi_requires_both_calls() {
        let platform = Platform::for_os(OsFamily::Unix);
        let runner = CannedRunner::new().with(platform.ipmi_network(), "IP=10.0.0.2\n");
        let err = collect_ipmi(&runner, &platform).unwrap_err();
        assert!(matches!(err, InventoryError::Execution { .. }));

        let runner = runner.with(platform.ipmi_users(), USER_TABLE);
        let info = collect_ipmi(&runner, &platform).unwrap();
        assert_eq!(info.ip, "10.0.0.2");
        assert_eq!(info.users.len(), 2);
    }
}
