use crate::SystemReport;

/// File extension used for snapshot files.
pub const REPORT_FILE_EXTENSION: &str = "txt";

/// Builds the snapshot file name `<manufacturer>_<product>_<serial>.txt`.
///
/// Spaces inside each identity field become underscores. Empty fields are
/// kept as empty segments so the shape of the name never changes.
///
/// # Examples
///
/// ```
/// use hw_inventory_core::{SystemReport, report_file_name};
///
/// let mut report = SystemReport::default();
/// report.system.manufacturer = "Super Micro".into();
/// report.system.product_name = "SYS-1029P-WTR".into();
/// report.system.serial_number = "S123 456".into();
///
/// assert_eq!(report_file_name(&report), "Super_Micro_SYS-1029P-WTR_S123_456.txt");
/// ```
pub fn report_file_name(report: &SystemReport) -> String {
    let system = &report.system;
    format!(
        "{}_{}_{}.{REPORT_FILE_EXTENSION}",
        system.manufacturer.replace(' ', "_"),
        system.product_name.replace(' ', "_"),
        system.serial_number.replace(' ', "_"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identity_keeps_separators() {
        assert_eq!(report_file_name(&SystemReport::default()), "__.txt");
    }

    #[test]
    fn test_only_spaces_are_replaced() {
        let mut report = SystemReport::default();
        report.system.manufacturer = "Dell Inc.".into();
        report.system.product_name = "PowerEdge R640".into();
        report.system.serial_number = "ABC-123".into();
        assert_eq!(report_file_name(&report), "Dell_Inc._PowerEdge_R640_ABC-123.txt");
    }
}
