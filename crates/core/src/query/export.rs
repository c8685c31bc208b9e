//! CSV export of a filtered ticket view.

use crate::ticket::{encode, TicketError, TicketRecord};

/// Suggested download name for a filtered export.
pub const EXPORT_FILE_NAME: &str = "support_submissions_filtered.csv";

/// Serialize a view in the ticket store format, header included.
///
/// Every column is written regardless of what a caller chooses to display,
/// so the output can be read back exactly like the store itself.
pub fn export_csv(records: &[TicketRecord]) -> Result<Vec<u8>, TicketError> {
    encode(records, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{filter_records, FilterCriteria};
    use crate::ticket::{decode, CsvTicketStore, TicketStore, COLUMNS};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(day: u32, name: &str) -> TicketRecord {
        TicketRecord {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 4, day, 16, 45, 12).unwrap()),
            full_name: name.to_string(),
            email: "someone@example.com".to_string(),
            category: "Feature request".to_string(),
            priority: "Urgent".to_string(),
            order_ref: "#99, rush".to_string(),
            subject: "Dark mode".to_string(),
            message: "Please add:\n- dark mode\n- \"high contrast\"".to_string(),
            attachment_file: "20240401-164512-123456-mock.png".to_string(),
            client_ip: "2001:db8::1".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }

    #[test]
    fn test_export_empty_view_is_header_only() {
        let bytes = export_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            format!("{}\r\n", COLUMNS.join(","))
        );
    }

    #[test]
    fn test_export_round_trips_store_snapshot() {
        let temp_dir = TempDir::new().unwrap();
        let store = CsvTicketStore::new(temp_dir.path().join("submissions.csv")).unwrap();
        store.append(&record(1, "Ann")).unwrap();
        store.append(&record(2, "Ben")).unwrap();
        let mut undated = record(3, "Cy");
        undated.timestamp = None;
        store.append(&undated).unwrap();

        let snapshot = store.read_all().unwrap();
        let exported = export_csv(&snapshot).unwrap();
        let reparsed = decode(exported.as_slice()).unwrap();

        assert_eq!(reparsed.skipped, 0);
        assert_eq!(reparsed.records, snapshot);
    }

    #[test]
    fn test_export_of_filtered_view_keeps_all_columns() {
        let records = vec![record(1, "Ann"), record(2, "Ben")];
        let view = filter_records(&records, &FilterCriteria::new().with_search("ben"));

        let text = String::from_utf8(export_csv(&view).unwrap()).unwrap();
        let mut lines = text.split("\r\n");

        assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
        assert!(text.contains("Ben"));
        assert!(!text.contains("Ann"));
        assert!(text.contains("2001:db8::1"));
        assert!(text.contains("\"#99, rush\""));
    }
}
