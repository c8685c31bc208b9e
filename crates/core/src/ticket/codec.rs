//! Delimited-text encoding shared by the ticket store and CSV exports.

use std::io::Read;

use tracing::warn;

use super::types::{parse_timestamp, COLUMNS};
use super::{TicketError, TicketRecord};

/// Result of decoding a store file.
#[derive(Debug, Default)]
pub(crate) struct Decoded {
    pub records: Vec<TicketRecord>,
    /// Rows dropped because they could not be decoded.
    pub skipped: usize,
}

/// Encode records, optionally preceded by the header line.
pub(crate) fn encode(records: &[TicketRecord], include_header: bool) -> Result<Vec<u8>, TicketError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    if include_header {
        writer.write_record(COLUMNS)?;
    }
    for record in records {
        writer.write_record(record.to_row())?;
    }

    writer
        .into_inner()
        .map_err(|e| TicketError::Io(e.into_error()))
}

/// Decode a store file leniently.
///
/// Columns are located by header name, so a file whose columns were
/// reordered or trimmed still decodes; a column missing from the header
/// reads as empty text. Rows that are not valid UTF-8 or whose field count
/// differs from the header are skipped. I/O failures abort the decode.
pub(crate) fn decode<R: Read>(source: R) -> Result<Decoded, TicketError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == *column)
        })
        .collect();

    let mut decoded = Decoded::default();

    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Skipping undecodable ticket row");
                decoded.skipped += 1;
                continue;
            }
        };

        if row.len() != headers.len() {
            warn!(
                line = row.position().map(|p| p.line()),
                expected = headers.len(),
                found = row.len(),
                "Skipping ticket row with wrong column count"
            );
            decoded.skipped += 1;
            continue;
        }

        let field = |column: usize| {
            positions[column]
                .and_then(|index| row.get(index))
                .unwrap_or("")
        };

        decoded.records.push(TicketRecord {
            timestamp: parse_timestamp(field(0)),
            full_name: field(1).to_string(),
            email: field(2).to_string(),
            category: field(3).trim().to_string(),
            priority: field(4).trim().to_string(),
            order_ref: field(5).to_string(),
            subject: field(6).to_string(),
            message: field(7).to_string(),
            attachment_file: field(8).to_string(),
            client_ip: field(9).to_string(),
            user_agent: field(10).to_string(),
        });
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, message: &str) -> TicketRecord {
        TicketRecord {
            timestamp: Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()),
            full_name: name.to_string(),
            email: "x@example.com".to_string(),
            category: "Question".to_string(),
            priority: "Normal".to_string(),
            order_ref: String::new(),
            subject: "Hello".to_string(),
            message: message.to_string(),
            attachment_file: String::new(),
            client_ip: String::new(),
            user_agent: String::new(),
        }
    }

    #[test]
    fn test_encode_header_line() {
        let bytes = encode(&[], true).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "timestamp,full_name,email,category,priority,order_ref,subject,message,attachment_file,client_ip,user_agent\r\n"
        );
    }

    #[test]
    fn test_encode_quotes_delimiters_and_newlines() {
        let bytes = encode(&[record("Doe, Jane", "line one\nline \"two\"")], false).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"Doe, Jane\""));
        assert!(text.contains("\"line one\nline \"\"two\"\"\""));
    }

    #[test]
    fn test_decode_preserves_embedded_newlines() {
        let original = record("Doe, Jane", "first\r\nsecond, third");
        let bytes = encode(std::slice::from_ref(&original), true).unwrap();

        let decoded = decode(bytes.as_slice()).unwrap();

        assert_eq!(decoded.skipped, 0);
        assert_eq!(decoded.records, vec![original]);
    }

    #[test]
    fn test_decode_empty_input() {
        let decoded = decode(&b""[..]).unwrap();
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_decode_skips_wrong_column_count() {
        let data = "timestamp,full_name,email,category,priority,order_ref,subject,message,attachment_file,client_ip,user_agent\n\
                    2024-01-01T00:00:00Z,A,a@x,Question,Normal,,S,M,,,\n\
                    broken,row\n\
                    2024-01-02T00:00:00Z,B,b@x,Other,High,,S,M,,,\n";

        let decoded = decode(data.as_bytes()).unwrap();

        assert_eq!(decoded.skipped, 1);
        let names: Vec<_> = decoded.records.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_decode_skips_invalid_utf8() {
        let mut data = b"timestamp,full_name,email,category,priority,order_ref,subject,message,attachment_file,client_ip,user_agent\n".to_vec();
        data.extend_from_slice(b"2024-01-01T00:00:00Z,\xff\xfe,a@x,Question,Normal,,S,M,,,\n");
        data.extend_from_slice(b"2024-01-02T00:00:00Z,Ok,b@x,Question,Normal,,S,M,,,\n");

        let decoded = decode(data.as_slice()).unwrap();

        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].full_name, "Ok");
    }

    #[test]
    fn test_decode_normalizes_fields() {
        let data = "timestamp,full_name,email,category,priority,order_ref,subject,message,attachment_file,client_ip,user_agent\n\
                    not-a-date,A,a@x,  Bug report ,\tUrgent ,,S,M,,,\n";

        let decoded = decode(data.as_bytes()).unwrap();
        let record = &decoded.records[0];

        assert_eq!(record.timestamp, None);
        assert_eq!(record.category, "Bug report");
        assert_eq!(record.priority, "Urgent");
        assert_eq!(record.order_ref, "");
    }

    #[test]
    fn test_decode_maps_columns_by_header_name() {
        let data = "email,full_name,timestamp\nz@x,Zed,2024-03-01T08:00:00Z\n";

        let decoded = decode(data.as_bytes()).unwrap();
        let record = &decoded.records[0];

        assert_eq!(record.full_name, "Zed");
        assert_eq!(record.email, "z@x");
        assert_eq!(
            record.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
        );
        assert_eq!(record.category, "");
        assert_eq!(record.user_agent, "");
    }
}
