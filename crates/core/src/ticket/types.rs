//! Core ticket data types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Categories offered by the submission form. The set is open: stored
/// records may carry values outside this list.
pub const CATEGORIES: [&str; 4] = ["Question", "Bug report", "Feature request", "Other"];

/// Priorities offered by the submission form. Open like [`CATEGORIES`].
pub const PRIORITIES: [&str; 3] = ["Normal", "High", "Urgent"];

/// Column order of the ticket store and of every CSV export.
pub const COLUMNS: [&str; 11] = [
    "timestamp",
    "full_name",
    "email",
    "category",
    "priority",
    "order_ref",
    "subject",
    "message",
    "attachment_file",
    "client_ip",
    "user_agent",
];

/// On-disk timestamp format (UTC, second precision).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One support request as persisted in the ticket store.
///
/// Records are immutable once appended. Every text field is present; values
/// missing from the store are read back as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Submission instant. `None` when the stored value is missing or
    /// unparseable; such records sort after all dated ones.
    pub timestamp: Option<DateTime<Utc>>,
    pub full_name: String,
    pub email: String,
    pub category: String,
    pub priority: String,
    pub order_ref: String,
    pub subject: String,
    pub message: String,
    /// Generated attachment file name, or empty.
    pub attachment_file: String,
    pub client_ip: String,
    pub user_agent: String,
}

impl TicketRecord {
    /// Calendar date (UTC) of the submission, if known.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date_naive())
    }

    /// Whether the record references an attachment.
    pub fn has_attachment(&self) -> bool {
        !self.attachment_file.is_empty()
    }

    /// The five fields covered by free-text search.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            self.full_name.as_str(),
            self.email.as_str(),
            self.order_ref.as_str(),
            self.subject.as_str(),
            self.message.as_str(),
        ]
    }

    /// Field values in [`COLUMNS`] order.
    pub fn to_row(&self) -> [String; 11] {
        [
            self.timestamp.map(format_timestamp).unwrap_or_default(),
            self.full_name.clone(),
            self.email.clone(),
            self.category.clone(),
            self.priority.clone(),
            self.order_ref.clone(),
            self.subject.clone(),
            self.message.clone(),
            self.attachment_file.clone(),
            self.client_ip.clone(),
            self.user_agent.clone(),
        ]
    }
}

/// Current instant truncated to whole seconds, as stored.
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Render a timestamp in the store format, e.g. `2024-01-05T10:00:00Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp leniently.
///
/// Accepts RFC 3339 with any offset, naive date-times (with `T` or a space,
/// optional fractional seconds) read as UTC, and bare dates read as midnight
/// UTC. Anything else yields `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
