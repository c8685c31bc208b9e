//! Ticket storage trait and errors.

use thiserror::Error;

use super::TicketRecord;

/// Error type for ticket store operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// The backing file could not be read or written.
    #[error("Ticket store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The delimited encoding could not be produced or its header read.
    #[error("Ticket store encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only storage for ticket records.
///
/// There is no update or delete: a record, once appended, is read back
/// unchanged (apart from category/priority whitespace) by every later
/// `read_all`.
pub trait TicketStore: Send + Sync {
    /// Persist one record. Returns only after the write has been flushed
    /// to disk; a failed append leaves no partial row behind.
    fn append(&self, record: &TicketRecord) -> Result<(), TicketError>;

    /// Read every stored record, oldest first. Malformed rows are skipped.
    fn read_all(&self) -> Result<Vec<TicketRecord>, TicketError>;
}
