//! Filtering, ordering and export over a snapshot of ticket records.
//!
//! Everything here is a pure transform: callers take a snapshot with
//! [`TicketStore::read_all`](crate::ticket::TicketStore::read_all) and pass
//! it in. Nothing holds a lock on the store while a view is computed.

mod criteria;
mod export;
mod filter;

pub use criteria::{FieldMatch, FilterCriteria, WILDCARD};
pub use export::{export_csv, EXPORT_FILE_NAME};
pub use filter::{
    attachment_names, category_options, compute_date_bounds, filter_records, priority_options,
    DateBounds,
};
