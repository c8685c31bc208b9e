//! Record store for support ticket submissions.

mod codec;
mod csv_store;
mod store;
mod types;

pub(crate) use codec::encode;
pub use csv_store::CsvTicketStore;
pub use store::{TicketError, TicketStore};
pub use types::{
    format_timestamp, now_timestamp, parse_timestamp, TicketRecord, CATEGORIES, COLUMNS,
    PRIORITIES,
};

#[cfg(test)]
pub(crate) use codec::decode;
