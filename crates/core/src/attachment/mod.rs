//! Attachment blob area.
//!
//! Uploaded files live in one directory under generated, timestamp-prefixed
//! names. The ticket store only ever holds those names.

mod error;
mod store;

pub use error::AttachmentError;
pub use store::{sanitize_file_name, AttachmentStore, UploadedFile};
