//! Ticket intake: form validation and the submit flow.
//!
//! A submission passes through [`TicketSubmission::validate`], then the
//! optional attachment is checked and written, and finally the record is
//! appended to the store. A rejected submission leaves neither a record nor
//! an attachment behind.

mod form;
mod service;

pub use form::{
    ClientInfo, TicketSubmission, ValidatedSubmission, ValidationErrors, MAX_EMAIL_CHARS,
    MAX_FULL_NAME_CHARS, MAX_SUBJECT_CHARS,
};
pub use service::{IntakeError, TicketIntake};
