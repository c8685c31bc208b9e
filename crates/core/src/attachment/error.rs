//! Error types for the attachment module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while saving or opening attachments.
#[derive(Debug, Error)]
pub enum AttachmentError {
    /// Uploaded file has no content.
    #[error("Attachment is empty")]
    Empty,

    /// Uploaded file exceeds the configured limit.
    #[error("Attachment is too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Extension is not on the allow-list.
    #[error("Attachment type not allowed: {file_name}")]
    UnsupportedType { file_name: String },

    /// Requested name is not a plain file name.
    #[error("Invalid attachment name: {0}")]
    InvalidName(String),

    /// No such attachment on disk.
    #[error("File not found on server: {0}")]
    NotFound(String),

    /// Filesystem failure.
    #[error("Attachment I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AttachmentError {
    pub(crate) fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }
}
