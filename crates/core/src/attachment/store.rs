//! Directory-backed attachment store.

use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::AttachmentError;
use crate::config::StorageConfig;
use crate::metrics::{ATTACHMENTS_SAVED, ATTACHMENT_SIZE};

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// A file received with a submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Name as supplied by the client.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Stores attachment bytes under generated names in a single directory.
pub struct AttachmentStore {
    dir: PathBuf,
    max_bytes: u64,
    allowed_extensions: Vec<String>,
}

impl AttachmentStore {
    /// Create a store. An empty extension list accepts any file type.
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64, allowed_extensions: &[String]) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            allowed_extensions: allowed_extensions
                .iter()
                .map(|ext| ext.trim().to_lowercase())
                .collect(),
        }
    }

    /// Create a store from the `[storage]` config section.
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(
            &config.upload_dir,
            config.max_attachment_bytes,
            &config.allowed_extensions,
        )
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Create the upload directory if needed.
    pub async fn ensure_dir(&self) -> Result<(), AttachmentError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AttachmentError::io(self.dir.clone(), e))
    }

    /// Check an upload against the size limit and the type allow-list
    /// without touching the disk.
    pub fn check(&self, upload: &UploadedFile) -> Result<(), AttachmentError> {
        let size = upload.bytes.len() as u64;
        if size == 0 {
            return Err(AttachmentError::Empty);
        }
        if size > self.max_bytes {
            return Err(AttachmentError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        if self.allowed_extensions.is_empty() {
            return Ok(());
        }
        let extension = Path::new(&sanitize_file_name(&upload.file_name))
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        match extension {
            Some(ext) if self.allowed_extensions.contains(&ext) => Ok(()),
            _ => Err(AttachmentError::UnsupportedType {
                file_name: upload.file_name.clone(),
            }),
        }
    }

    /// Name an upload received at `received_at` would be stored under:
    /// `<YYYYMMDD-HHMMSS-micros>-<sanitized original name>`.
    pub fn stored_name(original: &str, received_at: DateTime<Utc>) -> String {
        format!(
            "{}-{}",
            received_at.format("%Y%m%d-%H%M%S-%6f"),
            sanitize_file_name(original)
        )
    }

    /// Validate and write an upload. Returns the generated file name.
    ///
    /// The file is created exclusively, so an existing attachment is never
    /// overwritten.
    pub async fn save(
        &self,
        upload: &UploadedFile,
        received_at: DateTime<Utc>,
    ) -> Result<String, AttachmentError> {
        self.check(upload)?;
        self.ensure_dir().await?;

        let name = Self::stored_name(&upload.file_name, received_at);
        let path = self.dir.join(&name);

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| AttachmentError::io(path.clone(), e))?;
        file.write_all(&upload.bytes)
            .await
            .map_err(|e| AttachmentError::io(path.clone(), e))?;
        file.sync_data()
            .await
            .map_err(|e| AttachmentError::io(path.clone(), e))?;

        ATTACHMENTS_SAVED.inc();
        ATTACHMENT_SIZE
            .with_label_values(&[])
            .observe(upload.bytes.len() as f64);
        info!(name = %name, size = upload.bytes.len(), "Saved attachment");

        Ok(name)
    }

    /// Read an attachment by its stored name.
    pub async fn open(&self, name: &str) -> Result<Vec<u8>, AttachmentError> {
        let path = self.resolve(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AttachmentError::NotFound(name.to_string()))
            }
            Err(e) => Err(AttachmentError::io(path, e)),
        }
    }

    /// Whether an attachment with this stored name exists.
    pub async fn exists(&self, name: &str) -> bool {
        match self.resolve(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Delete an attachment by its stored name.
    pub async fn remove(&self, name: &str) -> Result<(), AttachmentError> {
        let path = self.resolve(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(name = %name, "Removed attachment");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AttachmentError::NotFound(name.to_string()))
            }
            Err(e) => Err(AttachmentError::io(path, e)),
        }
    }

    /// Map a stored name to a path inside the upload directory, rejecting
    /// anything that is not a single plain path component.
    fn resolve(&self, name: &str) -> Result<PathBuf, AttachmentError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => {
                Ok(self.dir.join(name))
            }
            _ => Err(AttachmentError::InvalidName(name.to_string())),
        }
    }
}

/// Reduce a client-supplied file name to a safe single component.
///
/// Directory parts are dropped, spaces become underscores and any other
/// character outside `[A-Za-z0-9._-]` is replaced by an underscore.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let spaced = base.replace(' ', "_");
    let sanitized = UNSAFE_CHARS.replace_all(&spaced, "_");

    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        "attachment".to_string()
    } else {
        sanitized.into_owned()
    }
}
