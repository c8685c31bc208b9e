//! Append-only CSV ticket store.

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::{debug, warn};

use super::codec;
use super::{TicketError, TicketRecord, TicketStore};
use crate::metrics::{MALFORMED_ROWS_SKIPPED, TICKETS_APPENDED};

/// Ticket store backed by one delimited text file.
///
/// Appends within this process are serialized; appends from other
/// processes are not coordinated.
pub struct CsvTicketStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvTicketStore {
    /// Open the store at `path`, creating the parent directory and a
    /// header-only file if they do not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, TicketError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        store.ensure_header()?;
        Ok(store)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_header(&self) -> Result<(), TicketError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.open_append()?;
        if file.metadata()?.len() == 0 {
            file.write_all(&codec::encode(&[], true)?)?;
            file.sync_data()?;
            debug!(path = %self.path.display(), "Created ticket store");
        }
        Ok(())
    }

    fn open_append(&self) -> std::io::Result<File> {
        OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
    }
}

/// How the existing file ends, so the next row starts on a fresh record.
#[derive(Debug, PartialEq, Eq)]
enum Tail {
    /// Ends on a line break outside any quoted field.
    Complete,
    /// Last line is unterminated but its fields are closed.
    Unterminated,
    /// Cut off inside a quoted field.
    OpenQuote,
}

impl Tail {
    fn separator(&self) -> &'static [u8] {
        match self {
            Tail::Complete => b"",
            Tail::Unterminated => b"\r\n",
            Tail::OpenQuote => b"\"\r\n",
        }
    }
}

/// Scan a non-empty file for an open quoted field or a missing final line break.
///
/// Escaped quotes are doubled, so quote parity tells whether the file ends
/// inside a quoted field.
fn read_tail(file: &mut File) -> std::io::Result<Tail> {
    file.seek(SeekFrom::Start(0))?;
    let mut reader = BufReader::new(file);
    let mut buf = [0u8; 8192];
    let mut in_quotes = false;
    let mut last = b'\n';

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            if byte == b'"' {
                in_quotes = !in_quotes;
            }
        }
        last = buf[n - 1];
    }

    Ok(if in_quotes {
        Tail::OpenQuote
    } else if last != b'\n' {
        Tail::Unterminated
    } else {
        Tail::Complete
    })
}

impl TicketStore for CsvTicketStore {
    fn append(&self, record: &TicketRecord) -> Result<(), TicketError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut file = self.open_append()?;
        let len = file.metadata()?.len();

        // Header (if the file is new) and row go out in one write.
        let mut buffer = Vec::new();
        if len > 0 {
            let tail = read_tail(&mut file)?;
            if tail == Tail::OpenQuote {
                warn!(
                    path = %self.path.display(),
                    "Closing cut-off row before appending"
                );
            }
            buffer.extend_from_slice(tail.separator());
        }
        buffer.extend(codec::encode(std::slice::from_ref(record), len == 0)?);

        if let Err(e) = file.write_all(&buffer).and_then(|_| file.sync_data()) {
            // Drop the partial row so later appends stay readable.
            if let Err(truncate) = file.set_len(len) {
                warn!(
                    path = %self.path.display(),
                    error = %truncate,
                    "Failed to roll back partial append"
                );
            }
            return Err(e.into());
        }

        TICKETS_APPENDED.inc();
        debug!(
            path = %self.path.display(),
            bytes = buffer.len(),
            "Appended ticket row"
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TicketRecord>, TicketError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let decoded = codec::decode(BufReader::new(file))?;
        if decoded.skipped > 0 {
            MALFORMED_ROWS_SKIPPED.inc_by(decoded.skipped as u64);
            warn!(
                path = %self.path.display(),
                skipped = decoded.skipped,
                "Skipped malformed rows while reading ticket store"
            );
        }

        Ok(decoded.records)
    }
}
