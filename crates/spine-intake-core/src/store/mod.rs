//! Append-only record store backed by a flat CSV file.
//!
//! The store owns the on-disk table: lazy schema initialization, identity
//! assignment, append, full-table read, verbatim export. Appends never
//! rewrite existing content.
//!
//! `next_id` + `append` as two separate calls is racy across concurrent
//! writers; [`CsvStore::register`] performs both in one call and is what
//! the service facade serializes behind a lock.

mod codec;
mod schema;

pub use codec::{decode_record, encode_record, escape, split_rows, DecodeError};
pub use schema::{header_line, COLUMNS, SCHEMA_VERSION};

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::intake::ValidatedIntake;
use crate::models::PatientRecord;

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store file absent, empty, or carrying a foreign header. Benign:
    /// callers treat this as "no patients yet", never as a crash.
    #[error("record store is empty or missing")]
    EmptyOrMissing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header matches but a data row is malformed. Not benign: the true
    /// row count is unknown, so identity assignment must not proceed
    /// (restarting ids at 1 would hand out duplicates).
    #[error("store row {row} unparsable: {source}")]
    Parse { row: usize, source: DecodeError },

    /// On-disk header does not match the canonical schema; appending
    /// would corrupt the table. The file must be migrated externally.
    #[error("store header does not match schema {SCHEMA_VERSION}: found {found:?}")]
    SchemaMismatch { found: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CSV-backed record store.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open a store at `path`, creating it with the canonical header if
    /// it does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        Ok(store)
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with the canonical header and no rows iff
    /// it is absent. Idempotent: an existing file is left untouched and
    /// its header is deliberately not verified here (appends verify).
    pub fn initialize(&self) -> StoreResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut header = header_line();
        header.push('\n');
        fs::write(&self.path, header)?;
        tracing::debug!("created record store at {}", self.path.display());
        Ok(())
    }

    /// Identity for the next record: current row count + 1. Reads the
    /// whole table; unique only while this process is the sole writer.
    /// A store with a corrupt data row propagates [`StoreError::Parse`]
    /// rather than restarting ids at 1 over existing rows.
    pub fn next_id(&self) -> StoreResult<u64> {
        match self.read_all() {
            Ok(records) => Ok(records.len() as u64 + 1),
            Err(StoreError::EmptyOrMissing) => Ok(1),
            Err(e) => Err(e),
        }
    }

    /// Append one record as a single line, without rewriting existing
    /// content. Fails if the on-disk header no longer matches the
    /// canonical column set; columns are never silently dropped or
    /// renamed.
    pub fn append(&self, record: &PatientRecord) -> StoreResult<()> {
        self.verify_header()?;
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        file.write_all(encode_record(record).as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Assign an identity and append in one call. This is the atomic
    /// registration path: no separate `next_id` round-trip for callers.
    pub fn register(&self, intake: ValidatedIntake) -> StoreResult<PatientRecord> {
        self.initialize()?;
        let id = self.next_id()?;
        let record = intake.into_record(id, crate::models::registration_stamp());
        self.append(&record)?;
        Ok(record)
    }

    /// Every row currently in the store, in file (== insertion) order.
    ///
    /// An absent file or a foreign header yields
    /// [`StoreError::EmptyOrMissing`], the benign empty-state signal. A
    /// matching header with a malformed data row yields
    /// [`StoreError::Parse`] instead: rows exist but cannot be counted,
    /// so the store must not be mistaken for empty.
    pub fn read_all(&self) -> StoreResult<Vec<PatientRecord>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::EmptyOrMissing)
            }
            Err(e) => return Err(StoreError::Io(e)),
        };

        let rows = split_rows(&text);
        let mut iter = rows.into_iter();
        match iter.next() {
            Some(header) if header.iter().map(|s| s.as_str()).eq(COLUMNS) => {}
            Some(header) => {
                tracing::warn!(
                    "store {} has foreign header ({} columns), treating as empty",
                    self.path.display(),
                    header.len()
                );
                return Err(StoreError::EmptyOrMissing);
            }
            None => return Err(StoreError::EmptyOrMissing),
        }

        let mut records = Vec::new();
        for (i, row) in iter.enumerate() {
            match decode_record(&row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "store {} row {} unparsable: {}",
                        self.path.display(),
                        i + 1,
                        e
                    );
                    return Err(StoreError::Parse {
                        row: i + 1,
                        source: e,
                    });
                }
            }
        }
        Ok(records)
    }

    /// Raw store bytes, verbatim, for download/export.
    pub fn raw_csv(&self) -> StoreResult<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::EmptyOrMissing)
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn verify_header(&self) -> StoreResult<()> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::EmptyOrMissing)
            }
            Err(e) => return Err(StoreError::Io(e)),
        };
        let first = text.lines().next().unwrap_or("");
        if first.trim_end() == header_line() {
            Ok(())
        } else {
            Err(StoreError::SchemaMismatch {
                found: first.to_string(),
            })
        }
    }
}
