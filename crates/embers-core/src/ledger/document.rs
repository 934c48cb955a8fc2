//! The persisted ledger document and its storage backends.
//!
//! On disk the ledger is a single JSON document, `{ "entries": { "<date>": ... } }`.
//! It is always read in full, modified in memory and written back in full.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use super::record::{parse_iso_date, DayRecord};
use crate::error::LedgerError;

/// Decoded ledger: one normalised record per valid date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerDocument {
    pub entries: BTreeMap<NaiveDate, DayRecord>,
    /// Entries whose key is not a valid date. Written back untouched.
    unrecognized: Map<String, Value>,
}

impl LedgerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a raw document. Anything that is not an object with an
    /// `entries` object is treated as an empty ledger.
    pub fn decode(raw: &Value) -> Self {
        let Some(entries) = raw.get("entries").and_then(Value::as_object) else {
            tracing::warn!("ledger document is corrupt; substituting an empty ledger");
            return Self::default();
        };

        let mut document = Self::default();
        for (key, value) in entries {
            match parse_iso_date(key) {
                Ok(date) => {
                    document.entries.insert(date, DayRecord::decode(value));
                }
                Err(_) => {
                    tracing::warn!(key = %key, "ignoring ledger entry with a non-date key");
                    document.unrecognized.insert(key.clone(), value.clone());
                }
            }
        }
        document
    }

    /// Decode JSON text; unparseable text is treated as a corrupt ledger.
    pub fn decode_str(content: &str) -> Self {
        match serde_json::from_str::<Value>(content) {
            Ok(raw) => Self::decode(&raw),
            Err(err) => {
                tracing::warn!(
                    %err,
                    "ledger document is not valid JSON; substituting an empty ledger"
                );
                Self::default()
            }
        }
    }

    pub fn encode(&self) -> Result<Value, LedgerError> {
        let mut entries = self.unrecognized.clone();
        for (date, record) in &self.entries {
            entries.insert(date.format("%Y-%m-%d").to_string(), serde_json::to_value(record)?);
        }
        Ok(json!({ "entries": entries }))
    }
}

/// Storage for the ledger document.
///
/// Implementations must make a write visible all at once or not at all.
pub trait LedgerPersistence {
    fn read_document(&self) -> Result<LedgerDocument, LedgerError>;

    fn write_document(&self, document: &LedgerDocument) -> Result<(), LedgerError>;
}

/// Pretty-printed JSON file, replaced atomically on every write.
#[derive(Debug, Clone)]
pub struct JsonFileLedger {
    path: PathBuf,
}

impl JsonFileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn ensure_exists(&self) -> Result<(), LedgerError> {
        if self.path.exists() {
            return Ok(());
        }
        tracing::debug!(path = %self.path.display(), "creating empty ledger");
        self.write_document(&LedgerDocument::default())
    }

    fn atomic_write(&self, data: &[u8]) -> Result<(), LedgerError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        temp.write_all(data).map_err(|e| self.io_error(e))?;
        temp.flush().map_err(|e| self.io_error(e))?;
        temp.persist(&self.path).map_err(|e| LedgerError::Persist {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl LedgerPersistence for JsonFileLedger {
    fn read_document(&self) -> Result<LedgerDocument, LedgerError> {
        self.ensure_exists()?;
        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let document = LedgerDocument::decode_str(&content);
        tracing::debug!(
            path = %self.path.display(),
            entries = document.entries.len(),
            "read ledger"
        );
        Ok(document)
    }

    fn write_document(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        let content = serde_json::to_string_pretty(&document.encode()?)?;
        self.atomic_write(content.as_bytes())?;
        tracing::debug!(
            path = %self.path.display(),
            entries = document.entries.len(),
            "wrote ledger"
        );
        Ok(())
    }
}

/// In-process ledger holding the raw JSON document.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    raw: Mutex<Value>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::from_value(json!({ "entries": {} }))
    }

    /// Start from an arbitrary raw document, e.g. one holding legacy entries.
    pub fn from_value(raw: Value) -> Self {
        Self {
            raw: Mutex::new(raw),
        }
    }

    /// Snapshot of the raw document as last written.
    pub fn raw(&self) -> Value {
        match self.raw.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl LedgerPersistence for MemoryLedger {
    fn read_document(&self) -> Result<LedgerDocument, LedgerError> {
        Ok(LedgerDocument::decode(&self.raw()))
    }

    fn write_document(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        let encoded = document.encode()?;
        match self.raw.lock() {
            Ok(mut guard) => *guard = encoded,
            Err(poisoned) => *poisoned.into_inner() = encoded,
        }
        Ok(())
    }
}

impl<P: LedgerPersistence + ?Sized> LedgerPersistence for &P {
    fn read_document(&self) -> Result<LedgerDocument, LedgerError> {
        (**self).read_document()
    }

    fn write_document(&self, document: &LedgerDocument) -> Result<(), LedgerError> {
        (**self).write_document(document)
    }
}
