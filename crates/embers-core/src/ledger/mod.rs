//! Date-keyed habit ledger.
//!
//! - [`record`]: the per-day record and the decode step for old shapes
//! - [`document`]: the persisted document and its backends
//! - [`store`]: get/save/complete/unlock with lock and future-date checks

pub mod document;
pub mod record;
pub mod store;

pub use document::{JsonFileLedger, LedgerDocument, LedgerPersistence, MemoryLedger};
pub use record::{parse_iso_date, Counts, DayRecord, Entries, StoredDay};
pub use store::{LedgerStore, ResetSummary, RESET_CONFIRM_PHRASE};
