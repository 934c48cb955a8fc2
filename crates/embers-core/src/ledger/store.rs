//! Day-record store with the locking state machine.
//!
//! ```text
//!   (absent) --save--> open --complete--> locked
//!                       ^  \__save__/       |
//!                       |                   |
//!                       +------unlock-------+
//! ```
//!
//! Every mutation validates the date, rejects dates after today, then does a
//! full read-modify-write of the ledger document. A failed mutation never
//! writes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::document::{LedgerDocument, LedgerPersistence};
use super::record::{parse_iso_date, sanitize_counts, Counts, DayRecord, Entries};
use crate::clock::Clock;
use crate::error::LedgerError;

/// Phrase a caller must pass to [`LedgerStore::reset`].
pub const RESET_CONFIRM_PHRASE: &str = "DELETE ALL DATA";

/// Outcome of a full ledger reset.
#[derive(Debug, Clone, Serialize)]
pub struct ResetSummary {
    pub entries_removed: usize,
    pub reset_at: DateTime<Utc>,
}

/// Ledger operations over a persistence backend and a clock.
pub struct LedgerStore<P, C> {
    persistence: P,
    clock: C,
}

impl<P: LedgerPersistence, C: Clock> LedgerStore<P, C> {
    pub fn new(persistence: P, clock: C) -> Self {
        Self { persistence, clock }
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Today according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn editable_date(&self, date: &str) -> Result<NaiveDate, LedgerError> {
        let date = parse_iso_date(date)?;
        let today = self.clock.today();
        if date > today {
            return Err(LedgerError::FutureDateNotEditable { date, today });
        }
        Ok(date)
    }

    fn commit(
        &self,
        mut document: LedgerDocument,
        date: NaiveDate,
        record: DayRecord,
    ) -> Result<DayRecord, LedgerError> {
        document.entries.insert(date, record.clone());
        self.persistence.write_document(&document)?;
        Ok(record)
    }

    /// The record for `date`, or an empty unlocked record if none exists.
    /// Never writes.
    pub fn get_record(&self, date: &str) -> Result<DayRecord, LedgerError> {
        let date = parse_iso_date(date)?;
        let document = self.persistence.read_document()?;
        Ok(document.entries.get(&date).cloned().unwrap_or_default())
    }

    /// Replace the counts of an unlocked, non-future day.
    pub fn save_record(&self, date: &str, counts: Counts) -> Result<DayRecord, LedgerError> {
        let date = self.editable_date(date)?;
        let document = self.persistence.read_document()?;
        let existing = document.entries.get(&date).cloned().unwrap_or_default();
        if existing.locked {
            return Err(LedgerError::DayLocked { date });
        }

        let record = DayRecord {
            counts: sanitize_counts(counts),
            ..existing
        };
        tracing::debug!(%date, habits = record.counts.len(), "saving day");
        self.commit(document, date, record)
    }

    /// Lock a day, optionally replacing its counts. Allowed on already
    /// locked days, which refreshes `completed_at`.
    pub fn complete_record(
        &self,
        date: &str,
        counts: Option<Counts>,
    ) -> Result<DayRecord, LedgerError> {
        let date = self.editable_date(date)?;
        let document = self.persistence.read_document()?;
        let existing = document.entries.get(&date).cloned().unwrap_or_default();

        let record = DayRecord {
            counts: sanitize_counts(counts.unwrap_or(existing.counts)),
            locked: true,
            completed_at: Some(self.clock.now()),
        };
        tracing::info!(%date, "day completed");
        self.commit(document, date, record)
    }

    /// Clear the lock on a day. Counts are left as they are.
    pub fn unlock_record(&self, date: &str) -> Result<DayRecord, LedgerError> {
        let date = self.editable_date(date)?;
        let document = self.persistence.read_document()?;
        let existing = document.entries.get(&date).cloned().unwrap_or_default();

        let record = DayRecord {
            locked: false,
            completed_at: None,
            ..existing
        };
        tracing::info!(%date, "day unlocked");
        self.commit(document, date, record)
    }

    /// Every stored day, keyed and ordered by date.
    pub fn list_records(&self) -> Result<Entries, LedgerError> {
        Ok(self.persistence.read_document()?.entries)
    }

    /// Replace the ledger with an empty document.
    pub fn reset(&self, confirm_phrase: &str) -> Result<ResetSummary, LedgerError> {
        if confirm_phrase.trim() != RESET_CONFIRM_PHRASE {
            return Err(LedgerError::ResetRejected {
                expected: RESET_CONFIRM_PHRASE,
            });
        }
        let entries_removed = self.persistence.read_document()?.entries.len();
        self.persistence.write_document(&LedgerDocument::new())?;
        tracing::info!(entries_removed, "ledger reset");
        Ok(ResetSummary {
            entries_removed,
            reset_at: self.clock.now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::ledger::MemoryLedger;
    use serde_json::json;

    fn store() -> LedgerStore<MemoryLedger, FixedClock> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        LedgerStore::new(MemoryLedger::new(), FixedClock::at_date(today))
    }

    fn counts(pairs: &[(&str, f64)]) -> Counts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn missing_day_reads_as_empty_and_is_not_persisted() {
        let store = store();
        let record = store.get_record("2024-06-01").unwrap();
        assert_eq!(record, DayRecord::default());
        assert_eq!(store.persistence().raw(), json!({ "entries": {} }));
    }

    #[test]
    fn save_preserves_existing_fields() {
        let store = store();
        let saved = store.save_record("2024-06-10", counts(&[("a", 2.0)])).unwrap();
        assert_eq!(saved.count("a"), 2.0);
        assert!(!saved.locked);
    }

    #[test]
    fn save_replaces_non_finite_counts() {
        let store = store();
        let saved = store
            .save_record("2024-06-10", counts(&[("a", f64::INFINITY), ("b", f64::NAN)]))
            .unwrap();
        assert_eq!(saved.count("a"), 0.0);
        assert_eq!(saved.count("b"), 0.0);
    }

    #[test]
    fn future_and_malformed_dates_are_rejected() {
        let store = store();
        assert!(matches!(
            store.save_record("2024-06-11", Counts::new()),
            Err(LedgerError::FutureDateNotEditable { .. })
        ));
        assert!(matches!(
            store.complete_record("2024-06-11", Some(counts(&[("a", 1.0)]))),
            Err(LedgerError::FutureDateNotEditable { .. })
        ));
        assert!(matches!(
            store.unlock_record("2030-01-01"),
            Err(LedgerError::FutureDateNotEditable { .. })
        ));
        assert!(matches!(
            store.complete_record("06/10/2024", None),
            Err(LedgerError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn complete_keeps_prior_counts_when_none_given() {
        let store = store();
        store.save_record("2024-06-09", counts(&[("a", 3.0)])).unwrap();
        let done = store.complete_record("2024-06-09", None).unwrap();
        assert!(done.locked);
        assert_eq!(done.count("a"), 3.0);
        assert_eq!(done.completed_at, Some(store.clock().now()));
    }

    #[test]
    fn reset_requires_phrase() {
        let store = store();
        store.save_record("2024-06-09", counts(&[("a", 3.0)])).unwrap();

        assert!(matches!(
            store.reset("yes please"),
            Err(LedgerError::ResetRejected { .. })
        ));
        assert_eq!(store.list_records().unwrap().len(), 1);

        let summary = store.reset("DELETE ALL DATA").unwrap();
        assert_eq!(summary.entries_removed, 1);
        assert!(store.list_records().unwrap().is_empty());
    }
}
