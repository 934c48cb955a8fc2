//! Day records and the decode step for persisted entries.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::LedgerError;

/// Habit id to recorded count.
pub type Counts = BTreeMap<String, f64>;

/// A ledger snapshot, ordered by date.
pub type Entries = BTreeMap<NaiveDate, DayRecord>;

/// The counts and lock state stored for one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default)]
    pub counts: Counts,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, serialize_with = "serialize_completed_at")]
    pub completed_at: Option<DateTime<Utc>>,
}

fn serialize_completed_at<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}

impl DayRecord {
    /// Count recorded for `habit_id`, zero when absent.
    pub fn count(&self, habit_id: &str) -> f64 {
        self.counts.get(habit_id).copied().unwrap_or(0.0)
    }

    /// True iff any count is non-zero.
    pub fn has_progress(&self) -> bool {
        self.counts.values().any(|value| *value != 0.0)
    }

    /// Decode a persisted entry of any supported shape.
    pub fn decode(raw: &Value) -> Self {
        StoredDay::classify(raw).into_record()
    }
}

/// Shape of one persisted entry, classified once at the persistence boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredDay<'a> {
    /// `{ counts, locked, completedAt }`
    Structured(&'a serde_json::Map<String, Value>),
    /// Bare habit-id to number map written by older versions.
    Legacy(&'a serde_json::Map<String, Value>),
    /// Anything else; read as an empty unlocked day.
    Malformed,
}

impl<'a> StoredDay<'a> {
    pub fn classify(raw: &'a Value) -> Self {
        match raw {
            Value::Object(map)
                if !map.contains_key("counts")
                    && !map.contains_key("locked")
                    && map.values().all(|v| coerce_number(v).is_some()) =>
            {
                StoredDay::Legacy(map)
            }
            Value::Object(map) => StoredDay::Structured(map),
            _ => StoredDay::Malformed,
        }
    }

    pub fn into_record(self) -> DayRecord {
        match self {
            StoredDay::Legacy(map) => DayRecord {
                counts: normalize_counts(map.iter()),
                locked: false,
                completed_at: None,
            },
            StoredDay::Structured(map) => {
                let counts = match map.get("counts") {
                    Some(Value::Object(counts)) => normalize_counts(counts.iter()),
                    _ => Counts::new(),
                };
                let completed_at = map
                    .get("completedAt")
                    .and_then(Value::as_str)
                    .and_then(|s| match DateTime::parse_from_rfc3339(s) {
                        Ok(ts) => Some(ts.with_timezone(&Utc)),
                        Err(err) => {
                            tracing::warn!(value = s, %err, "dropping unparseable completedAt");
                            None
                        }
                    });
                DayRecord {
                    counts,
                    locked: map.get("locked") == Some(&Value::Bool(true)),
                    completed_at,
                }
            }
            StoredDay::Malformed => DayRecord::default(),
        }
    }
}

/// Numeric reading of a JSON value, following loose number coercion:
/// numbers as-is, booleans 1/0, null 0, numeric strings parsed.
/// Returns `None` for values with no finite reading.
pub(crate) fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

fn normalize_counts<'v>(entries: impl Iterator<Item = (&'v String, &'v Value)>) -> Counts {
    entries
        .map(|(habit_id, value)| (habit_id.clone(), coerce_number(value).unwrap_or(0.0)))
        .collect()
}

/// Replace non-finite values with zero.
pub fn sanitize_counts(counts: Counts) -> Counts {
    counts
        .into_iter()
        .map(|(habit_id, value)| (habit_id, if value.is_finite() { value } else { 0.0 }))
        .collect()
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, LedgerError> {
    let invalid = || LedgerError::InvalidDateFormat {
        value: value.to_string(),
    };
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| invalid())
}
