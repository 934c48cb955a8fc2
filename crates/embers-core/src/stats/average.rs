//! Trailing-window score averages.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::score::{day_score, finite_or_zero};
use crate::definitions::HabitDefinition;
use crate::ledger::Entries;
use crate::schedule::filter_eligible;

/// Mean day score over the 7, 30 and 365 days ending at a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreAverages {
    pub days7: f64,
    pub days30: f64,
    pub days365: f64,
}

impl ScoreAverages {
    pub fn ending_at(entries: &Entries, habits: &[HabitDefinition], end: NaiveDate) -> Self {
        Self {
            days7: average_score(entries, habits, end, 7),
            days30: average_score(entries, habits, end, 30),
            days365: average_score(entries, habits, end, 365),
        }
    }
}

/// Mean score of the days in `[end - (window_days - 1), end]` that have
/// progress and at least one eligible habit. Zero when no day qualifies.
pub fn average_score(
    entries: &Entries,
    habits: &[HabitDefinition],
    end: NaiveDate,
    window_days: u32,
) -> f64 {
    if window_days == 0 {
        return 0.0;
    }
    let start = end - Duration::days(i64::from(window_days) - 1);

    let scores: Vec<f64> = entries
        .range(start..=end)
        .filter(|(_, record)| record.has_progress())
        .filter_map(|(date, record)| {
            let eligible = filter_eligible(habits, *date);
            (!eligible.is_empty()).then(|| day_score(&eligible, &record.counts))
        })
        .collect();

    if scores.is_empty() {
        return 0.0;
    }
    finite_or_zero(scores.iter().sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::DayRecord;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn day(habit: &str, count: f64) -> DayRecord {
        let mut record = DayRecord::default();
        record.counts.insert(habit.to_string(), count);
        record
    }

    #[test]
    fn averages_only_progress_days_in_window() {
        let habits = vec![HabitDefinition::counter("a").with_score(2.0)];
        let mut entries = Entries::new();
        entries.insert(date("2024-05-31"), day("a", 50.0)); // outside 7-day window
        entries.insert(date("2024-06-01"), day("a", 1.0));
        entries.insert(date("2024-06-03"), day("a", 0.0)); // no progress
        entries.insert(date("2024-06-07"), day("a", 2.0));

        assert_eq!(average_score(&entries, &habits, date("2024-06-07"), 7), 3.0);
        assert_eq!(average_score(&entries, &habits, date("2024-06-07"), 1), 4.0);
    }

    #[test]
    fn days_without_eligible_habits_are_skipped() {
        let habits = vec![HabitDefinition::toggle("a")
            .with_window(None, Some(date("2024-06-05")))];
        let mut entries = Entries::new();
        entries.insert(date("2024-06-04"), day("a", 1.0));
        entries.insert(date("2024-06-06"), day("a", 1.0));

        assert_eq!(average_score(&entries, &habits, date("2024-06-06"), 7), 1.0);
    }

    #[test]
    fn empty_window_is_zero() {
        let habits = vec![HabitDefinition::toggle("a")];
        assert_eq!(average_score(&Entries::new(), &habits, date("2024-06-06"), 30), 0.0);

        let averages = ScoreAverages::ending_at(&Entries::new(), &habits, date("2024-06-06"));
        assert_eq!(averages, ScoreAverages::default());
    }
}
