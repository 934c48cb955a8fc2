//! Per-habit historical series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::score::count_for;
use crate::definitions::{HabitDefinition, HabitKind};
use crate::ledger::Entries;
use crate::schedule::is_eligible;

/// One eligible day of a habit's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDayRecord {
    pub date: NaiveDate,
    pub count: f64,
    pub qualified: bool,
    pub score: f64,
}

/// Chronological history and totals for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitHistory {
    pub habit_id: String,
    pub label: String,
    pub kind: HabitKind,
    pub score_per_unit: f64,
    pub streak_min_count: f64,
    pub total_count: f64,
    pub total_score: f64,
    /// Days with a count above zero.
    pub days_active: usize,
    pub daily_records: Vec<HabitDayRecord>,
}

impl HabitHistory {
    pub fn for_habit(habit: &HabitDefinition, entries: &Entries) -> Self {
        let daily_records: Vec<HabitDayRecord> = entries
            .iter()
            .filter(|(date, _)| is_eligible(habit, **date))
            .map(|(date, record)| {
                let count = count_for(&record.counts, habit);
                HabitDayRecord {
                    date: *date,
                    count,
                    qualified: habit.qualifies(count),
                    score: count * habit.score_per_unit,
                }
            })
            .collect();

        Self {
            habit_id: habit.id.clone(),
            label: habit.label.clone(),
            kind: habit.kind,
            score_per_unit: habit.score_per_unit,
            streak_min_count: habit.streak_min_count,
            total_count: daily_records.iter().map(|day| day.count).sum(),
            total_score: daily_records.iter().map(|day| day.score).sum(),
            days_active: daily_records.iter().filter(|day| day.count > 0.0).count(),
            daily_records,
        }
    }
}

/// History for every habit, in the order the habits are given.
pub fn compute_habit_history(entries: &Entries, habits: &[HabitDefinition]) -> Vec<HabitHistory> {
    habits
        .iter()
        .map(|habit| HabitHistory::for_habit(habit, entries))
        .collect()
}
