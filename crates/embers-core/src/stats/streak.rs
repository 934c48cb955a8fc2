//! Streak calculations.
//!
//! All walks go backwards over the dates present in the ledger; calendar
//! days with no entry are not visited, so they neither extend nor break a
//! streak.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::score::{count_for, day_score};
use crate::definitions::HabitDefinition;
use crate::ledger::{DayRecord, Entries};
use crate::schedule::{filter_eligible, is_eligible};

/// Length and direction of the current run of same-signed days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignStreak {
    pub length: u32,
    pub is_positive: bool,
}

impl Default for SignStreak {
    fn default() -> Self {
        Self {
            length: 0,
            is_positive: true,
        }
    }
}

/// True iff any count on the day is non-zero.
pub fn has_progress(record: &DayRecord) -> bool {
    record.has_progress()
}

/// Consecutive eligible days, newest first, on which `habit` met its
/// `streak_min_count`. Ineligible days are skipped.
pub fn per_habit_streak<'a, I>(habit: &HabitDefinition, days_descending: I) -> u32
where
    I: IntoIterator<Item = (&'a NaiveDate, &'a DayRecord)>,
{
    let mut streak = 0;
    for (date, record) in days_descending {
        if !is_eligible(habit, *date) {
            continue;
        }
        if habit.qualifies(count_for(&record.counts, habit)) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Consecutive days, newest first, on which every eligible habit qualified.
/// A day with no eligible habits ends the streak.
pub fn global_streak<'a, I>(habits: &[HabitDefinition], days_descending: I) -> u32
where
    I: IntoIterator<Item = (&'a NaiveDate, &'a DayRecord)>,
{
    let mut streak = 0;
    for (date, record) in days_descending {
        let eligible = filter_eligible(habits, *date);
        if eligible.is_empty() {
            break;
        }
        let all_qualified = eligible
            .iter()
            .all(|habit| habit.qualifies(count_for(&record.counts, habit)));
        if !all_qualified {
            break;
        }
        streak += 1;
    }
    streak
}

fn score_on(habits: &[HabitDefinition], date: NaiveDate, record: &DayRecord) -> f64 {
    day_score(&filter_eligible(habits, date), &record.counts)
}

/// Run of consecutive progress days ending at the most recent progress day
/// on or before `up_to`, whose scores share that day's sign. A zero score
/// counts as positive.
pub fn sign_streak(entries: &Entries, habits: &[HabitDefinition], up_to: NaiveDate) -> SignStreak {
    let mut days = entries.range(..=up_to).rev().skip_while(|(_, r)| !r.has_progress());

    let Some((base_date, base_record)) = days.next() else {
        return SignStreak::default();
    };
    let is_positive = score_on(habits, *base_date, base_record) >= 0.0;

    let mut length = 1;
    for (date, record) in days {
        if !record.has_progress() {
            break;
        }
        if (score_on(habits, *date, record) >= 0.0) != is_positive {
            break;
        }
        length += 1;
    }

    SignStreak {
        length,
        is_positive,
    }
}
