//! Per-date habit eligibility.
//!
//! A habit applies on a date when it is active, the date falls inside its
//! `[active_from, inactive_from)` window, and its schedule covers the weekday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::definitions::HabitDefinition;

/// Which weekdays a habit is scheduled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    #[default]
    Daily,
    /// Monday through Friday
    Weekdays,
    /// Saturday and Sunday
    Weekends,
    /// Only the weekdays listed in `schedule_days`
    Custom,
    /// Anything unrecognised applies every day
    #[serde(other)]
    Unrecognized,
}

impl ScheduleType {
    /// Whether this schedule covers `weekday`. `custom_days` is consulted only
    /// for [`ScheduleType::Custom`].
    pub fn covers(self, weekday: Weekday, custom_days: &[Weekday]) -> bool {
        match self {
            ScheduleType::Daily | ScheduleType::Unrecognized => true,
            ScheduleType::Weekdays => !is_weekend(weekday),
            ScheduleType::Weekends => is_weekend(weekday),
            ScheduleType::Custom => custom_days.contains(&weekday),
        }
    }
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Whether `habit` applies on `date`.
pub fn is_eligible(habit: &HabitDefinition, date: NaiveDate) -> bool {
    if !habit.active {
        return false;
    }
    if habit.active_from.is_some_and(|from| date < from) {
        return false;
    }
    // inactive_from is exclusive: the habit stops applying on that day
    if habit.inactive_from.is_some_and(|until| date >= until) {
        return false;
    }

    habit
        .schedule_type
        .covers(date.weekday(), &habit.schedule_days)
}

/// The habits that apply on `date`, in input order.
pub fn filter_eligible(habits: &[HabitDefinition], date: NaiveDate) -> Vec<&HabitDefinition> {
    habits
        .iter()
        .filter(|habit| is_eligible(habit, date))
        .collect()
}
