//! Habit and group definitions.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleType;

/// How a habit is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitKind {
    /// Done or not done (0/1)
    #[default]
    Toggle,
    /// Bounded count
    Counter,
}

/// Whether doing a habit is desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Good,
    Bad,
}

/// A habit as supplied by the definition provider.
///
/// Read-only to the core; every analytics call receives the full list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDefinition {
    pub id: String,
    pub label: String,
    pub kind: HabitKind,
    pub group_id: String,
    pub polarity: Polarity,
    /// Points per unit of count; negative for habits that cost points.
    pub score_per_unit: f64,
    /// Count a day needs to keep this habit's streak alive.
    pub streak_min_count: f64,
    pub min_count: f64,
    pub max_count: f64,
    #[serde(default)]
    pub tooltip: String,
    pub active: bool,
    pub sort_order: i64,
    pub schedule_type: ScheduleType,
    /// Consulted only for [`ScheduleType::Custom`].
    #[serde(default)]
    pub schedule_days: Vec<Weekday>,
    #[serde(default)]
    pub active_from: Option<NaiveDate>,
    /// First date on which the habit no longer applies.
    #[serde(default)]
    pub inactive_from: Option<NaiveDate>,
}

impl HabitDefinition {
    fn base(id: &str, kind: HabitKind, max_count: f64) -> Self {
        Self {
            id: id.to_string(),
            label: id.to_string(),
            kind,
            group_id: String::new(),
            polarity: Polarity::Good,
            score_per_unit: 1.0,
            streak_min_count: 1.0,
            min_count: 0.0,
            max_count,
            tooltip: String::new(),
            active: true,
            sort_order: super::DEFAULT_SORT_ORDER,
            schedule_type: ScheduleType::Daily,
            schedule_days: Vec::new(),
            active_from: None,
            inactive_from: None,
        }
    }

    /// Daily good toggle worth one point.
    pub fn toggle(id: &str) -> Self {
        Self::base(id, HabitKind::Toggle, 1.0)
    }

    /// Daily good counter worth one point per unit.
    pub fn counter(id: &str) -> Self {
        Self::base(id, HabitKind::Counter, super::DEFAULT_COUNTER_MAX)
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Sets the score per unit and derives the polarity from its sign.
    pub fn with_score(mut self, score_per_unit: f64) -> Self {
        self.score_per_unit = score_per_unit;
        self.polarity = if score_per_unit < 0.0 {
            Polarity::Bad
        } else {
            Polarity::Good
        };
        self
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_streak_min(mut self, streak_min_count: f64) -> Self {
        self.streak_min_count = streak_min_count;
        self
    }

    pub fn with_bounds(mut self, min_count: f64, max_count: f64) -> Self {
        self.min_count = min_count;
        self.max_count = max_count;
        self
    }

    pub fn with_schedule(mut self, schedule_type: ScheduleType, days: Vec<Weekday>) -> Self {
        self.schedule_type = schedule_type;
        self.schedule_days = days;
        self
    }

    pub fn with_window(mut self, from: Option<NaiveDate>, until: Option<NaiveDate>) -> Self {
        self.active_from = from;
        self.inactive_from = until;
        self
    }

    /// Clamp a user-entered count into `[min_count, max_count]`.
    ///
    /// Non-finite input is treated as zero before clamping.
    pub fn clamp_count(&self, value: f64) -> f64 {
        let value = if value.is_finite() { value } else { 0.0 };
        let upper = self.max_count.max(self.min_count);
        value.clamp(self.min_count, upper)
    }

    /// Whether `count` meets the streak threshold.
    pub fn qualifies(&self, count: f64) -> bool {
        count >= self.streak_min_count
    }
}

/// Display grouping for habits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitGroup {
    pub id: String,
    pub label: String,
    pub sort_order: i64,
}
