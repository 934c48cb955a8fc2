//! Day score and its percentage normalisation.
//!
//! The percentage is the raw score over the best attainable positive score
//! (or the worst attainable negative score, for negative days), where each
//! habit is assumed to be done exactly once.

use serde::{Deserialize, Serialize};

use crate::definitions::{HabitDefinition, Polarity};
use crate::ledger::Counts;

/// Raw and normalised score for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    pub score: f64,
    /// Clamped to -100..=100.
    pub score_percent: f64,
    pub max_positive_score: f64,
    pub max_negative_magnitude: f64,
}

/// Units a habit counts for when computing the normalisation maxima.
///
/// Always 1, for counters as well as toggles: the scale measures whether a
/// habit was done at all, not how close it came to `max_count`.
pub fn potential_count(_habit: &HabitDefinition) -> f64 {
    1.0
}

pub(crate) fn count_for(counts: &Counts, habit: &HabitDefinition) -> f64 {
    counts.get(&habit.id).copied().unwrap_or(0.0)
}

/// Zero for values with no finite reading, e.g. sums that overflowed.
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Sum of `count * score_per_unit` over `habits`. A sum that overflows
/// scores zero.
pub fn day_score(habits: &[&HabitDefinition], counts: &Counts) -> f64 {
    finite_or_zero(
        habits
            .iter()
            .map(|habit| count_for(counts, habit) * habit.score_per_unit)
            .sum(),
    )
}

pub fn score_model(habits: &[&HabitDefinition], counts: &Counts) -> ScoreModel {
    let mut model = ScoreModel {
        score: day_score(habits, counts),
        ..ScoreModel::default()
    };

    for habit in habits {
        let potential_score = potential_count(habit) * habit.score_per_unit;
        match habit.polarity {
            Polarity::Bad => model.max_negative_magnitude += potential_score.abs(),
            Polarity::Good => model.max_positive_score += potential_score.max(0.0),
        }
    }

    let percent = if model.score >= 0.0 {
        if model.max_positive_score > 0.0 {
            model.score / model.max_positive_score * 100.0
        } else {
            0.0
        }
    } else if model.max_negative_magnitude > 0.0 {
        model.score / model.max_negative_magnitude * 100.0
    } else {
        0.0
    };
    model.score_percent = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(-100.0, 100.0)
    };
    model
}
