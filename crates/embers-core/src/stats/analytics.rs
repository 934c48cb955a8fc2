//! Dashboard analytics over a ledger snapshot.
//!
//! Everything here is a pure function of the entries, habits and badges it
//! is given; nothing reads the clock or the store.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::average::ScoreAverages;
use super::badge::resolve_badge;
use super::score::{count_for, score_model};
use super::streak::{global_streak, per_habit_streak, sign_streak};
use crate::definitions::{Badge, HabitDefinition};
use crate::ledger::{DayRecord, Entries};
use crate::schedule::filter_eligible;

/// Number of most recent ledger days in [`Analytics::timeline`].
pub const TIMELINE_DAYS: usize = 30;
/// Number of most recent ledger days in [`Analytics::badge_timeline`].
pub const BADGE_TIMELINE_DAYS: usize = 120;

/// Current streak for one habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitStreak {
    pub habit_id: String,
    pub label: String,
    pub current_streak: u32,
    pub streak_min_count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineDay {
    pub date: NaiveDate,
    pub score: f64,
    pub qualified_count: usize,
    pub total_habits: usize,
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeDay {
    pub date: NaiveDate,
    pub score: f64,
    pub badge: Option<Badge>,
}

/// Entry of [`compute_badge_map`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeMapDay {
    pub date: NaiveDate,
    pub score: f64,
    pub badge: Option<Badge>,
    pub has_progress: bool,
}

/// Most recent unlocked day that already has progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDay {
    pub date: NaiveDate,
    pub locked: bool,
    pub has_progress: bool,
}

/// Full analytics snapshot for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    /// Raw score of `generated_for_date`.
    pub total_score: f64,
    pub qualified_habits_for_day: usize,
    /// Habits eligible on `generated_for_date`.
    pub total_habits: usize,
    pub global_streak: u32,
    pub per_habit: Vec<HabitStreak>,
    pub timeline: Vec<TimelineDay>,
    pub badge_timeline: Vec<BadgeDay>,
    pub daily_badge: Option<Badge>,
    pub generated_for_date: NaiveDate,
    /// Distinct habit ids supplied.
    pub habit_count: usize,
    pub sign_streak: u32,
    pub sign_streak_is_positive: bool,
    pub averages: ScoreAverages,
}

fn qualified_count(habits: &[&HabitDefinition], record: &DayRecord) -> usize {
    habits
        .iter()
        .filter(|habit| habit.qualifies(count_for(&record.counts, habit)))
        .count()
}

fn last_n<T>(items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.into_iter().skip(skip).collect()
}

/// Analytics for `up_to`, considering only ledger days on or before it.
pub fn compute_analytics(
    entries: &Entries,
    habits: &[HabitDefinition],
    up_to: NaiveDate,
    badges: &[Badge],
) -> Analytics {
    let days: Vec<(&NaiveDate, &DayRecord)> = entries.range(..=up_to).collect();

    let empty = DayRecord::default();
    let latest = entries.get(&up_to).unwrap_or(&empty);
    let habits_for_latest = filter_eligible(habits, up_to);
    let latest_model = score_model(&habits_for_latest, &latest.counts);

    let per_habit = habits
        .iter()
        .map(|habit| HabitStreak {
            habit_id: habit.id.clone(),
            label: habit.label.clone(),
            current_streak: per_habit_streak(habit, days.iter().rev().copied()),
            streak_min_count: habit.streak_min_count,
        })
        .collect();

    let scored: Vec<(NaiveDate, &DayRecord, Vec<&HabitDefinition>)> = last_n(
        days.iter().map(|(date, record)| (**date, *record)).collect(),
        BADGE_TIMELINE_DAYS.max(TIMELINE_DAYS),
    )
    .into_iter()
    .map(|(date, record)| (date, record, filter_eligible(habits, date)))
    .collect();

    let badge_timeline = last_n(
        scored
            .iter()
            .map(|(date, record, eligible)| {
                let model = score_model(eligible, &record.counts);
                BadgeDay {
                    date: *date,
                    score: model.score,
                    badge: resolve_badge(model.score_percent, badges).cloned(),
                }
            })
            .collect(),
        BADGE_TIMELINE_DAYS,
    );

    let timeline = last_n(
        scored
            .iter()
            .map(|(date, record, eligible)| {
                let model = score_model(eligible, &record.counts);
                TimelineDay {
                    date: *date,
                    score: model.score,
                    qualified_count: qualified_count(eligible, record),
                    total_habits: eligible.len(),
                    badge: resolve_badge(model.score_percent, badges).cloned(),
                }
            })
            .collect(),
        TIMELINE_DAYS,
    );

    let sign = sign_streak(entries, habits, up_to);
    let habit_count = habits
        .iter()
        .map(|habit| habit.id.as_str())
        .collect::<HashSet<_>>()
        .len();

    Analytics {
        total_score: latest_model.score,
        qualified_habits_for_day: qualified_count(&habits_for_latest, latest),
        total_habits: habits_for_latest.len(),
        global_streak: global_streak(habits, days.iter().rev().copied()),
        per_habit,
        timeline,
        badge_timeline,
        daily_badge: resolve_badge(latest_model.score_percent, badges).cloned(),
        generated_for_date: up_to,
        habit_count,
        sign_streak: sign.length,
        sign_streak_is_positive: sign.is_positive,
        averages: ScoreAverages::ending_at(entries, habits, up_to),
    }
}

/// Score and badge for every ledger day in `[start, end]` that has at least
/// one eligible habit.
pub fn compute_badge_map(
    entries: &Entries,
    habits: &[HabitDefinition],
    start: NaiveDate,
    end: NaiveDate,
    badges: &[Badge],
) -> BTreeMap<NaiveDate, BadgeMapDay> {
    if start > end {
        return BTreeMap::new();
    }
    entries
        .range(start..=end)
        .filter_map(|(date, record)| {
            let eligible = filter_eligible(habits, *date);
            if eligible.is_empty() {
                return None;
            }
            let model = score_model(&eligible, &record.counts);
            Some((
                *date,
                BadgeMapDay {
                    date: *date,
                    score: model.score,
                    badge: resolve_badge(model.score_percent, badges).cloned(),
                    has_progress: record.has_progress(),
                },
            ))
        })
        .collect()
}

/// The most recent unlocked day on or before `up_to` that has progress.
pub fn find_open_day_in_progress(entries: &Entries, up_to: NaiveDate) -> Option<OpenDay> {
    entries
        .range(..=up_to)
        .rev()
        .find(|(_, record)| !record.locked && record.has_progress())
        .map(|(date, _)| OpenDay {
            date: *date,
            locked: false,
            has_progress: true,
        })
}
