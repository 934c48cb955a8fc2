//! Statistics module for Embers
//!
//! Derived values over a ledger snapshot plus habit/badge definitions:
//! day scores and their percentage, badge tiers, streaks, trailing averages,
//! per-habit history and the CSV export.

mod analytics;
mod average;
mod badge;
mod export;
mod history;
mod score;
mod streak;

pub use analytics::{
    compute_analytics, compute_badge_map, find_open_day_in_progress, Analytics, BadgeDay,
    BadgeMapDay, HabitStreak, OpenDay, TimelineDay, BADGE_TIMELINE_DAYS, TIMELINE_DAYS,
};

pub use average::{average_score, ScoreAverages};

pub use badge::resolve_badge;

pub use export::{generate_csv, DEFAULT_EXPORT_TITLE};

pub use history::{compute_habit_history, HabitDayRecord, HabitHistory};

pub use score::{day_score, potential_count, score_model, ScoreModel};

pub use streak::{global_streak, has_progress, per_habit_streak, sign_streak, SignStreak};
