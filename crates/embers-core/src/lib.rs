//! # Embers Core Library
//!
//! Habit ledger and analytics engine. Users record per-habit daily counts,
//! lock days once complete, and get scores, badges, streaks, trailing
//! averages and per-habit history back. The `embers` binary is a thin
//! command-line layer over the same library.
//!
//! ## Architecture
//!
//! - **Ledger**: date-keyed day records with a lock state machine, persisted
//!   as a single JSON document through a swappable backend
//! - **Definitions**: read-only habit, group and badge definitions loaded
//!   from TOML
//! - **Stats**: pure functions over a ledger snapshot and the definitions
//! - **Storage**: TOML configuration and data directory resolution
//!
//! ## Key Components
//!
//! - [`LedgerStore`]: get/save/complete/unlock over a [`LedgerPersistence`]
//! - [`DefinitionSet`]: habits and badges as supplied by the definition file
//! - [`compute_analytics`]: the dashboard aggregate for one day
//! - [`Config`]: application configuration management

pub mod clock;
pub mod definitions;
pub mod error;
pub mod ledger;
pub mod schedule;
pub mod stats;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use definitions::{
    Badge, DefinitionSet, DefinitionSource, HabitDefinition, HabitGroup, HabitKind, Polarity,
};
pub use error::{ConfigError, CoreError, DefinitionError, ExportError, LedgerError, Result};
pub use ledger::{
    Counts, DayRecord, Entries, JsonFileLedger, LedgerDocument, LedgerPersistence, LedgerStore,
    MemoryLedger, ResetSummary, RESET_CONFIRM_PHRASE,
};
pub use schedule::{filter_eligible, is_eligible, ScheduleType};
pub use stats::{
    compute_analytics, compute_badge_map, compute_habit_history, find_open_day_in_progress,
    generate_csv, resolve_badge, score_model, Analytics, HabitHistory, ScoreModel,
};
pub use storage::Config;
