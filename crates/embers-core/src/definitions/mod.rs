//! Habit, group and badge definitions.
//!
//! Definitions are owned by an external provider and are read-only to the
//! ledger and analytics code. [`DefinitionSet::load`] reads them from a TOML
//! file and applies the provider's defaulting rules.

mod badge;
mod habit;
mod loader;

pub use badge::Badge;
pub use habit::{HabitDefinition, HabitGroup, HabitKind, Polarity};
pub use loader::{DefinitionSet, DefinitionSource};

pub(crate) const DEFAULT_SORT_ORDER: i64 = 9999;
pub(crate) const DEFAULT_COUNTER_MAX: f64 = 999_999.0;
pub(crate) const DEFAULT_BADGE_ICON: &str = "\u{2022}";
pub(crate) const DEFAULT_BADGE_COLOR: &str = "#94a3b8";
