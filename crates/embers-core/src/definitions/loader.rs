//! TOML definitions file.
//!
//! Rows are loosely typed on disk and normalised here: missing labels fall
//! back to ids, polarity is inferred from the score sign, inactive rows are
//! dropped and the rest are ordered by `sort_order`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::{
    Badge, HabitDefinition, HabitGroup, HabitKind, Polarity, DEFAULT_BADGE_COLOR,
    DEFAULT_BADGE_ICON, DEFAULT_COUNTER_MAX, DEFAULT_SORT_ORDER,
};
use crate::error::DefinitionError;
use crate::schedule::ScheduleType;

/// Written when no definitions file exists yet.
const STARTER_DEFINITIONS: &str = r##"# Embers habit definitions

[[groups]]
id = "health"
label = "Health"
sort_order = 1

[[groups]]
id = "focus"
label = "Focus"
sort_order = 2

[[habits]]
id = "wake_on_time"
label = "Wake up on time"
kind = "toggle"
group_id = "health"
score_per_unit = 2
sort_order = 10

[[habits]]
id = "hydrate"
label = "Drink water (glasses)"
kind = "counter"
group_id = "health"
score_per_unit = 0.5
streak_min_count = 6
max_count = 14
sort_order = 20

[[habits]]
id = "deep_work_blocks"
label = "Deep work blocks (50m)"
kind = "counter"
group_id = "focus"
score_per_unit = 3
streak_min_count = 2
max_count = 8
schedule_type = "weekdays"
sort_order = 30

[[habits]]
id = "connect"
label = "Reach out to someone"
group_id = "health"
score_per_unit = 1
schedule_type = "custom"
schedule_days = "Mon, Wed, Fri"
sort_order = 40

[[habits]]
id = "late_scrolling"
label = "Late-night scrolling"
group_id = "health"
polarity = "bad"
score_per_unit = -2
sort_order = 50

[[badges]]
id = "rough"
display_name = "Rough Day"
icon = "⚠️"
color = "#f97316"
min_score = -30
sort_order = 1

[[badges]]
id = "neutral"
display_name = "Neutral Day"
icon = "⚪"
color = "#94a3b8"
min_score = 0
sort_order = 2

[[badges]]
id = "solid"
display_name = "Solid Day"
icon = "🟢"
color = "#22c55e"
min_score = 40
sort_order = 3

[[badges]]
id = "elite"
display_name = "Elite Day"
icon = "💎"
color = "#2563eb"
min_score = 80
sort_order = 4
"##;

/// Validated definitions, each list sorted by `sort_order`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DefinitionSet {
    pub groups: Vec<HabitGroup>,
    pub habits: Vec<HabitDefinition>,
    pub badges: Vec<Badge>,
}

/// A loaded [`DefinitionSet`] with the file it was read from.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionSource {
    pub path: PathBuf,
    /// `None` where the platform has no modification times.
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub definitions: DefinitionSet,
}

#[derive(Debug, Default, Deserialize)]
struct DefinitionsFile {
    #[serde(default)]
    groups: Vec<RawGroup>,
    #[serde(default)]
    habits: Vec<RawHabit>,
    #[serde(default)]
    badges: Vec<RawBadge>,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    id: String,
    label: Option<String>,
    sort_order: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDays {
    List(Vec<String>),
    Joined(String),
}

#[derive(Debug, Deserialize)]
struct RawHabit {
    id: String,
    label: Option<String>,
    kind: Option<String>,
    group_id: Option<String>,
    polarity: Option<String>,
    score_per_unit: Option<f64>,
    streak_min_count: Option<f64>,
    min_count: Option<f64>,
    max_count: Option<f64>,
    tooltip: Option<String>,
    active: Option<bool>,
    sort_order: Option<i64>,
    schedule_type: Option<String>,
    schedule_days: Option<RawDays>,
    active_from: Option<String>,
    inactive_from: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBadge {
    id: String,
    display_name: Option<String>,
    icon: Option<String>,
    color: Option<String>,
    min_score: Option<f64>,
    sort_order: Option<i64>,
    active: Option<bool>,
}

impl DefinitionSet {
    /// Load definitions from `path`, writing the starter file first if it
    /// does not exist.
    pub fn open(path: &Path) -> Result<Self, DefinitionError> {
        if !path.exists() {
            write_starter(path)?;
            tracing::info!(path = %path.display(), "wrote starter habit definitions");
        }
        Self::load(path)
    }

    /// Like [`DefinitionSet::open`], also reporting where the definitions
    /// came from and when that file last changed.
    pub fn open_with_source(path: &Path) -> Result<DefinitionSource, DefinitionError> {
        let definitions = Self::open(path)?;
        let metadata = std::fs::metadata(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(DefinitionSource {
            path: path.to_path_buf(),
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            definitions,
        })
    }

    /// Overwrite `path` with the starter definitions.
    pub fn restore_starter(path: &Path) -> Result<Self, DefinitionError> {
        write_starter(path)?;
        tracing::info!(path = %path.display(), "restored starter habit definitions");
        Self::from_toml_str(STARTER_DEFINITIONS)
    }

    /// Load definitions from an existing file.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DefinitionError> {
        let file: DefinitionsFile = toml::from_str(content)?;

        let mut groups: Vec<HabitGroup> = file
            .groups
            .into_iter()
            .filter(|raw| !raw.id.trim().is_empty())
            .map(|raw| {
                let id = raw.id.trim().to_string();
                HabitGroup {
                    label: non_empty(raw.label).unwrap_or_else(|| id.clone()),
                    sort_order: raw.sort_order.unwrap_or(DEFAULT_SORT_ORDER),
                    id,
                }
            })
            .collect();
        groups.sort_by_key(|group| group.sort_order);

        let mut seen = HashSet::new();
        let mut habits = Vec::with_capacity(file.habits.len());
        for raw in file.habits {
            let Some(habit) = normalize_habit(raw)? else {
                continue;
            };
            if !seen.insert(habit.id.clone()) {
                return Err(DefinitionError::DuplicateHabit(habit.id));
            }
            if habit.active {
                habits.push(habit);
            }
        }
        habits.sort_by_key(|habit| habit.sort_order);

        let mut seen = HashSet::new();
        let mut badges = Vec::with_capacity(file.badges.len());
        for raw in file.badges {
            let Some(badge) = normalize_badge(raw) else {
                continue;
            };
            if !seen.insert(badge.id.clone()) {
                return Err(DefinitionError::DuplicateBadge(badge.id));
            }
            if badge.active {
                badges.push(badge);
            }
        }
        badges.sort_by_key(|badge| badge.sort_order);

        Ok(Self {
            groups,
            habits,
            badges,
        })
    }
}

fn write_starter(path: &Path) -> Result<(), DefinitionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| DefinitionError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, STARTER_DEFINITIONS).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

fn parse_optional_date(
    habit: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDate>, DefinitionError> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DefinitionError::InvalidDate {
            habit: habit.to_string(),
            field,
            value,
        })
}

fn parse_schedule_type(raw: Option<String>) -> ScheduleType {
    match raw.as_deref().map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") | Some("daily") => ScheduleType::Daily,
        Some("weekdays") => ScheduleType::Weekdays,
        Some("weekends") => ScheduleType::Weekends,
        Some("custom") => ScheduleType::Custom,
        Some(_) => ScheduleType::Unrecognized,
    }
}

fn parse_schedule_days(habit: &str, raw: Option<RawDays>) -> Vec<Weekday> {
    let items: Vec<String> = match raw {
        None => Vec::new(),
        Some(RawDays::List(items)) => items,
        Some(RawDays::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };

    let mut days = Vec::new();
    for item in items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        match Weekday::from_str(item) {
            Ok(day) if !days.contains(&day) => days.push(day),
            Ok(_) => {}
            Err(_) => tracing::warn!(habit, day = item, "ignoring unknown schedule day"),
        }
    }
    days
}

fn normalize_habit(raw: RawHabit) -> Result<Option<HabitDefinition>, DefinitionError> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return Ok(None);
    }

    let kind = match raw.kind.as_deref().map(|s| s.trim().to_lowercase()).as_deref() {
        Some("counter") => HabitKind::Counter,
        _ => HabitKind::Toggle,
    };
    let score_per_unit = finite_or(raw.score_per_unit, 0.0);
    let polarity = match raw.polarity.as_deref().map(|s| s.trim().to_lowercase()).as_deref() {
        Some("good") => Polarity::Good,
        Some("bad") => Polarity::Bad,
        _ if score_per_unit < 0.0 => Polarity::Bad,
        _ => Polarity::Good,
    };

    let requested_streak_min = finite_or(raw.streak_min_count, 1.0);
    if requested_streak_min < 1.0 {
        tracing::warn!(habit = %id, requested_streak_min, "raising streak_min_count to 1");
    }

    let min_count = finite_or(raw.min_count, 0.0);
    let default_max = match kind {
        HabitKind::Toggle => 1.0,
        HabitKind::Counter => DEFAULT_COUNTER_MAX,
    };
    let max_count = finite_or(raw.max_count, default_max).max(min_count);

    let active_from = parse_optional_date(&id, "active_from", raw.active_from)?;
    let inactive_from = parse_optional_date(&id, "inactive_from", raw.inactive_from)?;
    let schedule_days = parse_schedule_days(&id, raw.schedule_days);

    Ok(Some(HabitDefinition {
        label: non_empty(raw.label).unwrap_or_else(|| id.clone()),
        kind,
        group_id: non_empty(raw.group_id).unwrap_or_default(),
        polarity,
        score_per_unit,
        streak_min_count: requested_streak_min.max(1.0),
        min_count,
        max_count,
        tooltip: non_empty(raw.tooltip).unwrap_or_default(),
        active: raw.active.unwrap_or(true),
        sort_order: raw.sort_order.unwrap_or(DEFAULT_SORT_ORDER),
        schedule_type: parse_schedule_type(raw.schedule_type),
        schedule_days,
        active_from,
        inactive_from,
        id,
    }))
}

fn normalize_badge(raw: RawBadge) -> Option<Badge> {
    let id = raw.id.trim().to_string();
    if id.is_empty() {
        return None;
    }
    Some(Badge {
        display_name: non_empty(raw.display_name).unwrap_or_else(|| id.clone()),
        icon: non_empty(raw.icon).unwrap_or_else(|| DEFAULT_BADGE_ICON.to_string()),
        color: non_empty(raw.color).unwrap_or_else(|| DEFAULT_BADGE_COLOR.to_string()),
        min_score: finite_or(raw.min_score, 0.0),
        sort_order: raw.sort_order.unwrap_or(DEFAULT_SORT_ORDER),
        active: raw.active.unwrap_or(true),
        id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_file_parses() {
        let set = DefinitionSet::from_toml_str(STARTER_DEFINITIONS).unwrap();
        assert_eq!(set.habits.len(), 5);
        assert_eq!(set.badges.len(), 4);
        assert_eq!(set.groups[0].id, "health");

        let connect = set.habits.iter().find(|h| h.id == "connect").unwrap();
        assert_eq!(connect.schedule_type, ScheduleType::Custom);
        assert_eq!(connect.schedule_days, vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]);
    }

    #[test]
    fn source_reports_path_and_modification_time() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("habits.toml");

        let source = DefinitionSet::open_with_source(&path).unwrap();
        assert_eq!(source.path, path);
        assert!(source.modified_at.is_some());
        assert_eq!(source.definitions.groups.len(), 2);

        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["habits"].as_array().unwrap().len(), 5);
        assert_eq!(json["groups"][1]["id"], "focus");
        assert!(json["modified_at"].is_string());
    }

    #[test]
    fn restore_overwrites_edited_definitions() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("habits.toml");
        std::fs::write(&path, "[[habits]]\nid = \"only\"\n").unwrap();
        assert_eq!(DefinitionSet::open(&path).unwrap().habits.len(), 1);

        let restored = DefinitionSet::restore_starter(&path).unwrap();
        assert_eq!(restored.habits.len(), 5);
        assert_eq!(DefinitionSet::load(&path).unwrap().habits.len(), 5);
    }

    #[test]
    fn defaults_are_applied() {
        let set = DefinitionSet::from_toml_str(
            r#"
            [[habits]]
            id = "snacks"
            kind = "counter"
            score_per_unit = -1.5
            streak_min_count = 0
            min_count = 2
            max_count = 1

            [[habits]]
            id = "floss"
            "#,
        )
        .unwrap();

        let snacks = &set.habits[0];
        assert_eq!(snacks.label, "snacks");
        assert_eq!(snacks.polarity, Polarity::Bad);
        assert_eq!(snacks.streak_min_count, 1.0);
        assert_eq!(snacks.max_count, 2.0);
        assert_eq!(snacks.sort_order, DEFAULT_SORT_ORDER);

        let floss = &set.habits[1];
        assert_eq!(floss.kind, HabitKind::Toggle);
        assert_eq!(floss.max_count, 1.0);
        assert_eq!(floss.score_per_unit, 0.0);
        assert_eq!(floss.polarity, Polarity::Good);
    }

    #[test]
    fn inactive_rows_are_dropped_and_rest_sorted() {
        let set = DefinitionSet::from_toml_str(
            r#"
            [[habits]]
            id = "late"
            sort_order = 20

            [[habits]]
            id = "retired"
            active = false
            sort_order = 1

            [[habits]]
            id = "early"
            sort_order = 10

            [[badges]]
            id = "hidden"
            active = false
            "#,
        )
        .unwrap();

        let ids: Vec<&str> = set.habits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
        assert!(set.badges.is_empty());
    }

    #[test]
    fn duplicate_habit_is_rejected() {
        let err = DefinitionSet::from_toml_str(
            r#"
            [[habits]]
            id = "a"
            [[habits]]
            id = "a"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::DuplicateHabit(id) if id == "a"));
    }

    #[test]
    fn invalid_window_date_is_rejected() {
        let err = DefinitionSet::from_toml_str(
            r#"
            [[habits]]
            id = "a"
            active_from = "June 1st"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DefinitionError::InvalidDate { field: "active_from", .. }));
    }

    #[test]
    fn open_writes_starter_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("habits.toml");

        let set = DefinitionSet::open(&path).unwrap();
        assert!(path.exists());
        assert!(!set.habits.is_empty());
    }
}
