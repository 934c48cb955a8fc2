//! Integration tests for analytics over a ledger built through the store.

use chrono::{Duration, NaiveDate};
use embers_core::stats::{compute_badge_map, per_habit_streak};
use embers_core::{
    compute_analytics, find_open_day_in_progress, score_model, Counts, DefinitionSet, FixedClock,
    LedgerStore, MemoryLedger,
};

const DEFINITIONS: &str = r#"
[[habits]]
id = "h1"
kind = "toggle"
score_per_unit = 2
streak_min_count = 1
sort_order = 1

[[habits]]
id = "h2"
kind = "counter"
polarity = "bad"
score_per_unit = -1
streak_min_count = 0
max_count = 10
sort_order = 2

[[habits]]
id = "gym"
kind = "toggle"
score_per_unit = 1
schedule_type = "custom"
schedule_days = ["Mon", "Wed", "Fri"]
sort_order = 3

[[badges]]
id = "low"
min_score = -100
sort_order = 1

[[badges]]
id = "ok"
min_score = 0
sort_order = 2

[[badges]]
id = "great"
min_score = 75
sort_order = 3
"#;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn counts(pairs: &[(&str, f64)]) -> Counts {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn store(today: &str) -> LedgerStore<MemoryLedger, FixedClock> {
    LedgerStore::new(MemoryLedger::new(), FixedClock::at_date(date(today)))
}

#[test]
fn test_definitions_normalise_to_expected_shape() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let h2 = &defs.habits[1];
    assert_eq!(h2.id, "h2");
    // streak_min_count is raised to at least 1
    assert_eq!(h2.streak_min_count, 1.0);
    assert_eq!(h2.score_per_unit, -1.0);
    assert_eq!(defs.badges.len(), 3);
}

#[test]
fn test_mixed_polarity_example_scores_zero() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let eligible: Vec<_> = defs.habits.iter().filter(|h| h.id != "gym").collect();

    let model = score_model(&eligible, &counts(&[("h1", 1.0), ("h2", 2.0)]));
    assert_eq!(model.score, 0.0);
    assert_eq!(model.max_positive_score, 2.0);
    assert_eq!(model.max_negative_magnitude, 1.0);
    assert_eq!(model.score_percent, 0.0);
}

#[test]
fn test_per_habit_streak_after_a_miss() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let store = store("2024-06-04");
    for (day, value) in [
        ("2024-06-01", 1.0),
        ("2024-06-02", 1.0),
        ("2024-06-03", 0.0),
        ("2024-06-04", 1.0),
    ] {
        store.save_record(day, counts(&[("h1", value)])).unwrap();
    }

    let entries = store.list_records().unwrap();
    let h1 = &defs.habits[0];
    assert_eq!(per_habit_streak(h1, entries.iter().rev()), 1);

    let analytics = compute_analytics(&entries, &defs.habits, date("2024-06-04"), &defs.badges);
    let h1_streak = analytics
        .per_habit
        .iter()
        .find(|s| s.habit_id == "h1")
        .unwrap();
    assert_eq!(h1_streak.current_streak, 1);
}

#[test]
fn test_analytics_for_a_locked_week() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let store = store("2024-06-07");

    // Mon 2024-06-03 through Fri 2024-06-07, all habits met.
    let monday = date("2024-06-03");
    for offset in 0..5 {
        let day = (monday + Duration::days(offset)).format("%Y-%m-%d").to_string();
        store
            .complete_record(&day, Some(counts(&[("h1", 1.0), ("h2", 1.0), ("gym", 1.0)])))
            .unwrap();
    }

    let entries = store.list_records().unwrap();
    let analytics = compute_analytics(&entries, &defs.habits, date("2024-06-07"), &defs.badges);

    // Friday: h1 + h2 + gym eligible; score 2 - 1 + 1 = 2 over max positive 3.
    assert_eq!(analytics.total_habits, 3);
    assert_eq!(analytics.qualified_habits_for_day, 3);
    assert_eq!(analytics.total_score, 2.0);
    assert_eq!(analytics.daily_badge.as_ref().unwrap().id, "ok");
    assert_eq!(analytics.global_streak, 5);
    assert_eq!(analytics.timeline.len(), 5);
    assert_eq!(analytics.timeline[1].total_habits, 2);
    assert_eq!(analytics.habit_count, 3);
    assert_eq!(analytics.sign_streak, 5);
    assert!(analytics.sign_streak_is_positive);
    assert_eq!(analytics.generated_for_date, date("2024-06-07"));

    // Tue/Thu score 1, Mon/Wed/Fri score 2.
    assert_eq!(analytics.averages.days7, 8.0 / 5.0);
    assert_eq!(analytics.averages.days7, analytics.averages.days365);

    assert_eq!(find_open_day_in_progress(&entries, date("2024-06-07")), None);
}

#[test]
fn test_analytics_ignore_days_after_cutoff() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let store = store("2024-06-10");
    store.save_record("2024-06-04", counts(&[("h1", 1.0)])).unwrap();
    store.save_record("2024-06-10", counts(&[("h2", 5.0)])).unwrap();

    let entries = store.list_records().unwrap();
    let analytics = compute_analytics(&entries, &defs.habits, date("2024-06-05"), &defs.badges);

    assert_eq!(analytics.timeline.len(), 1);
    assert_eq!(analytics.total_score, 0.0);
    assert_eq!(analytics.sign_streak, 1);
    assert!(analytics.sign_streak_is_positive);

    let open = find_open_day_in_progress(&entries, date("2024-06-10")).unwrap();
    assert_eq!(open.date, date("2024-06-10"));
}

#[test]
fn test_negative_day_gets_the_lowest_badge() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let store = store("2024-06-04");
    store.save_record("2024-06-04", counts(&[("h2", 3.0)])).unwrap();

    let entries = store.list_records().unwrap();
    let map = compute_badge_map(
        &entries,
        &defs.habits,
        date("2024-06-01"),
        date("2024-06-30"),
        &defs.badges,
    );
    let day = &map[&date("2024-06-04")];
    assert_eq!(day.score, -3.0);
    assert!(day.has_progress);
    assert_eq!(day.badge.as_ref().unwrap().id, "low");
}

#[test]
fn test_overflowing_day_still_scores_and_gets_a_badge() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let store = store("2024-06-04");
    store
        .save_record("2024-06-04", counts(&[("h1", 1e308), ("h2", 1e308)]))
        .unwrap();

    let entries = store.list_records().unwrap();
    let analytics = compute_analytics(&entries, &defs.habits, date("2024-06-04"), &defs.badges);
    assert!(analytics.total_score.is_finite());
    assert!(analytics.averages.days7.is_finite());
    assert!(analytics.daily_badge.is_some());
}
