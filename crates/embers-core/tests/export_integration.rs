//! Integration tests for habit history and the CSV export.

use chrono::NaiveDate;
use embers_core::stats::DEFAULT_EXPORT_TITLE;
use embers_core::{
    compute_habit_history, generate_csv, Counts, DefinitionSet, FixedClock, LedgerStore,
    MemoryLedger,
};

const DEFINITIONS: &str = r#"
[[habits]]
id = "pushups"
label = "Push-ups"
kind = "counter"
score_per_unit = 2
max_count = 100
sort_order = 1

[[habits]]
id = "journal"
label = "Journal, \"morning\" pages"
score_per_unit = 1
schedule_type = "weekends"
sort_order = 2

[[habits]]
id = "retired"
label = "Retired habit"
active = false
"#;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn counts(pairs: &[(&str, f64)]) -> Counts {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

#[test]
fn test_export_totals_and_layout() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    assert_eq!(defs.habits.len(), 2);

    let clock = FixedClock::at_date(date("2024-06-10"));
    let store = LedgerStore::new(MemoryLedger::new(), clock);
    // Fri, Sat
    store.save_record("2024-06-07", counts(&[("pushups", 3.0)])).unwrap();
    store
        .complete_record("2024-06-08", Some(counts(&[("pushups", 5.0), ("journal", 1.0)])))
        .unwrap();

    let entries = store.list_records().unwrap();
    let history = compute_habit_history(&entries, &defs.habits);
    assert_eq!(history[0].total_count, 8.0);
    assert_eq!(history[0].total_score, 16.0);
    assert_eq!(history[1].daily_records.len(), 1);

    let csv = generate_csv(&history, DEFAULT_EXPORT_TITLE, store.today()).unwrap();
    let expected = "Embers Habit Export,2024-06-10\n\
                    \n\
                    Push-ups\n\
                    Date,Count,Score,Qualified\n\
                    2024-06-07,3,6,Yes\n\
                    2024-06-08,5,10,Yes\n\
                    ,,,\n\
                    Total,8,16,2 days\n\
                    ,,,\n\
                    \n\
                    \"Journal, \"\"morning\"\" pages\"\n\
                    Date,Count,Score,Qualified\n\
                    2024-06-08,1,1,Yes\n\
                    ,,,\n\
                    Total,1,1,1 days\n\
                    ,,,\n";
    assert_eq!(csv, expected);
}

#[test]
fn test_export_of_empty_ledger_lists_every_habit() {
    let defs = DefinitionSet::from_toml_str(DEFINITIONS).unwrap();
    let history = compute_habit_history(&Default::default(), &defs.habits);

    let csv = generate_csv(&history, "Mine", date("2024-06-10")).unwrap();
    assert!(csv.starts_with("Mine,2024-06-10\n\nPush-ups\n"));
    assert!(csv.contains("Total,0,0,0 days"));
    assert!(!csv.contains("Retired habit"));
}
