use clap::Subcommand;
use embers_core::{Counts, DayRecord};
use serde::Serialize;

use super::{date_or, print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show the record for a date
    Get {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// Replace the counts of an unlocked day
    Save {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Counts as habit=value pairs
        counts: Vec<String>,
    },
    /// Set one habit's count, clamped to its bounds, keeping the others
    Set {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Habit id
        habit: String,
        /// New count
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Lock a day, optionally replacing its counts
    Complete {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Counts as habit=value pairs
        counts: Vec<String>,
    },
    /// Unlock a completed day
    Unlock {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// List every stored day
    List,
    /// Most recent unlocked day that already has progress
    Open {
        /// Latest date to consider (default: today)
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Serialize)]
struct DayView<'a> {
    date: &'a str,
    #[serde(flatten)]
    record: DayRecord,
}

fn print_day(date: &str, record: DayRecord) -> CliResult {
    print_json(&DayView { date, record })
}

/// Parse `habit=value` pairs into a counts map.
fn parse_counts(pairs: &[String]) -> Result<Counts, String> {
    let mut counts = Counts::new();
    for pair in pairs {
        let (habit, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected habit=value, got '{pair}'"))?;
        let habit = habit.trim();
        if habit.is_empty() {
            return Err(format!("missing habit id in '{pair}'"));
        }
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("invalid count for '{habit}': '{value}'"))?;
        counts.insert(habit.to_string(), value);
    }
    Ok(counts)
}

pub fn run(ctx: &Context, action: DayAction) -> CliResult {
    let store = ctx.ledger();

    match action {
        DayAction::Get { date } => {
            let record = store.get_record(&date)?;
            print_day(&date, record)?;
        }
        DayAction::Save { date, counts } => {
            let record = store.save_record(&date, parse_counts(&counts)?)?;
            print_day(&date, record)?;
        }
        DayAction::Set { date, habit, value } => {
            let definitions = ctx.definitions()?;
            let definition = definitions
                .habits
                .iter()
                .find(|h| h.id == habit)
                .ok_or_else(|| format!("unknown habit: {habit}"))?;

            let mut counts = store.get_record(&date)?.counts;
            counts.insert(habit, definition.clamp_count(value));
            let record = store.save_record(&date, counts)?;
            print_day(&date, record)?;
        }
        DayAction::Complete { date, counts } => {
            let counts = if counts.is_empty() {
                None
            } else {
                Some(parse_counts(&counts)?)
            };
            let record = store.complete_record(&date, counts)?;
            print_day(&date, record)?;
        }
        DayAction::Unlock { date } => {
            let record = store.unlock_record(&date)?;
            print_day(&date, record)?;
        }
        DayAction::List => {
            print_json(&store.list_records()?)?;
        }
        DayAction::Open { date } => {
            let up_to = date_or(date.as_deref(), store.today())?;
            let entries = store.list_records()?;
            print_json(&embers_core::find_open_day_in_progress(&entries, up_to))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs() {
        let counts = parse_counts(&["water=6".into(), " walk = 1 ".into()]).unwrap();
        assert_eq!(counts.get("water"), Some(&6.0));
        assert_eq!(counts.get("walk"), Some(&1.0));
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert!(parse_counts(&["water".into()]).is_err());
        assert!(parse_counts(&["=3".into()]).is_err());
        assert!(parse_counts(&["water=lots".into()]).is_err());
    }
}
