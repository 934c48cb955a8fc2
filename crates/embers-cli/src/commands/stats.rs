use clap::Subcommand;
use embers_core::ledger::parse_iso_date;
use embers_core::{compute_analytics, compute_badge_map, compute_habit_history};

use super::{date_or, print_json, CliResult, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Dashboard analytics for a date
    Analytics {
        /// Date to compute for (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Per-habit history over the whole ledger
    History,
    /// Score and badge per day in a date range
    Badges {
        /// First date (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last date (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
}

pub fn run(ctx: &Context, action: StatsAction) -> CliResult {
    let store = ctx.ledger();
    let definitions = ctx.definitions()?;
    let entries = store.list_records()?;

    match action {
        StatsAction::Analytics { date } => {
            let up_to = date_or(date.as_deref(), store.today())?;
            let analytics =
                compute_analytics(&entries, &definitions.habits, up_to, &definitions.badges);
            print_json(&analytics)?;
        }
        StatsAction::History => {
            print_json(&compute_habit_history(&entries, &definitions.habits))?;
        }
        StatsAction::Badges { from, to } => {
            let map = compute_badge_map(
                &entries,
                &definitions.habits,
                parse_iso_date(&from)?,
                parse_iso_date(&to)?,
                &definitions.badges,
            );
            print_json(&map)?;
        }
    }
    Ok(())
}
