use std::path::PathBuf;

use clap::Subcommand;
use embers_core::{compute_habit_history, generate_csv};

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ExportAction {
    /// Habit history as CSV
    Csv {
        /// Write to a file instead of stdout. Without a path, uses
        /// `export.file_name` inside the data directory.
        #[arg(long, num_args = 0..=1, value_name = "PATH")]
        output: Option<Option<PathBuf>>,
    },
}

pub fn run(ctx: &Context, action: ExportAction) -> CliResult {
    match action {
        ExportAction::Csv { output } => {
            let store = ctx.ledger();
            let definitions = ctx.definitions()?;
            let entries = store.list_records()?;
            let history = compute_habit_history(&entries, &definitions.habits);
            let csv = generate_csv(&history, &ctx.config.export.title, store.today())?;

            match output {
                None => print!("{csv}"),
                Some(path) => {
                    let path =
                        path.unwrap_or_else(|| ctx.data_dir.join(&ctx.config.export.file_name));
                    std::fs::write(&path, csv)?;
                    println!("exported {} habits to {}", history.len(), path.display());
                }
            }
        }
    }
    Ok(())
}
