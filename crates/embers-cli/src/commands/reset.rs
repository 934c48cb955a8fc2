use std::path::PathBuf;

use chrono::{DateTime, Utc};
use embers_core::DefinitionSet;
use serde::Serialize;

use super::{print_json, CliResult, Context};

#[derive(Serialize)]
struct ResetOutput {
    entries_removed: usize,
    reset_at: DateTime<Utc>,
    definitions_path: PathBuf,
}

/// Replace the ledger with an empty document once the phrase matches, then
/// put the starter definitions back.
pub fn run(ctx: &Context, confirm: &str) -> CliResult {
    let summary = ctx.ledger().reset(confirm)?;
    let definitions_path = ctx.definitions_path();
    DefinitionSet::restore_starter(&definitions_path)?;
    print_json(&ResetOutput {
        entries_removed: summary.entries_removed,
        reset_at: summary.reset_at,
        definitions_path,
    })
}
