use super::{print_json, CliResult, Context};

/// Print the definitions with their file path and modification time.
pub fn run(ctx: &Context) -> CliResult {
    print_json(&ctx.definition_source()?)
}
