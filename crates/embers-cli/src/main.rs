use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CliResult, Context};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "EMBERS_LOG";

#[derive(Parser)]
#[command(name = "embers", version, about = "Embers habit ledger CLI")]
struct Cli {
    /// Data directory (defaults to $EMBERS_DATA_DIR, then ~/.config/embers)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day records: read, save, complete and unlock
    Day {
        #[command(subcommand)]
        action: commands::day::DayAction,
    },
    /// Scores, streaks, badges and history
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Export habit history
    Export {
        #[command(subcommand)]
        action: commands::export::ExportAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show the loaded habit definitions and where they came from
    Data,
    /// Delete every day record and restore the starter definitions
    Reset {
        /// Confirmation phrase, must be exactly "DELETE ALL DATA"
        #[arg(long)]
        confirm: String,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult {
    let ctx = Context::resolve(cli.data_dir)?;
    match cli.command {
        Commands::Day { action } => commands::day::run(&ctx, action),
        Commands::Stats { action } => commands::stats::run(&ctx, action),
        Commands::Export { action } => commands::export::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
        Commands::Data => commands::data::run(&ctx),
        Commands::Reset { confirm } => commands::reset::run(&ctx, &confirm),
    }
}

fn main() {
    init_tracing();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
