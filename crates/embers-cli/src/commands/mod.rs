//! Subcommand handlers and the state they share.

use std::error::Error;
use std::path::PathBuf;

use chrono::NaiveDate;
use embers_core::ledger::parse_iso_date;
use embers_core::storage;
use embers_core::{
    Config, DefinitionSet, DefinitionSource, JsonFileLedger, LedgerStore, SystemClock,
};
use serde::Serialize;

pub mod config;
pub mod data;
pub mod day;
pub mod export;
pub mod reset;
pub mod stats;

pub type CliResult = Result<(), Box<dyn Error>>;

/// Resolved data directory and the configuration loaded from it.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl Context {
    /// Use `explicit` when given, otherwise the default data directory.
    pub fn resolve(explicit: Option<PathBuf>) -> embers_core::Result<Self> {
        let data_dir = match explicit {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                dir
            }
            None => storage::data_dir()?,
        };
        let config = Config::load(&data_dir)?;
        tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");
        Ok(Self { data_dir, config })
    }

    pub fn ledger(&self) -> LedgerStore<JsonFileLedger, SystemClock> {
        let ledger = JsonFileLedger::new(self.config.ledger_path(&self.data_dir));
        LedgerStore::new(ledger, SystemClock)
    }

    pub fn definitions(&self) -> embers_core::Result<DefinitionSet> {
        Ok(DefinitionSet::open(&self.definitions_path())?)
    }

    pub fn definition_source(&self) -> embers_core::Result<DefinitionSource> {
        Ok(DefinitionSet::open_with_source(&self.definitions_path())?)
    }

    pub fn definitions_path(&self) -> PathBuf {
        self.config.definitions_path(&self.data_dir)
    }
}

/// Parse an optional date argument, falling back to `today`.
pub fn date_or(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate, Box<dyn Error>> {
    match value {
        Some(value) => Ok(parse_iso_date(value)?),
        None => Ok(today),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
