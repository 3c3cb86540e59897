//! CLI subcommand implementations.

use std::path::PathBuf;

use anyhow::Result;
use bizscout_lib::{DataCollector, Db};

pub mod classify;
pub mod clusters;
pub mod collect;
pub mod export;
pub mod find;
pub mod import;
pub mod outreach_days;
pub mod route;
pub mod schedule;
pub mod search;
pub mod similar;
pub mod tax;

/// Shared state handed to every subcommand.
pub struct Context {
    pub collector: DataCollector,
    pub db_path: PathBuf,
}

impl Context {
    /// Opens the database and applies the schema.
    pub fn open_db(&self) -> Result<Db> {
        let db = Db::open(&self.db_path)?;
        db.init()?;
        Ok(db)
    }
}
