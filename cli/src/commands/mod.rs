//! CLI Commands

pub mod audits;
pub mod config;
pub mod controls;
pub mod directives;
pub mod documents;
pub mod journal;
pub mod overview;
pub mod report;
pub mod scan;

use anyhow::Context;
use isms_compliance::{ComplianceEngine, EngineConfig, SqliteStore};
use std::path::Path;

/// Engine over the on-disk store
pub type Engine = ComplianceEngine<SqliteStore>;

/// Open the database and make sure the catalogue is loaded
pub fn open_engine(db: &Path, config: &EngineConfig) -> anyhow::Result<Engine> {
    let store = SqliteStore::open(db).with_context(|| format!("opening {}", db.display()))?;
    let engine = ComplianceEngine::new(store, config.clone())?;
    engine.seed_catalog()?;
    Ok(engine)
}
