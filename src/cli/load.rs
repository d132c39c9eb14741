//! Load command implementation

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::source::{ArchiveFetcher, GameSource, LocalArchive};
use crate::store::GameStore;
use crate::Config;

/// Where `load` reads games from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Batch files under the data directory
    Local,
    /// The archive service, without writing batch files
    Remote,
}

pub fn source_for(config: &Config, kind: SourceKind) -> Result<Box<dyn GameSource>> {
    let source: Box<dyn GameSource> = match kind {
        SourceKind::Local => Box::new(LocalArchive::new(config.data_dir())),
        SourceKind::Remote => Box::new(ArchiveFetcher::new(&config.archive)?),
    };
    Ok(source)
}

pub fn run(config: &Config, player: &str, kind: SourceKind) -> Result<()> {
    let source = source_for(config, kind)?;
    println!("📥 Collecting games for {} from {}", player, source.description());

    let games = source.collect(player);
    if games.is_empty() {
        tracing::warn!(player, source = source.id(), "no games to load");
        return Ok(());
    }

    let store = GameStore::open(&config.database_path()).context("failed to open game database")?;
    let summary = store.insert_games(&games)?;

    println!(
        "✅ Loaded {} new games ({} already stored, {} skipped)",
        summary.inserted, summary.existing, summary.skipped
    );
    Ok(())
}
