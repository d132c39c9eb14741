//! Dates command implementation

use anyhow::{Context, Result};

use crate::source::{GameRecord, LocalArchive};
use crate::store::{DerivedColumn, GameStore};
use crate::Config;

/// `(game_id, YYYY-MM-DD)` for every game that carries PGN text
pub fn date_pairs(games: &[GameRecord]) -> Vec<(String, String)> {
    games
        .iter()
        .filter(|game| game.pgn.is_some())
        .filter_map(|game| Some((game.game_id()?, game.date())))
        .collect()
}

pub fn run(config: &Config, player: &str) -> Result<()> {
    let games = LocalArchive::new(config.data_dir()).read_games(player);
    let pairs = date_pairs(&games);
    tracing::info!(player, dates = pairs.len(), "extracted dates");

    if pairs.is_empty() {
        tracing::error!(player, "no valid dates found to update the database");
        return Ok(());
    }

    let store = GameStore::open(&config.database_path()).context("failed to open game database")?;
    let summary = store.reconcile(DerivedColumn::DateTime, &pairs)?;

    println!(
        "🗓️  Dates: {} updated, {} not in database, {} failed",
        summary.updated, summary.unmatched, summary.failed
    );
    Ok(())
}
