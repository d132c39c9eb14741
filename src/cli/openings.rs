//! Openings command implementation

use anyhow::{Context, Result};

use crate::error::attempt;
use crate::ledger::{Ledger, LedgerEntry};
use crate::source::{GameRecord, LocalArchive};
use crate::store::{DerivedColumn, GameStore};
use crate::Config;

/// One ledger entry per identifiable game; no PGN reads as "unknown"
pub fn opening_entries(player: &str, games: &[GameRecord]) -> Vec<LedgerEntry> {
    games
        .iter()
        .filter_map(|game| {
            Some(LedgerEntry {
                player: player.to_string(),
                game_id: game.game_id()?,
                eco_code: game.opening_code(),
            })
        })
        .collect()
}

pub fn run(config: &Config, player: &str) -> Result<()> {
    let games = LocalArchive::new(config.data_dir()).read_games(player);
    let entries = opening_entries(player, &games);

    let ledger = Ledger::new(config.ledger_path());
    if let Some(summary) = attempt("updating opening ledger", ledger.append(&entries)).ok() {
        println!(
            "📒 Ledger {}: {} new entries, {} total",
            ledger.path().display(),
            summary.appended,
            summary.total
        );
    }

    if entries.is_empty() {
        tracing::warn!(player, "no opening data to update in the database");
        return Ok(());
    }

    let pairs: Vec<(String, String)> = entries
        .into_iter()
        .map(|entry| (entry.game_id, entry.eco_code))
        .collect();

    let store = GameStore::open(&config.database_path()).context("failed to open game database")?;
    let summary = store.reconcile(DerivedColumn::Eco, &pairs)?;

    println!(
        "♟️  Openings: {} updated, {} not in database, {} failed",
        summary.updated, summary.unmatched, summary.failed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_for_every_identifiable_game() {
        let games = vec![
            GameRecord {
                url: Some("https://www.chess.com/game/live/111".into()),
                pgn: Some("[ECO \"A45\"]".into()),
                ..Default::default()
            },
            GameRecord {
                uuid: Some("g2".into()),
                ..Default::default()
            },
            GameRecord::default(),
        ];

        let entries = opening_entries("ada", &games);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].game_id, "111");
        assert_eq!(entries[0].eco_code, "A45");
        assert_eq!(entries[1].eco_code, "unknown");
        assert!(entries.iter().all(|e| e.player == "ada"));
    }
}
