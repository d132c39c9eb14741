//! Local game batches
//!
//! Layout: `{data_dir}/{player}/{player}_games_*.json`, each file a JSON
//! array of games in the archive service's shape.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use super::{GameRecord, GameSource};
use crate::error::{attempt, Error, Result};

pub struct LocalArchive {
    data_dir: PathBuf,
}

impl LocalArchive {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn player_dir(&self, player: &str) -> PathBuf {
        self.data_dir.join(player)
    }

    /// Batch files of a player, sorted by name
    pub fn batch_files(&self, player: &str) -> Vec<PathBuf> {
        let dir = self.player_dir(player);
        if !dir.is_dir() {
            tracing::error!(dir = %dir.display(), "game data directory not found");
            return vec![];
        }

        let pattern = format!(
            "{}/{}_games_*.json",
            Pattern::escape(&dir.to_string_lossy()),
            Pattern::escape(player)
        );

        let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths
                .filter_map(|entry| match entry {
                    Ok(path) => Some(path),
                    Err(e) => {
                        tracing::error!("skipping unreadable batch entry: {e}");
                        None
                    }
                })
                .collect(),
            Err(e) => {
                tracing::error!(pattern = %pattern, "invalid batch pattern: {e}");
                vec![]
            }
        };
        files.sort();
        files
    }

    pub fn read_batch(&self, path: &Path) -> Result<Vec<GameRecord>> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|source| Error::Decode {
            origin: path.display().to_string(),
            source,
        })
    }

    /// Every game from every readable batch of a player
    pub fn read_games(&self, player: &str) -> Vec<GameRecord> {
        let mut games = vec![];
        for path in self.batch_files(player) {
            let batch = attempt(
                &format!("reading {}", path.display()),
                self.read_batch(&path),
            )
            .unwrap_or_default();
            tracing::debug!(file = %path.display(), games = batch.len(), "read batch");
            games.extend(batch);
        }
        games
    }

    /// Write one batch as `{player_dir}/{label}.json`, replacing any previous copy
    pub fn write_batch(&self, player: &str, label: &str, games: &[GameRecord]) -> Result<PathBuf> {
        let dir = self.player_dir(player);
        fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;

        let path = dir.join(format!("{label}.json"));
        let json = serde_json::to_string_pretty(games).map_err(|source| Error::Decode {
            origin: path.display().to_string(),
            source,
        })?;
        fs::write(&path, json).map_err(|e| Error::io(&path, e))?;
        Ok(path)
    }
}

impl GameSource for LocalArchive {
    fn id(&self) -> &str {
        "local"
    }

    fn description(&self) -> String {
        format!("local batches under {}", self.data_dir.display())
    }

    fn collect(&self, player: &str) -> Vec<GameRecord> {
        self.read_games(player)
    }
}
