//! Opening ledger: CSV staging of (player, game_id, eco_code) triples
//!
//! The file is rewritten in full on every append. There is no locking, so
//! only one process may append at a time.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub player: String,
    pub game_id: String,
    pub eco_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    pub appended: usize,
    pub total: usize,
}

pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries in file order; a missing file is an empty ledger
    pub fn read(&self) -> Result<Vec<LedgerEntry>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let entries = reader.deserialize().collect::<Result<Vec<LedgerEntry>, _>>()?;
        Ok(entries)
    }

    /// Merge `entries` after the existing ones and rewrite the file
    pub fn append(&self, entries: &[LedgerEntry]) -> Result<AppendSummary> {
        if entries.is_empty() {
            tracing::warn!(path = %self.path.display(), "no opening data to append");
            let total = self.read()?.len();
            return Ok(AppendSummary { appended: 0, total });
        }

        let existing = self.read()?;
        let before = existing.len();
        let merged = merge(existing, entries.iter().cloned());
        self.write(&merged)?;

        let summary = AppendSummary {
            appended: merged.len() - before,
            total: merged.len(),
        };
        tracing::info!(
            path = %self.path.display(),
            appended = summary.appended,
            total = summary.total,
            "ledger updated"
        );
        Ok(summary)
    }

    fn write(&self, entries: &[LedgerEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        for entry in entries {
            writer.serialize(entry)?;
        }
        writer.flush().map_err(|e| Error::io(&self.path, e))?;
        Ok(())
    }
}

/// Concatenate and drop repeated (player, game_id) keys, keeping the first
pub fn merge(
    existing: Vec<LedgerEntry>,
    incoming: impl IntoIterator<Item = LedgerEntry>,
) -> Vec<LedgerEntry> {
    let mut seen = HashSet::new();
    existing
        .into_iter()
        .chain(incoming)
        .filter(|entry| seen.insert((entry.player.clone(), entry.game_id.clone())))
        .collect()
}
