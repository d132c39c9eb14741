//! Game storage with SQLite
//!
//! One row per game in `games`, keyed by `game_id`. Derived columns
//! (`date_time`, `eco`) are filled in after the fact by [`GameStore::reconcile`].

pub mod migrations;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::{Error, Result};
use crate::source::GameRecord;

/// Columns derived from PGN text after a game is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivedColumn {
    DateTime,
    Eco,
}

impl DerivedColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            DerivedColumn::DateTime => "date_time",
            DerivedColumn::Eco => "eco",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub inserted: usize,
    pub existing: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub supplied: usize,
    pub updated: usize,
    /// Identifiers that matched no row
    pub unmatched: usize,
    pub failed: usize,
}

pub struct GameStore {
    conn: Connection,
}

impl GameStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let store = Self { conn };
        migrations::run(&store.conn)?;
        Ok(store)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrations::current_version(&self.conn)
    }

    pub fn has_column(&self, column: &str) -> Result<bool> {
        has_column(&self.conn, "games", column)
    }

    // ============================================
    // GAMES
    // ============================================

    /// Insert games that are not stored yet; stored rows keep their derived columns
    pub fn insert_games(&self, games: &[GameRecord]) -> Result<InsertSummary> {
        let mut summary = InsertSummary::default();
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                r#"INSERT INTO games
                   (game_id, white_player_id, white_rating, black_player_id, black_rating,
                    winner, time_control, end_time, pgn)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                   ON CONFLICT(game_id) DO NOTHING"#,
            )?;

            for game in games {
                let Some(game_id) = game.game_id() else {
                    tracing::warn!("skipping game without uuid or url");
                    summary.skipped += 1;
                    continue;
                };

                let result = stmt.execute(params![
                    game_id,
                    game.white.username,
                    game.white.rating,
                    game.black.username,
                    game.black.rating,
                    game.winner(),
                    game.time_control,
                    game.end_time,
                    game.pgn,
                ]);

                match result {
                    Ok(0) => summary.existing += 1,
                    Ok(_) => summary.inserted += 1,
                    Err(e) => {
                        tracing::error!(game_id = %game_id, "insert failed: {e}");
                        summary.skipped += 1;
                    }
                }
            }
        }
        tx.commit()?;
        Ok(summary)
    }

    /// Write `(game_id, value)` pairs into a derived column.
    ///
    /// A failing row is logged and the rest still apply; everything is
    /// committed once at the end.
    pub fn reconcile(
        &self,
        column: DerivedColumn,
        pairs: &[(String, String)],
    ) -> Result<ReconcileSummary> {
        if !self.has_column(column.as_str())? {
            return Err(Error::MissingColumn(column.as_str()));
        }

        let mut summary = ReconcileSummary {
            supplied: pairs.len(),
            ..Default::default()
        };

        let tx = self.conn.unchecked_transaction()?;
        {
            let sql = format!(
                "UPDATE games SET {} = ?1 WHERE game_id = ?2",
                column.as_str()
            );
            let mut stmt = tx.prepare(&sql)?;

            for (game_id, value) in pairs {
                match stmt.execute(params![value, game_id]) {
                    Ok(0) => {
                        tracing::debug!(game_id = %game_id, column = column.as_str(), "no such game");
                        summary.unmatched += 1;
                    }
                    Ok(_) => summary.updated += 1,
                    Err(e) => {
                        tracing::error!(game_id = %game_id, column = column.as_str(), "update failed: {e}");
                        summary.failed += 1;
                    }
                }
            }
        }
        tx.commit()?;

        if summary.unmatched > 0 {
            tracing::warn!(
                column = column.as_str(),
                unmatched = summary.unmatched,
                "some identifiers matched no stored game"
            );
        }
        tracing::info!(
            column = column.as_str(),
            supplied = summary.supplied,
            updated = summary.updated,
            failed = summary.failed,
            "reconciled"
        );

        Ok(summary)
    }

    // ============================================
    // QUERIES
    // ============================================

    /// Every game the player took part in, either colour, case-insensitive
    pub fn player_games(&self, player: &str) -> Result<Vec<GameRow>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT game_id, white_player_id, white_rating, black_player_id, black_rating,
                      winner, time_control, end_time, date_time, eco, pgn
               FROM games
               WHERE LOWER(white_player_id) = LOWER(?1) OR LOWER(black_player_id) = LOWER(?1)
               ORDER BY date_time, end_time"#,
        )?;

        let rows = stmt.query_map(params![player], |row| {
            Ok(GameRow {
                game_id: row.get(0)?,
                white_player_id: row.get(1)?,
                white_rating: row.get(2)?,
                black_player_id: row.get(3)?,
                black_rating: row.get(4)?,
                winner: row.get(5)?,
                time_control: row.get(6)?,
                end_time: row.get(7)?,
                date_time: row.get(8)?,
                eco: row.get(9)?,
                pgn: row.get(10)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Current value of a derived column for one game
    pub fn derived_value(&self, game_id: &str, column: DerivedColumn) -> Result<Option<String>> {
        let sql = format!("SELECT {} FROM games WHERE game_id = ?", column.as_str());
        let value = self
            .conn
            .query_row(&sql, params![game_id], |row| row.get::<_, Option<String>>(0))
            .optional()?;
        Ok(value.flatten())
    }

    pub fn count_games(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?)
    }
}

pub(crate) fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        params![table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// ============================================
// ROW TYPES
// ============================================

#[derive(Debug, Clone, Default)]
pub struct GameRow {
    pub game_id: String,
    pub white_player_id: Option<String>,
    pub white_rating: Option<i64>,
    pub black_player_id: Option<String>,
    pub black_rating: Option<i64>,
    pub winner: Option<String>,
    pub time_control: Option<String>,
    pub end_time: Option<i64>,
    pub date_time: Option<String>,
    pub eco: Option<String>,
    pub pgn: Option<String>,
}
