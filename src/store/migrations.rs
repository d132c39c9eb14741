//! Versioned schema migrations
//!
//! Progress is tracked in `PRAGMA user_version`. Each migration runs in its
//! own transaction together with the version bump.

use rusqlite::Connection;

use super::has_column;
use crate::error::Result;

pub enum Step {
    Sql(&'static str),
    /// `ALTER TABLE .. ADD COLUMN`, skipped when a legacy table already has it
    AddColumn {
        table: &'static str,
        column: &'static str,
        decl: &'static str,
    },
}

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub step: Step,
}

const CREATE_GAMES: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    game_id TEXT PRIMARY KEY,
    white_player_id TEXT,
    white_rating INTEGER,
    black_player_id TEXT,
    black_rating INTEGER,
    winner TEXT,                 -- winning username or 'draw'
    time_control TEXT,           -- '600', '180+2', '1/86400'
    end_time INTEGER,            -- unix seconds
    pgn TEXT
);

CREATE INDEX IF NOT EXISTS idx_games_white ON games(LOWER(white_player_id));
CREATE INDEX IF NOT EXISTS idx_games_black ON games(LOWER(black_player_id));
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "games",
        step: Step::Sql(CREATE_GAMES),
    },
    Migration {
        version: 2,
        name: "games_date_time",
        step: Step::AddColumn {
            table: "games",
            column: "date_time",
            decl: "DATE",
        },
    },
    Migration {
        version: 3,
        name: "games_eco",
        step: Step::AddColumn {
            table: "games",
            column: "eco",
            decl: "TEXT",
        },
    },
];

pub fn current_version(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

pub fn latest_version() -> i64 {
    MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
}

/// Apply every migration newer than the database; returns how many ran
pub fn run(conn: &Connection) -> Result<usize> {
    let current = current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        match &migration.step {
            Step::Sql(sql) => tx.execute_batch(sql)?,
            Step::AddColumn {
                table,
                column,
                decl,
            } => {
                if has_column(&tx, table, column)? {
                    tracing::info!(table, column, "column already present");
                } else {
                    tx.execute_batch(&format!("ALTER TABLE {table} ADD COLUMN {column} {decl}"))?;
                }
            }
        }
        // PRAGMA does not take bound parameters
        tx.execute_batch(&format!("PRAGMA user_version = {}", migration.version))?;
        tx.commit()?;

        tracing::info!(
            version = migration.version,
            name = migration.name,
            "applied migration"
        );
        applied += 1;
    }

    Ok(applied)
}
