//! Report command implementation

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::report::{dashboard, PlayerReport};
use crate::store::GameStore;
use crate::Config;

pub fn run(config: &Config, player: &str, html: Option<&Path>) -> Result<()> {
    let store = GameStore::open(&config.database_path()).context("failed to open game database")?;
    let rows = store.player_games(player)?;

    if rows.is_empty() {
        bail!("no games found in the database for player '{}'", player);
    }

    let report = PlayerReport::build(player, &rows, &config.report);
    print!("{}", report.render_text());

    if let Some(path) = html {
        dashboard::write(&report, config.report.top_openings, path)?;
        println!("\n📈 Dashboard written to {}", path.display());
    }

    Ok(())
}
