//! Fetch command implementation

use anyhow::Result;

use crate::error::attempt;
use crate::source::{batch_label, ArchiveFetcher, LocalArchive};
use crate::Config;

pub fn run(config: &Config, player: &str) -> Result<()> {
    let fetcher = ArchiveFetcher::new(&config.archive)?;
    let local = LocalArchive::new(config.data_dir());

    println!("🌐 Listing archives for {}...", player);
    let archives = fetcher.list_archives(player);
    if archives.is_empty() {
        println!("No archives found for {}.", player);
        return Ok(());
    }
    println!("   Found {} monthly archives", archives.len());

    let mut batches = 0;
    let mut total = 0;
    for archive_url in &archives {
        let games = fetcher.fetch_games(archive_url);
        if games.is_empty() {
            continue;
        }

        let label = batch_label(player, archive_url);
        let written = attempt(
            &format!("writing batch {label}"),
            local.write_batch(player, &label, &games),
        );
        if let Some(path) = written.ok() {
            println!("   → {} ({} games)", path.display(), games.len());
            batches += 1;
            total += games.len();
        }
    }

    println!("✅ Fetched {} games into {} batches", total, batches);
    Ok(())
}
