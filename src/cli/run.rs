//! Run command: every stage in order for one player

use anyhow::{bail, Result};
use std::path::Path;

use super::load::SourceKind;
use super::{dates, fetch, load, openings, report};
use crate::Config;

/// Run one stage; a failure is logged and reported as `false`
fn stage(name: &str, player: &str, body: impl FnOnce() -> Result<()>) -> bool {
    println!("\n🔄 Running {} for {}...", name, player);
    match body() {
        Ok(()) => {
            println!("✅ {} complete.", name);
            true
        }
        Err(e) => {
            tracing::error!(stage = name, player, "{e:#}");
            false
        }
    }
}

pub fn run(config: &Config, player: &str, html: Option<&Path>) -> Result<()> {
    let results = [
        stage("fetch", player, || fetch::run(config, player)),
        stage("load", player, || load::run(config, player, SourceKind::Local)),
        stage("dates", player, || dates::run(config, player)),
        stage("openings", player, || openings::run(config, player)),
        stage("report", player, || report::run(config, player, html)),
    ];

    let failed = results.iter().filter(|ok| !**ok).count();
    if failed > 0 {
        bail!("{} of {} stages failed", failed, results.len());
    }
    Ok(())
}
