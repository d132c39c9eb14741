use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use chesstats::cli::load::SourceKind;
use chesstats::cli::{dates, fetch, load, openings, report, resolve_player, run};
use chesstats::config::Config;

#[derive(Parser)]
#[command(name = "chesstats")]
#[command(about = "Chess.com game history extraction and statistics tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "chesstats.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Download monthly archives into local batch files
    Fetch {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,
    },

    /// Store games in the database
    Load {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,

        /// Read local batch files or the archive service
        #[arg(long, value_enum, default_value_t = SourceKind::Local)]
        source: SourceKind,
    },

    /// Extract game dates from PGN and update the database
    Dates {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,
    },

    /// Extract opening codes, stage them in the ledger and update the database
    Openings {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,
    },

    /// Show statistics
    Report {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,

        /// Also write an HTML dashboard to this path
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Run every stage in order
    Run {
        /// Chess.com username (prompted for when omitted)
        player: Option<String>,

        /// Also write an HTML dashboard to this path
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        tracing::warn!("ignoring unreadable config: {e:#}");
        Config::default()
    });

    match cli.command {
        Commands::Fetch { player } => {
            fetch::run(&config, &resolve_player(player)?)?;
        }
        Commands::Load { player, source } => {
            load::run(&config, &resolve_player(player)?, source)?;
        }
        Commands::Dates { player } => {
            dates::run(&config, &resolve_player(player)?)?;
        }
        Commands::Openings { player } => {
            openings::run(&config, &resolve_player(player)?)?;
        }
        Commands::Report { player, html } => {
            report::run(&config, &resolve_player(player)?, html.as_deref())?;
        }
        Commands::Run { player, html } => {
            run::run(&config, &resolve_player(player)?, html.as_deref())?;
        }
    }

    Ok(())
}
