//! chess.com published-data API
//!
//! Endpoints:
//!   - {base}/player/{player}/games/archives -> {"archives": [url, ...]}
//!   - {archive url}                         -> {"games": [game, ...]}
//!
//! Every failed call is logged and reads as an empty result. No retries.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{GameRecord, GameSource};
use crate::config::ArchiveConfig;
use crate::error::{attempt, Error, Result};

#[derive(Debug, Deserialize)]
struct ArchiveList {
    #[serde(default)]
    archives: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ArchiveGames {
    #[serde(default)]
    games: Vec<GameRecord>,
}

pub struct ArchiveFetcher {
    client: Client,
    base_url: String,
}

impl ArchiveFetcher {
    pub fn new(config: &ArchiveConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| Error::Network {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn archives_url(&self, player: &str) -> String {
        format!("{}/player/{}/games/archives", self.base_url, player)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().map_err(network)?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            origin: url.to_string(),
            source,
        })
    }

    /// Monthly archive URLs, oldest first as the service lists them
    pub fn list_archives(&self, player: &str) -> Vec<String> {
        let url = self.archives_url(player);
        attempt(
            &format!("listing archives for {player}"),
            self.get_json::<ArchiveList>(&url),
        )
        .ok()
        .map(|list| list.archives)
        .unwrap_or_default()
    }

    pub fn fetch_games(&self, archive_url: &str) -> Vec<GameRecord> {
        let games = attempt(
            &format!("fetching archive {archive_url}"),
            self.get_json::<ArchiveGames>(archive_url),
        )
        .ok()
        .map(|archive| archive.games)
        .unwrap_or_default();

        tracing::debug!(url = archive_url, games = games.len(), "fetched archive");
        games
    }
}

impl GameSource for ArchiveFetcher {
    fn id(&self) -> &str {
        "archive"
    }

    fn description(&self) -> String {
        format!("remote archives at {}", self.base_url)
    }

    fn collect(&self, player: &str) -> Vec<GameRecord> {
        let mut games = vec![];
        for archive_url in self.list_archives(player) {
            games.extend(self.fetch_games(&archive_url));
        }
        games
    }
}

/// `{player}_games_{YYYY}_{MM}` for `.../games/{YYYY}/{MM}`
pub fn batch_label(player: &str, archive_url: &str) -> String {
    let mut segments = archive_url.trim_end_matches('/').rsplit('/');
    let month = segments.next().unwrap_or_default();
    let year = segments.next().unwrap_or_default();
    format!("{player}_games_{year}_{month}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_fetcher() -> ArchiveFetcher {
        // Port 1 on loopback refuses connections immediately
        ArchiveFetcher::new(&ArchiveConfig {
            base_url: "http://127.0.0.1:1/pub/".to_string(),
            user_agent: "chesstats-test".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_archives_url() {
        let fetcher = unreachable_fetcher();
        assert_eq!(
            fetcher.archives_url("hikaru"),
            "http://127.0.0.1:1/pub/player/hikaru/games/archives"
        );
    }

    #[test]
    fn test_network_failure_reads_as_empty() {
        let fetcher = unreachable_fetcher();
        assert!(fetcher.list_archives("hikaru").is_empty());
        assert!(fetcher
            .fetch_games("http://127.0.0.1:1/pub/player/hikaru/games/2024/01")
            .is_empty());
        assert!(fetcher.collect("hikaru").is_empty());
    }

    #[test]
    fn test_batch_label() {
        assert_eq!(
            batch_label(
                "hikaru",
                "https://api.chess.com/pub/player/hikaru/games/2023/07"
            ),
            "hikaru_games_2023_07"
        );
    }

    #[test]
    fn test_archive_bodies_decode() {
        let list: ArchiveList = serde_json::from_str(
            r#"{"archives": ["https://api.chess.com/pub/player/a/games/2024/01"]}"#,
        )
        .unwrap();
        assert_eq!(list.archives.len(), 1);

        let archive: ArchiveGames = serde_json::from_str(r#"{"games": [{"uuid": "g1"}]}"#).unwrap();
        assert_eq!(archive.games[0].game_id().as_deref(), Some("g1"));

        let empty: ArchiveGames = serde_json::from_str("{}").unwrap();
        assert!(empty.games.is_empty());
    }
}
