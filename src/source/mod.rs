//! Game sources and the game record they produce
//!
//! Two sources exist:
//! - Archive: chess.com published-data API, one request per monthly archive
//! - Local: JSON batches previously written to `{data_dir}/{player}/`
//!
//! Both yield [`GameRecord`]s in the chess.com wire shape, so a batch file is
//! exactly what the API returned for one month.

mod archive;
mod local;

pub use archive::{batch_label, ArchiveFetcher};
pub use local::LocalArchive;

use serde::{Deserialize, Serialize};

use crate::notation;

/// Declared winner of a game no side won.
pub const DRAW: &str = "draw";

/// One side of a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<i64>,
    /// "win", "checkmated", "resigned", "agreed", "timeout", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Participant {
    fn won(&self) -> bool {
        self.result.as_deref() == Some("win")
    }
}

/// A finished game as published by the archive service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pgn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_class: Option<String>,
    /// Unix seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated: Option<bool>,
    #[serde(default)]
    pub white: Participant,
    #[serde(default)]
    pub black: Participant,
}

impl GameRecord {
    /// `uuid` if present, else the last path segment of `url`
    pub fn game_id(&self) -> Option<String> {
        if let Some(uuid) = self.uuid.as_deref().filter(|u| !u.is_empty()) {
            return Some(uuid.to_string());
        }
        self.url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .filter(|segment| !segment.is_empty())
            .map(String::from)
    }

    /// Username of the winning side, or [`DRAW`]
    pub fn winner(&self) -> String {
        if self.white.won() {
            self.white.username.clone()
        } else if self.black.won() {
            self.black.username.clone()
        } else {
            DRAW.to_string()
        }
    }

    pub fn pgn_or_empty(&self) -> &str {
        self.pgn.as_deref().unwrap_or("")
    }

    pub fn date(&self) -> String {
        notation::extract_date(self.pgn_or_empty())
    }

    pub fn opening_code(&self) -> String {
        notation::extract_opening_code(self.pgn_or_empty())
    }
}

/// Where game records come from
pub trait GameSource {
    /// Short identifier used in logs: "archive", "local"
    fn id(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> String;

    /// Collect every game of a player this source can see.
    ///
    /// Failures are logged and skipped; the result holds whatever was
    /// collected before and after them.
    fn collect(&self, player: &str) -> Vec<GameRecord>;
}

/// Trim and lower-case a player identifier
pub fn normalize_player(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GameRecord {
        serde_json::from_str(
            r#"{
                "url": "https://www.chess.com/game/live/98765432100",
                "pgn": "[Date \"2024.01.09\"]\n[ECO \"B01\"]\n\n1. e4 d5 0-1",
                "time_control": "600",
                "end_time": 1704800000,
                "rated": true,
                "uuid": "8a1b2c3d-0000-11ee-9f8a-6cfe544c0428",
                "time_class": "rapid",
                "rules": "chess",
                "white": {"rating": 1210, "result": "resigned", "@id": "x", "username": "Alice"},
                "black": {"rating": 1250, "result": "win", "@id": "y", "username": "bob"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_chess_com_game() {
        let game = sample();
        assert_eq!(game.white.username, "Alice");
        assert_eq!(game.black.rating, Some(1250));
        assert_eq!(game.time_class.as_deref(), Some("rapid"));
        assert_eq!(game.winner(), "bob");
        assert_eq!(game.date(), "2024-01-09");
        assert_eq!(game.opening_code(), "B01");
    }

    #[test]
    fn test_game_id_prefers_uuid() {
        let game = sample();
        assert_eq!(
            game.game_id().as_deref(),
            Some("8a1b2c3d-0000-11ee-9f8a-6cfe544c0428")
        );
    }

    #[test]
    fn test_game_id_falls_back_to_url() {
        let game = GameRecord {
            uuid: None,
            ..sample()
        };
        assert_eq!(game.game_id().as_deref(), Some("98765432100"));

        let bare = GameRecord::default();
        assert_eq!(bare.game_id(), None);
    }

    #[test]
    fn test_draw_has_no_winning_side() {
        let mut game = sample();
        game.white.result = Some("agreed".into());
        game.black.result = Some("agreed".into());
        assert_eq!(game.winner(), DRAW);
    }

    #[test]
    fn test_missing_pgn_yields_sentinels() {
        let game = GameRecord::default();
        assert_eq!(game.date(), notation::DEFAULT_DATE);
        assert_eq!(game.opening_code(), notation::UNKNOWN_OPENING);
    }

    #[test]
    fn test_normalize_player() {
        assert_eq!(normalize_player("  MagnusCarlsen \n"), "magnuscarlsen");
    }
}
