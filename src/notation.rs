//! PGN tag extraction
//!
//! Only the two tags the pipeline derives columns from are read: `Date` and
//! `ECO`. Both extractors are total: a missing or unusable tag yields a
//! fixed sentinel and a warning, never an error.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::{attempt, Error, Result};

/// Stored when a game carries no usable `Date` tag.
pub const DEFAULT_DATE: &str = "1900-01-01";

/// Stored when a game carries no `ECO` tag.
pub const UNKNOWN_OPENING: &str = "unknown";

fn date_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)\[Date "(\d{4}\.\d{1,2}\.\d{1,2})"\]"#).expect("date tag pattern")
    })
}

fn eco_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)\[ECO\s+"(.*?)"\]"#).expect("eco tag pattern"))
}

/// Strict form of [`extract_date`].
pub fn parse_date(pgn: &str) -> Result<NaiveDate> {
    let raw = date_tag()
        .captures(pgn)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Data("no valid Date tag found in PGN".to_string()))?;

    let date = NaiveDate::parse_from_str(raw, "%Y.%m.%d")
        .map_err(|e| Error::Data(format!("invalid PGN date {raw}: {e}")))?;
    if date.year() < 1 {
        return Err(Error::Data(format!("invalid PGN date {raw}: year out of range")));
    }
    Ok(date)
}

/// Strict form of [`extract_opening_code`].
pub fn parse_opening_code(pgn: &str) -> Result<&str> {
    eco_tag()
        .captures(pgn)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Data("no ECO tag found in PGN".to_string()))
}

/// The game date as `YYYY-MM-DD`, or [`DEFAULT_DATE`].
pub fn extract_date(pgn: &str) -> String {
    attempt("date extraction", parse_date(pgn))
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| DEFAULT_DATE.to_string())
}

/// The ECO opening code verbatim, or [`UNKNOWN_OPENING`].
pub fn extract_opening_code(pgn: &str) -> String {
    attempt("opening extraction", parse_opening_code(pgn))
        .ok()
        .unwrap_or(UNKNOWN_OPENING)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_and_opening_from_compact_tags() {
        let pgn = r#"[Date "2023.3.5"][ECO "B12"]"#;
        assert_eq!(extract_date(pgn), "2023-03-05");
        assert_eq!(extract_opening_code(pgn), "B12");
    }

    #[test]
    fn test_empty_notation_yields_sentinels() {
        assert_eq!(extract_date(""), DEFAULT_DATE);
        assert_eq!(extract_opening_code(""), UNKNOWN_OPENING);
    }

    #[test]
    fn test_full_pgn_header() {
        let pgn = "[Event \"Live Chess\"]\n[Site \"Chess.com\"]\n[Date \"2024.11.17\"]\n\
                   [White \"alice\"]\n[Black \"bob\"]\n[Result \"1-0\"]\n[ECO \"C50\"]\n\
                   [ECOUrl \"https://www.chess.com/openings/Italian-Game\"]\n\n1. e4 e5 1-0";
        assert_eq!(extract_date(pgn), "2024-11-17");
        assert_eq!(extract_opening_code(pgn), "C50");
    }

    #[test]
    fn test_tags_match_case_insensitively() {
        let pgn = r#"[date "2021.12.01"] [eco  "A00"]"#;
        assert_eq!(extract_date(pgn), "2021-12-01");
        assert_eq!(extract_opening_code(pgn), "A00");
    }

    #[test]
    fn test_impossible_date_falls_back() {
        assert_eq!(extract_date(r#"[Date "2023.2.30"]"#), DEFAULT_DATE);
        assert_eq!(extract_date(r#"[Date "2023.13.01"]"#), DEFAULT_DATE);
    }

    #[test]
    fn test_year_zero_falls_back() {
        assert_eq!(extract_date(r#"[Date "0000.1.1"]"#), DEFAULT_DATE);
        assert_eq!(extract_date(r#"[Date "0001.1.1"]"#), "0001-01-01");
    }

    #[test]
    fn test_unknown_date_placeholder_falls_back() {
        assert_eq!(extract_date(r#"[Date "????.??.??"]"#), DEFAULT_DATE);
    }

    #[test]
    fn test_first_tag_wins() {
        let pgn = r#"[ECO "D02"][ECO "E60"][Date "2020.1.2"][Date "2021.3.4"]"#;
        assert_eq!(extract_opening_code(pgn), "D02");
        assert_eq!(extract_date(pgn), "2020-01-02");
    }

    #[test]
    fn test_parse_date_reports_data_failure() {
        let err = parse_date("no tags here").unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::Data);
    }
}
