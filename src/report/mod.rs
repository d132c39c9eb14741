//! Player statistics over a snapshot of stored games
//!
//! Everything here is pure aggregation; [`dashboard`] turns a
//! [`PlayerReport`] into an HTML page.

pub mod dashboard;

use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::notation;
use crate::store::GameRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    White,
    Black,
}

/// Anything other than a recorded win, draws included, counts as a loss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Win,
    Loss,
}

/// One game seen from the player's side
#[derive(Debug, Clone)]
pub struct PlayerGame {
    pub color: Color,
    pub rating: Option<i64>,
    pub outcome: GameOutcome,
    pub date: Option<String>,
    pub end_time: Option<i64>,
    pub time_control: String,
    pub eco: String,
}

impl PlayerGame {
    /// `None` when the player is on neither side of the row
    pub fn from_row(player: &str, row: &GameRow) -> Option<Self> {
        let player = player.to_lowercase();
        let is = |id: &Option<String>| {
            id.as_deref()
                .map(|id| id.to_lowercase() == player)
                .unwrap_or(false)
        };

        let (color, rating) = if is(&row.white_player_id) {
            (Color::White, row.white_rating)
        } else if is(&row.black_player_id) {
            (Color::Black, row.black_rating)
        } else {
            return None;
        };

        let outcome = if is(&row.winner) {
            GameOutcome::Win
        } else {
            GameOutcome::Loss
        };

        let eco = row
            .eco
            .clone()
            .filter(|eco| !eco.is_empty())
            .unwrap_or_else(|| notation::extract_opening_code(row.pgn.as_deref().unwrap_or("")));

        Some(Self {
            color,
            rating,
            outcome,
            date: row.date_time.clone(),
            end_time: row.end_time,
            time_control: row.time_control.clone().unwrap_or_else(|| "unknown".to_string()),
            eco,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WinRate {
    pub games: usize,
    pub wins: usize,
}

impl WinRate {
    fn record(&mut self, outcome: GameOutcome) {
        self.games += 1;
        if outcome == GameOutcome::Win {
            self.wins += 1;
        }
    }

    /// Fraction in 0.0..=1.0; 0.0 with no games
    pub fn rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins as f64 / self.games as f64
        }
    }
}

/// Five-number summary of a rating sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub count: usize,
    pub min: i64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: i64,
}

impl Distribution {
    pub fn from_ratings(ratings: &[i64]) -> Option<Self> {
        let mut sorted = ratings.to_vec();
        sorted.sort_unstable();
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        Some(Self {
            count: sorted.len(),
            min,
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max,
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty
fn quantile(sorted: &[i64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] as f64 + (sorted[upper] - sorted[lower]) as f64 * frac
}

#[derive(Debug, Clone)]
pub struct RatingPoint {
    pub date: Option<String>,
    pub end_time: Option<i64>,
    pub rating: i64,
}

#[derive(Debug, Clone)]
pub struct TimeControlStats {
    pub time_control: String,
    pub ratings: Vec<i64>,
    pub distribution: Distribution,
}

#[derive(Debug, Clone)]
pub struct OpeningStats {
    pub eco: String,
    pub record: WinRate,
}

#[derive(Debug, Clone)]
pub struct PlayerReport {
    pub player: String,
    pub overall: WinRate,
    pub as_white: WinRate,
    pub as_black: WinRate,
    /// Chronological
    pub rating_series: Vec<RatingPoint>,
    pub white_ratings: Vec<i64>,
    pub black_ratings: Vec<i64>,
    pub time_controls: Vec<TimeControlStats>,
    /// Openings played at least `min_opening_games` times, best win rate first
    pub openings: Vec<OpeningStats>,
}

impl PlayerReport {
    pub fn build(player: &str, rows: &[GameRow], config: &ReportConfig) -> Self {
        let mut games: Vec<PlayerGame> = rows
            .iter()
            .filter_map(|row| PlayerGame::from_row(player, row))
            .collect();
        games.sort_by(|a, b| (&a.date, a.end_time).cmp(&(&b.date, b.end_time)));

        let mut overall = WinRate::default();
        let mut as_white = WinRate::default();
        let mut as_black = WinRate::default();
        let mut rating_series = vec![];
        let mut white_ratings = vec![];
        let mut black_ratings = vec![];
        let mut by_time_control: BTreeMap<String, Vec<i64>> = BTreeMap::new();
        let mut by_opening: BTreeMap<String, WinRate> = BTreeMap::new();

        for game in &games {
            overall.record(game.outcome);
            match game.color {
                Color::White => as_white.record(game.outcome),
                Color::Black => as_black.record(game.outcome),
            }
            by_opening
                .entry(game.eco.clone())
                .or_default()
                .record(game.outcome);

            if let Some(rating) = game.rating {
                rating_series.push(RatingPoint {
                    date: game.date.clone(),
                    end_time: game.end_time,
                    rating,
                });
                match game.color {
                    Color::White => white_ratings.push(rating),
                    Color::Black => black_ratings.push(rating),
                }
                by_time_control
                    .entry(game.time_control.clone())
                    .or_default()
                    .push(rating);
            }
        }

        let time_controls = by_time_control
            .into_iter()
            .filter_map(|(time_control, ratings)| {
                let distribution = Distribution::from_ratings(&ratings)?;
                Some(TimeControlStats {
                    time_control,
                    ratings,
                    distribution,
                })
            })
            .collect();

        Self {
            player: player.to_string(),
            overall,
            as_white,
            as_black,
            rating_series,
            white_ratings,
            black_ratings,
            time_controls,
            openings: top_openings(by_opening, config.min_opening_games),
        }
    }

    pub fn white_distribution(&self) -> Option<Distribution> {
        Distribution::from_ratings(&self.white_ratings)
    }

    pub fn black_distribution(&self) -> Option<Distribution> {
        Distribution::from_ratings(&self.black_ratings)
    }

    /// Plain-text rendering for the terminal
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let pct = |rate: f64| format!("{:.2}%", rate * 100.0);

        out.push_str(&format!("\n{}\n", "=".repeat(60)));
        out.push_str(&format!("Player: {}\n", self.player));
        out.push_str(&format!("{}\n", "=".repeat(60)));
        out.push_str(&format!(
            "Total games: {}  Wins: {}  Win rate: {}\n",
            self.overall.games,
            self.overall.wins,
            pct(self.overall.rate())
        ));
        out.push_str(&format!(
            "As white: {} games, {}  |  As black: {} games, {}\n",
            self.as_white.games,
            pct(self.as_white.rate()),
            self.as_black.games,
            pct(self.as_black.rate())
        ));

        if let (Some(first), Some(last)) = (self.rating_series.first(), self.rating_series.last()) {
            out.push_str(&format!(
                "Rating: {} ({}) -> {} ({})\n",
                first.rating,
                first.date.as_deref().unwrap_or("?"),
                last.rating,
                last.date.as_deref().unwrap_or("?")
            ));
        }

        out.push_str(&format!(
            "\n{:<14} {:>6} {:>6} {:>8} {:>8} {:>8} {:>6}\n",
            "Ratings", "Games", "Min", "Q1", "Median", "Q3", "Max"
        ));
        out.push_str(&format!("{}\n", "-".repeat(60)));
        let mut rows: Vec<(String, Distribution)> = vec![];
        if let Some(d) = self.white_distribution() {
            rows.push(("as white".to_string(), d));
        }
        if let Some(d) = self.black_distribution() {
            rows.push(("as black".to_string(), d));
        }
        rows.extend(
            self.time_controls
                .iter()
                .map(|tc| (tc.time_control.clone(), tc.distribution)),
        );
        for (label, d) in rows {
            out.push_str(&format!(
                "{:<14} {:>6} {:>6} {:>8.1} {:>8.1} {:>8.1} {:>6}\n",
                label, d.count, d.min, d.q1, d.median, d.q3, d.max
            ));
        }

        out.push('\n');
        if self.openings.is_empty() {
            out.push_str("No opening played often enough to rank.\n");
        } else {
            out.push_str(&format!("{:<10} {:>6} {:>6} {:>9}\n", "ECO", "Games", "Wins", "Win rate"));
            out.push_str(&format!("{}\n", "-".repeat(34)));
            for opening in &self.openings {
                out.push_str(&format!(
                    "{:<10} {:>6} {:>6} {:>9}\n",
                    opening.eco,
                    opening.record.games,
                    opening.record.wins,
                    pct(opening.record.rate())
                ));
            }
        }

        out
    }
}

/// Keep openings with at least `min_games` games, best win rate first
pub fn top_openings(by_opening: BTreeMap<String, WinRate>, min_games: usize) -> Vec<OpeningStats> {
    let mut openings: Vec<OpeningStats> = by_opening
        .into_iter()
        .filter(|(_, record)| record.games >= min_games)
        .map(|(eco, record)| OpeningStats { eco, record })
        .collect();

    openings.sort_by(|a, b| {
        b.record
            .rate()
            .total_cmp(&a.record.rate())
            .then(b.record.games.cmp(&a.record.games))
            .then(a.eco.cmp(&b.eco))
    });
    openings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: usize, white: &str, black: &str, winner: &str, eco: &str) -> GameRow {
        GameRow {
            game_id: format!("g{id}"),
            white_player_id: Some(white.to_string()),
            white_rating: Some(1000 + id as i64),
            black_player_id: Some(black.to_string()),
            black_rating: Some(2000 + id as i64),
            winner: Some(winner.to_string()),
            time_control: Some("600".to_string()),
            end_time: Some(id as i64),
            date_time: Some(format!("2024-01-{:02}", id % 28 + 1)),
            eco: Some(eco.to_string()),
            pgn: None,
        }
    }

    fn config() -> ReportConfig {
        ReportConfig::default()
    }

    #[test]
    fn test_win_rate_six_of_ten() {
        let rows: Vec<GameRow> = (0..10)
            .map(|i| {
                let winner = if i < 6 { "ada" } else { "bob" };
                row(i, "ada", "bob", winner, "B12")
            })
            .collect();

        let report = PlayerReport::build("ada", &rows, &config());
        assert_eq!(report.overall.games, 10);
        assert_eq!(report.overall.wins, 6);
        assert!((report.overall.rate() - 0.60).abs() < 1e-9);
    }

    #[test]
    fn test_color_split_and_case_insensitive_winner() {
        let rows = vec![
            row(1, "Ada", "bob", "ADA", "B12"),
            row(2, "bob", "ada", "bob", "B12"),
            row(3, "bob", "ada", "Ada", "B12"),
            row(4, "bob", "ada", "draw", "B12"),
        ];
        let report = PlayerReport::build("ada", &rows, &config());

        assert_eq!(report.as_white, WinRate { games: 1, wins: 1 });
        assert_eq!(report.as_black, WinRate { games: 3, wins: 1 });
        assert_eq!(report.white_ratings, vec![1001]);
        assert_eq!(report.black_ratings, vec![2002, 2003, 2004]);
    }

    #[test]
    fn test_player_match_folds_unicode_case() {
        let rows = vec![row(1, "Ärger", "bob", "ärger", "B12")];
        let report = PlayerReport::build("ÄRGER", &rows, &config());
        assert_eq!(report.as_white, WinRate { games: 1, wins: 1 });
    }

    #[test]
    fn test_ratings_grouped_by_time_control() {
        let mut rows = vec![
            row(1, "ada", "bob", "ada", "B12"),
            row(2, "ada", "bob", "bob", "B12"),
            row(3, "bob", "ada", "ada", "B12"),
            row(4, "ada", "bob", "ada", "B12"),
            row(5, "ada", "bob", "ada", "B12"),
        ];
        rows[0].time_control = Some("180+2".to_string());
        rows[1].time_control = Some("180+2".to_string());
        rows[3].time_control = None;
        rows[4].white_rating = None;

        let report = PlayerReport::build("ada", &rows, &config());

        let labels: Vec<_> = report
            .time_controls
            .iter()
            .map(|tc| tc.time_control.as_str())
            .collect();
        assert_eq!(labels, ["180+2", "600", "unknown"]);

        let blitz = &report.time_controls[0];
        assert_eq!(blitz.ratings, vec![1001, 1002]);
        assert_eq!(blitz.distribution.count, 2);
        assert_eq!(blitz.distribution.min, 1001);
        assert_eq!(blitz.distribution.max, 1002);

        // unrated game 5 is counted in win rates but not in ratings
        let rapid = &report.time_controls[1];
        assert_eq!(rapid.ratings, vec![2003]);
        assert_eq!(rapid.distribution.count, 1);
        assert_eq!(rapid.distribution.min, 2003);
        assert_eq!(rapid.distribution.max, 2003);

        let unknown = &report.time_controls[2];
        assert_eq!(unknown.ratings, vec![1004]);
        assert_eq!(unknown.distribution.count, 1);

        assert_eq!(report.overall.games, 5);
    }

    #[test]
    fn test_empty_split_has_zero_rate() {
        let rows = vec![row(1, "ada", "bob", "ada", "B12")];
        let report = PlayerReport::build("ada", &rows, &config());
        assert_eq!(report.as_black.games, 0);
        assert_eq!(report.as_black.rate(), 0.0);
    }

    #[test]
    fn test_opening_threshold_boundary() {
        let mut rows = vec![];
        for i in 0..24 {
            rows.push(row(i, "ada", "bob", "ada", "B12"));
        }
        for i in 100..125 {
            rows.push(row(i, "ada", "bob", "bob", "C50"));
        }

        let report = PlayerReport::build("ada", &rows, &config());
        let codes: Vec<_> = report.openings.iter().map(|o| o.eco.as_str()).collect();
        assert_eq!(codes, vec!["C50"]);
        assert_eq!(report.openings[0].record.games, 25);
    }

    #[test]
    fn test_openings_sorted_by_win_rate() {
        let mut by_opening = BTreeMap::new();
        by_opening.insert("A00".to_string(), WinRate { games: 30, wins: 10 });
        by_opening.insert("B12".to_string(), WinRate { games: 40, wins: 30 });
        by_opening.insert("C50".to_string(), WinRate { games: 5, wins: 5 });

        let ranked = top_openings(by_opening, 25);
        let codes: Vec<_> = ranked.iter().map(|o| o.eco.as_str()).collect();
        assert_eq!(codes, vec!["B12", "A00"]);
    }

    #[test]
    fn test_rating_series_is_chronological() {
        let mut late = row(1, "ada", "bob", "ada", "B12");
        late.date_time = Some("2024-05-01".into());
        let mut early = row(2, "ada", "bob", "ada", "B12");
        early.date_time = Some("2023-05-01".into());

        let report = PlayerReport::build("ada", &[late, early], &config());
        let dates: Vec<_> = report
            .rating_series
            .iter()
            .map(|p| p.date.clone().unwrap())
            .collect();
        assert_eq!(dates, vec!["2023-05-01", "2024-05-01"]);
    }

    #[test]
    fn test_missing_eco_column_falls_back_to_pgn() {
        let mut r = row(1, "ada", "bob", "ada", "");
        r.eco = None;
        r.pgn = Some("[ECO \"D02\"]".into());
        let game = PlayerGame::from_row("ada", &r).unwrap();
        assert_eq!(game.eco, "D02");
    }

    #[test]
    fn test_distribution_quartiles() {
        let d = Distribution::from_ratings(&[1200, 1000, 1100, 1300, 1400]).unwrap();
        assert_eq!(d.count, 5);
        assert_eq!(d.min, 1000);
        assert_eq!(d.max, 1400);
        assert_eq!(d.median, 1200.0);
        assert_eq!(d.q1, 1100.0);
        assert_eq!(d.q3, 1300.0);
        assert!(Distribution::from_ratings(&[]).is_none());
    }

    #[test]
    fn test_render_text_mentions_totals() {
        let rows = vec![row(1, "ada", "bob", "ada", "B12")];
        let text = PlayerReport::build("ada", &rows, &config()).render_text();
        assert!(text.contains("Player: ada"));
        assert!(text.contains("Win rate: 100.00%"));
        assert!(text.contains("No opening played often enough to rank."));
    }
}
