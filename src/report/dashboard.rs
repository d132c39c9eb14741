//! Static HTML dashboard
//!
//! Five plotly.js charts, figures built as JSON and drawn client-side:
//! rating over time, rating distribution by colour, win rate by colour,
//! rating by time control and top openings.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use super::{Color, PlayerReport};
use crate::error::{Error, Result};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

struct Figure {
    id: &'static str,
    data: Value,
    layout: Value,
}

fn rating_over_time(report: &PlayerReport) -> Figure {
    let x: Vec<Value> = report
        .rating_series
        .iter()
        .map(|p| match &p.date {
            Some(date) => json!(date),
            None => Value::Null,
        })
        .collect();
    let y: Vec<i64> = report.rating_series.iter().map(|p| p.rating).collect();

    Figure {
        id: "rating-time",
        data: json!([{ "type": "scatter", "mode": "lines+markers", "name": "Rating", "x": x, "y": y }]),
        layout: json!({
            "title": format!("{}'s Rating Over Time", report.player),
            "xaxis": { "title": "Date" },
            "yaxis": { "title": "Rating" },
        }),
    }
}

fn rating_distribution(report: &PlayerReport) -> Figure {
    let mut data = vec![];
    if !report.white_ratings.is_empty() {
        data.push(json!({ "type": "histogram", "name": "Rating as White", "x": report.white_ratings, "opacity": 0.75 }));
    }
    if !report.black_ratings.is_empty() {
        data.push(json!({ "type": "histogram", "name": "Rating as Black", "x": report.black_ratings, "opacity": 0.75 }));
    }

    Figure {
        id: "rating-dist",
        data: Value::Array(data),
        layout: json!({
            "title": format!("{}'s Rating Distribution (White vs. Black)", report.player),
            "xaxis": { "title": "Rating" },
            "yaxis": { "title": "Frequency" },
            "barmode": "overlay",
            "bargap": 0.2,
        }),
    }
}

fn win_rate_by_color(report: &PlayerReport) -> Figure {
    let bar = |color: Color, rate: f64| {
        let label = match color {
            Color::White => "White",
            Color::Black => "Black",
        };
        json!({
            "type": "bar",
            "name": format!("Win Rate as {label}"),
            "x": [label],
            "y": [rate * 100.0],
        })
    };

    Figure {
        id: "win-rate",
        data: json!([
            bar(Color::White, report.as_white.rate()),
            bar(Color::Black, report.as_black.rate()),
        ]),
        layout: json!({
            "title": format!("{}'s Win Rate (White vs. Black)", report.player),
            "yaxis": { "title": "Win Rate (%)", "range": [0, 100] },
        }),
    }
}

fn rating_by_time_control(report: &PlayerReport) -> Figure {
    let data: Vec<Value> = report
        .time_controls
        .iter()
        .map(|tc| json!({ "type": "box", "name": tc.time_control, "y": tc.ratings }))
        .collect();

    Figure {
        id: "rating-tc",
        data: Value::Array(data),
        layout: json!({
            "title": format!("{}'s Rating Distribution by Time Control", report.player),
            "xaxis": { "title": "Time Control" },
            "yaxis": { "title": "Rating" },
        }),
    }
}

fn top_openings(report: &PlayerReport, limit: usize) -> Figure {
    let openings: Vec<_> = report.openings.iter().take(limit).collect();
    let layout_title = format!("{}'s Top ECO Performance", report.player);

    if openings.is_empty() {
        return Figure {
            id: "eco",
            data: json!([]),
            layout: json!({ "title": layout_title }),
        };
    }

    let codes: Vec<&str> = openings.iter().map(|o| o.eco.as_str()).collect();
    let rates: Vec<f64> = openings.iter().map(|o| o.record.rate()).collect();
    let most = openings.iter().map(|o| o.record.games).max().unwrap_or(1).max(1) as f64;
    let scaled: Vec<f64> = openings.iter().map(|o| o.record.games as f64 / most).collect();

    Figure {
        id: "eco",
        data: json!([
            { "type": "bar", "name": "Win Rate", "x": codes, "y": rates },
            {
                "type": "scatter",
                "mode": "lines+markers",
                "name": "Games Played (Scaled)",
                "x": codes,
                "y": scaled,
                "yaxis": "y2",
            },
        ]),
        layout: json!({
            "title": layout_title,
            "xaxis": { "title": "ECO Code" },
            "yaxis": { "title": "Win Rate", "range": [0, 1] },
            "yaxis2": { "title": "Games Played (Scaled)", "overlaying": "y", "side": "right" },
        }),
    }
}

/// JSON safe to inline inside a `<script>` element
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Full HTML page for a report
pub fn render(report: &PlayerReport, top_limit: usize) -> String {
    let figures = [
        rating_over_time(report),
        rating_distribution(report),
        win_rate_by_color(report),
        rating_by_time_control(report),
        top_openings(report, top_limit),
    ];

    let mut divs = String::new();
    let mut scripts = String::new();
    for figure in &figures {
        divs.push_str(&format!("  <div class=\"chart\" id=\"{}\"></div>\n", figure.id));
        scripts.push_str(&format!(
            "  Plotly.newPlot({}, {}, {});\n",
            script_json(&json!(figure.id)),
            script_json(&figure.data),
            script_json(&figure.layout)
        ));
    }

    let player = escape_html(&report.player);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{player} - chess dashboard</title>
  <script src="{PLOTLY_CDN}"></script>
  <style>
    body {{ font-family: sans-serif; margin: 2rem; }}
    .summary span {{ margin-right: 2rem; }}
    .chart {{ max-width: 1100px; height: 480px; margin-bottom: 2rem; }}
  </style>
</head>
<body>
  <h1>{player}</h1>
  <p class="summary">
    <span>Games: {games}</span>
    <span>Wins: {wins}</span>
    <span>Win rate: {rate:.2}%</span>
  </p>
{divs}  <script>
{scripts}  </script>
</body>
</html>
"#,
        games = report.overall.games,
        wins = report.overall.wins,
        rate = report.overall.rate() * 100.0,
    )
}

pub fn write(report: &PlayerReport, top_limit: usize, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, render(report, top_limit)).map_err(|e| Error::io(path, e))
}
