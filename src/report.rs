//! Plain-text rendering of the analysis results.
//!
//! Every function returns the text instead of printing it, so `main` decides where
//! it goes.

use analytics::{
    Distribution, ExtremeAssetStats, ExtremeSummary, GroupStats, PercentilePoint, RangeSummary,
    TradeSummary,
};
use analyzer::{Advice, StopLossImpact};
use comfy_table::{presets::UTF8_FULL, Table};
use core_types::TradeStatus;
use loader::Loaded;
use std::fmt::Write;

/// Printed whenever an analysis ends without any usable record.
pub const NO_DATA: &str = "No valid data found for analysis.";

const TALLIED_STATUSES: [&str; 3] = [
    TradeStatus::TAKE_PROFIT,
    TradeStatus::STOP_LOSS,
    TradeStatus::FORCE_CLEAR,
];

pub fn section(title: &str) -> String {
    format!("\n=== {title} ===")
}

/// File failures followed by the row counts of a load.
pub fn load_status<R>(loaded: &Loaded<R>) -> String {
    let mut out = String::new();
    for failure in &loaded.failures {
        let _ = writeln!(out, "Error reading {}: {failure}", failure.path().display());
    }
    let _ = write!(
        out,
        "Loaded {} records from {} rows ({} rejected)",
        loaded.records.len(),
        loaded.rows_read,
        loaded.rejected
    );
    out
}

pub fn extreme_summary(summary: &ExtremeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Samples: {}", summary.samples);
    let _ = writeln!(out, "Average min ask: {:.4}", summary.avg_min_ask);
    let _ = writeln!(out, "Average rebound duration: {:.2} s", summary.avg_rebound_duration);
    let _ = writeln!(out, "Average total low duration: {:.2} s", summary.avg_total_low_duration);
    let _ = writeln!(
        out,
        "Volatile events: {} ({})",
        summary.volatile_count,
        percent(summary.volatile_ratio)
    );
    let _ = write!(out, "Min ask percentiles: {}", percentile_line(&summary.min_ask_percentiles));
    out
}

pub fn extreme_assets(rows: &[ExtremeAssetStats]) -> Table {
    let mut table = new_table(&["Asset", "Samples", "Avg min ask", "Avg rebound (s)", "Volatile"]);
    for row in rows {
        table.add_row(vec![
            row.asset.clone(),
            row.samples.to_string(),
            format!("{:.4}", row.avg_min_ask),
            format!("{:.2}", row.avg_rebound_duration),
            percent(row.volatile_ratio),
        ]);
    }
    table
}

pub fn range_summary(summary: &RangeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Samples: {}", summary.samples);
    let _ = writeln!(out, "Average min ask: {:.4}", summary.avg_min_ask);
    let _ = writeln!(out, "Average max ask: {:.4}", summary.avg_max_ask);
    let _ = writeln!(out, "Average range: {:.4}", summary.avg_range);
    let _ = write!(out, "Range percentiles: {}", percentile_line(&summary.range_percentiles));
    out
}

pub fn trade_summary(summary: &TradeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total trades: {}", summary.total_trades);
    let _ = writeln!(
        out,
        "Take profit: {} | Stop loss: {} | Force clear: {}",
        summary.take_profit, summary.stop_loss, summary.force_clear
    );
    let other: Vec<String> = summary
        .status_counts
        .iter()
        .filter(|(status, _)| !TALLIED_STATUSES.contains(&status.as_str()))
        .map(|(status, count)| format!("{}: {count}", display_status(status)))
        .collect();
    if !other.is_empty() {
        let _ = writeln!(out, "Other statuses: {}", other.join(" | "));
    }
    let _ = writeln!(out, "Win rate: {}", percent(summary.win_rate));
    let _ = writeln!(out, "Average flash drop: {}", optional(summary.avg_flash_drop, 4));
    let _ = writeln!(out, "Average flash duration: {} s", optional(summary.avg_flash_duration, 1));
    let _ = write!(out, "Average hold duration: {} s", optional(summary.avg_hold_duration, 1));
    if !summary.params_used.is_empty() {
        let _ = write!(
            out,
            "\nParameter sets (window/drop/tp/sl): {}",
            summary.params_used.join(", ")
        );
    }
    if let Some(distribution) = &summary.flash_drop_distribution {
        let _ = write!(out, "\nFlash drop distribution: {}", distribution_line(distribution));
    }
    out
}

/// A table of per-group trade statistics. `key_cells` renders the leading key columns.
pub fn group_table<K>(
    key_headers: &[&str],
    groups: &[GroupStats<K>],
    key_cells: impl Fn(&K) -> Vec<String>,
) -> Table {
    let mut headers = key_headers.to_vec();
    headers.extend(["Trades", "Win rate", "Avg drop", "Avg hold (s)"]);
    let mut table = new_table(&headers);
    for group in groups {
        let mut row = key_cells(&group.key);
        row.push(group.trades.to_string());
        row.push(percent(group.win_rate));
        row.push(optional(group.avg_flash_drop, 4));
        row.push(optional(group.avg_hold_duration, 1));
        table.add_row(row);
    }
    table
}

pub fn advice(advice: &Advice) -> String {
    format!("Suggestions:\n{advice}")
}

pub fn stop_loss_table(impacts: &[StopLossImpact]) -> Table {
    let mut table = new_table(&[
        "Asset",
        "Trades",
        "TP",
        "SL",
        "Win rate",
        "Follow-ups",
        "Follow-up TP",
        "Follow-up SL",
        "Follow-up win rate",
    ]);
    for impact in impacts {
        table.add_row(vec![
            impact.asset.clone(),
            impact.trades.to_string(),
            impact.wins.to_string(),
            impact.losses.to_string(),
            percent(impact.overall_win_rate),
            impact.follow_ups.to_string(),
            impact.follow_up_wins.to_string(),
            impact.follow_up_losses.to_string(),
            impact.follow_up_win_rate.map_or_else(|| "n/a".to_string(), percent),
        ]);
    }
    table
}

pub fn verdicts(impacts: &[StopLossImpact]) -> String {
    impacts
        .iter()
        .map(|impact| format!("{}: {}", impact.asset, impact.verdict))
        .collect::<Vec<_>>()
        .join("\n")
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(headers.to_vec());
    table
}

fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.decimals$}"))
}

fn display_status(status: &str) -> &str {
    if status.is_empty() { "(blank)" } else { status }
}

fn percentile_line(points: &[PercentilePoint]) -> String {
    points
        .iter()
        .map(|p| format!("{}: {:.4}", p.label(), p.value))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn distribution_line(d: &Distribution) -> String {
    let mut line = format!(
        "count {}, mean {:.4}, std {}, min {:.4}",
        d.count,
        d.mean,
        optional(d.std_dev, 4),
        d.min
    );
    if !d.percentiles.is_empty() {
        let _ = write!(line, ", {}", percentile_line(&d.percentiles));
    }
    let _ = write!(line, ", max {:.4}", d.max);
    line
}
