use analytics::{AnalyticsEngine, AnalyticsError};
use configuration::AnalysisConfig;
use loader::{load_extreme_events, load_range_samples, load_trade_outcomes};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const TRADE_HEADER: &str = "asset,direction,status,anchor_price,buy_price,sell_price,anchor_time,buy_time,sell_time,window_start";

fn config_for(dir: &Path) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.input.data_dir = dir.to_path_buf();
    config
}

fn write(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn single_extreme_event_end_to_end() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "single_asset_extremes_trade.csv",
        "asset,min_ask,first_below_04,first_back_above_045,last_below_04\n\
         btc,0.39,2026/01/15 00:46:53,2026/01/15 00:47:10,2026/01/15 00:46:53\n",
    );
    let config = config_for(dir.path());

    let loaded = load_extreme_events(&config);
    assert!(loaded.failures.is_empty());
    assert_eq!(loaded.records.len(), 1);
    let event = &loaded.records[0];
    assert_eq!(event.rebound_duration, 17.0);
    assert!(!event.is_volatile);

    let engine = AnalyticsEngine::new(config.statistics.clone());
    let summary = engine.summarize_extremes(&loaded.records).unwrap();
    assert_eq!(summary.avg_min_ask, 0.39);
    let values: Vec<f64> = summary.min_ask_percentiles.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![0.39, 0.39, 0.39]);
}

#[test]
fn extreme_rows_missing_a_timestamp_are_dropped() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "single_asset_extremes_trade.csv",
        "asset,min_ask,first_below_04,first_back_above_045,last_below_04\n\
         btc,0.39,2026/01/15 00:46:53,2026/01/15 00:47:10,2026/01/15 00:46:53\n\
         eth,0.35,2026/01/15 01:00:00,,2026/01/15 01:00:05\n\
         sol,abc,2026/01/15 02:00:00,2026/01/15 02:00:30,2026/01/15 02:00:10\n",
    );
    let loaded = load_extreme_events(&config_for(dir.path()));
    assert_eq!(loaded.rows_read, 3);
    assert_eq!(loaded.rejected, 2);
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.records[0].asset, "btc");
}

#[test]
fn missing_extremes_file_reports_no_data() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path());

    let loaded = load_extreme_events(&config);
    assert_eq!(loaded.failures.len(), 1);
    assert!(loaded.is_empty());

    let engine = AnalyticsEngine::new(config.statistics.clone());
    assert!(matches!(
        engine.summarize_extremes(&loaded.records),
        Err(AnalyticsError::NoData(_))
    ));
}

#[test]
fn range_samples_average_the_spread() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "single_asset_extremes.csv",
        "min_ask,max_ask\n0.30,0.70\n0.40,0.60\n,0.50\n",
    );
    let config = config_for(dir.path());
    let loaded = load_range_samples(&config);
    assert_eq!(loaded.records.len(), 2);

    let summary = AnalyticsEngine::new(config.statistics.clone())
        .summarize_ranges(&loaded.records)
        .unwrap();
    assert!((summary.avg_range - 0.3).abs() < 1e-12);
}

#[test]
fn trade_files_concatenate_and_feed_the_breakdowns() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "strategy_analysis.csv",
        &format!(
            "{TRADE_HEADER}\n\
             btc,Up,TAKE_PROFIT,0.60,0.50,0.55,2026/01/17 11:39:20,2026/01/17 11:39:24,2026/01/17 11:40:24,2026/01/17 11:30:00\n\
             btc,Up,STOP_LOSS,0.60,0.45,0.40,2026/01/17 12:10:00,2026/01/17 12:10:05,2026/01/17 12:12:05,2026/01/17 12:00:00\n"
        ),
    );
    write(
        &dir,
        "rebound.csv",
        &format!(
            "{TRADE_HEADER}\n\
             eth,Down,FORCE_CLEAR,0.30,oops,,2026/01/17 13:00:00,2026/01/17 13:00:02,,2026/01/17 13:00:00\n"
        ),
    );
    let config = config_for(dir.path());

    let loaded = load_trade_outcomes(&config);
    assert_eq!(loaded.rows_read, 3);
    assert_eq!(loaded.records.len(), 3);
    let assets: Vec<_> = loaded.records.iter().map(|t| t.asset.as_str()).collect();
    assert_eq!(assets, vec!["btc", "btc", "eth"]);
    assert_eq!(loaded.records[2].buy_price, None);
    assert_eq!(loaded.records[2].flash_drop, None);

    let engine = AnalyticsEngine::new(config.statistics.clone());
    let summary = engine.summarize_trades(&loaded.records).unwrap();
    assert_eq!(summary.total_trades, 3);
    assert_eq!(summary.force_clear, 1);
    assert_eq!(summary.win_rate, 0.5);

    let breakdowns = engine.breakdowns(&loaded.records);
    let by_asset: Vec<_> = breakdowns.by_asset.iter().map(|g| (g.key.as_str(), g.trades)).collect();
    assert_eq!(by_asset, vec![("btc", 2), ("eth", 1)]);
    // The eth trade has no usable anchor-to-buy drop but still counts.
    assert_eq!(breakdowns.by_asset[1].avg_flash_drop, None);
    assert_eq!(breakdowns.by_asset[1].win_rate, 0.0);

    let minutes: Vec<_> = breakdowns
        .by_window_minute
        .iter()
        .map(|g| (g.key.0.as_str(), g.key.1))
        .collect();
    assert_eq!(minutes, vec![("btc", 9), ("btc", 10), ("eth", 0)]);
}

#[test]
fn unreadable_trade_file_does_not_stop_its_siblings() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "rebound.csv",
        &format!(
            "{TRADE_HEADER}\n\
             sol,Up,TAKE_PROFIT,0.50,0.40,0.45,2026/01/17 09:00:00,2026/01/17 09:00:03,2026/01/17 09:05:03,2026/01/17 09:00:00\n"
        ),
    );
    let loaded = load_trade_outcomes(&config_for(dir.path()));
    assert_eq!(loaded.failures.len(), 1);
    assert!(loaded.failures[0].path().ends_with("strategy_analysis.csv"));
    assert_eq!(loaded.records.len(), 1);
}

#[test]
fn trade_row_with_invalid_utf8_is_still_counted_and_kept() {
    let dir = TempDir::new().unwrap();
    let mut contents = format!(
        "{TRADE_HEADER}\n\
         btc,Up,TAKE_PROFIT,0.60,0.50,0.55,2026/01/17 11:39:20,2026/01/17 11:39:24,2026/01/17 11:40:24,2026/01/17 11:30:00\n"
    )
    .into_bytes();
    contents.extend_from_slice(
        b"et\xffh,Down,STOP_LOSS,0.40,0.35,0.30,2026/01/17 12:00:00,2026/01/17 12:00:04,2026/01/17 12:03:04,2026/01/17 12:00:00\n",
    );
    contents.extend_from_slice(
        b"sol,Up,FORCE_CLEAR,0.50,0.45,0.46,2026/01/17 13:00:00,2026/01/17 13:00:03,2026/01/17 13:30:00,2026/01/17 13:00:00\n",
    );
    fs::write(dir.path().join("strategy_analysis.csv"), contents).unwrap();
    write(&dir, "rebound.csv", &format!("{TRADE_HEADER}\n"));

    let loaded = load_trade_outcomes(&config_for(dir.path()));
    assert!(loaded.failures.is_empty());
    assert_eq!(loaded.rows_read, 3);
    assert_eq!(loaded.rejected, 0);
    assert_eq!(loaded.records.len(), 3);
    assert_eq!(loaded.records[1].asset, "et\u{FFFD}h");
    assert!(loaded.records[1].status.is_stop_loss());
}
