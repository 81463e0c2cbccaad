use analytics::{AnalyticsEngine, AnalyticsError};
use analyzer::{Analyzer, AnalyzerError};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{load_config, AnalysisConfig, InputOverrides};
use core_types::TradeOutcome;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod report;

/// Statistics over hand-exported price-extreme and trade-outcome CSV files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults to `analysis.toml` when it exists.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    inputs: InputOverrides,

    /// Log filter used when RUST_LOG is not set (e.g. "info" or "loader=debug").
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// The analysis to run. Runs every analysis when omitted.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Rebound timing and depth of the extreme events, plus the min/max export.
    Extremes,
    /// Trade outcome statistics, breakdowns and tuning suggestions.
    Trades,
    /// Win rate of trades opened shortly after a stop-loss.
    StopLoss,
    /// Every analysis above.
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("Invalid log filter")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.inputs.apply(&mut config);
    info!(data_dir = %config.input.data_dir.display(), "Configuration loaded");

    let engine = AnalyticsEngine::new(config.statistics.clone());
    let analyzer = Analyzer::new(config.advice.clone());

    match cli.command.unwrap_or(Commands::All) {
        Commands::Extremes => handle_extremes(&config, &engine),
        Commands::Trades => handle_trades(&engine, &analyzer, &load_trades(&config)),
        Commands::StopLoss => handle_stop_loss(&analyzer, &load_trades(&config)),
        Commands::All => {
            handle_extremes(&config, &engine);
            let trades = load_trades(&config);
            handle_trades(&engine, &analyzer, &trades);
            handle_stop_loss(&analyzer, &trades);
        }
    }

    Ok(())
}

// ==============================================================================
// Extremes
// ==============================================================================

fn handle_extremes(config: &AnalysisConfig, engine: &AnalyticsEngine) {
    let path = config.input.extremes_trade_path();
    println!("{}", report::section(&format!("Extreme events: {}", path.display())));
    let events = loader::load_extreme_events(config);
    println!("{}", report::load_status(&events));

    match engine.summarize_extremes(&events.records) {
        Ok(summary) => {
            println!("{}", report::extreme_summary(&summary));
            match engine.extremes_by_asset(&events.records) {
                Ok(rows) => println!("{}", report::extreme_assets(&rows)),
                Err(e) => print_failure(&e),
            }
        }
        Err(e) => print_failure(&e),
    }

    let path = config.input.extremes_path();
    println!("{}", report::section(&format!("Extremes (min/max): {}", path.display())));
    let samples = loader::load_range_samples(config);
    println!("{}", report::load_status(&samples));
    match engine.summarize_ranges(&samples.records) {
        Ok(summary) => println!("{}", report::range_summary(&summary)),
        Err(e) => print_failure(&e),
    }
}

// ==============================================================================
// Trades
// ==============================================================================

fn load_trades(config: &AnalysisConfig) -> Vec<TradeOutcome> {
    let paths: Vec<String> = config
        .input
        .trade_outcome_paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    println!("{}", report::section(&format!("Trade outcomes: {}", paths.join(", "))));
    let loaded = loader::load_trade_outcomes(config);
    println!("{}", report::load_status(&loaded));
    loaded.records
}

fn handle_trades(engine: &AnalyticsEngine, analyzer: &Analyzer, trades: &[TradeOutcome]) {
    println!("{}", report::section("Trade summary"));
    let summary = match engine.summarize_trades(trades) {
        Ok(summary) => summary,
        Err(e) => {
            print_failure(&e);
            return;
        }
    };
    println!("{}", report::trade_summary(&summary));

    let breakdowns = engine.breakdowns(trades);
    print_groups(
        "By asset",
        report::group_table(&["Asset"], &breakdowns.by_asset, |a| vec![a.clone()]),
        breakdowns.by_asset.is_empty(),
    );
    print_groups(
        "By direction",
        report::group_table(&["Direction"], &breakdowns.by_direction, |d| vec![d.clone()]),
        breakdowns.by_direction.is_empty(),
    );
    print_groups(
        "By asset and hour",
        report::group_table(&["Asset", "Hour"], &breakdowns.by_hour, |(asset, hour)| {
            vec![asset.clone(), format!("{hour:02}")]
        }),
        breakdowns.by_hour.is_empty(),
    );
    print_groups(
        "By asset and anchor price",
        report::group_table(&["Asset", "Anchor price"], &breakdowns.by_price_band, |(asset, band)| {
            vec![asset.clone(), band.to_string()]
        }),
        breakdowns.by_price_band.is_empty(),
    );
    print_groups(
        "By asset and minute into window",
        report::group_table(&["Asset", "Minute"], &breakdowns.by_window_minute, |(asset, minute)| {
            vec![asset.clone(), minute.to_string()]
        }),
        breakdowns.by_window_minute.is_empty(),
    );

    println!();
    println!("{}", report::advice(&analyzer.advise(&summary)));
}

fn print_groups(title: &str, table: comfy_table::Table, empty: bool) {
    println!("{}", report::section(title));
    if empty {
        println!("{}", report::NO_DATA);
    } else {
        println!("{table}");
    }
}

// ==============================================================================
// Stop-loss impact
// ==============================================================================

fn handle_stop_loss(analyzer: &Analyzer, trades: &[TradeOutcome]) {
    println!("{}", report::section("Stop-loss follow-up impact"));
    match analyzer.stop_loss_impact(trades) {
        Ok(impacts) => {
            println!("{}", report::stop_loss_table(&impacts));
            println!("{}", report::verdicts(&impacts));
        }
        Err(AnalyzerError::NoTimedTrades) => {
            warn!("No trade outcome has a usable buy time");
            println!("{}", report::NO_DATA);
        }
    }
}

/// "No data" is an expected outcome; anything else is still reported without aborting.
fn print_failure(error: &AnalyticsError) {
    match error {
        AnalyticsError::NoData(what) => {
            info!(%what, "Nothing to analyze");
            println!("{}", report::NO_DATA);
        }
        other => {
            warn!(error = %other, "Analysis failed");
            println!("Analysis failed: {other}");
        }
    }
}
