//! CLI definition and dispatch.
//!
//! Every command prints one `{success, data | error}` JSON document on stdout.
//! Progress and diagnostics go to stderr through `tracing`.

use chrono::{NaiveDate, TimeDelta, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::memory_portfolio::InMemoryPortfolioStore;
use crate::domain::analysis::{analyze_risk, analyze_signal};
use crate::domain::envelope::ApiResponse;
use crate::domain::error::QuantdashError;
use crate::domain::market::{market_quote, MarketData};
use crate::domain::portfolio::{parse_positions, parse_watchlist, Portfolio};
use crate::domain::risk::RiskReport;
use crate::domain::settings::AnalyticsSettings;
use crate::domain::signal::AiSignal;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::portfolio_port::PortfolioPort;

#[derive(Parser, Debug)]
#[command(name = "quantdash", about = "Market quotes, technical signals, risk metrics and portfolio valuation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Latest quote and recent bars for a symbol
    Market {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Generate a BUY/SELL/HOLD signal for a symbol
    Signal {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Compute risk metrics for a symbol against a benchmark
    Risk {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        benchmark: Option<String>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Value the configured portfolio at the latest close
    Portfolio {
        #[arg(short, long)]
        config: PathBuf,
        /// Open an extra position, SYMBOL:QUANTITY:PRICE
        #[arg(long = "add")]
        add: Vec<String>,
        /// Add a symbol to the watchlist
        #[arg(long = "watch")]
        watch: Vec<String>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List symbols with price data
    Symbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quantdash=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Market {
            config,
            symbol,
            as_of,
        } => emit(with_context(&config, |data, settings| {
            run_market(data, settings, &symbol, as_of_or_today(as_of))
        })),
        Command::Signal {
            config,
            symbol,
            as_of,
        } => emit(with_context(&config, |data, settings| {
            run_signal(data, settings, &symbol, as_of_or_today(as_of))
        })),
        Command::Risk {
            config,
            symbol,
            benchmark,
            as_of,
        } => emit(with_context(&config, |data, settings| {
            run_risk(
                data,
                settings,
                &symbol,
                benchmark.as_deref(),
                as_of_or_today(as_of),
            )
        })),
        Command::Portfolio {
            config,
            add,
            watch,
            as_of,
        } => emit(run_portfolio_command(&config, &add, &watch, as_of_or_today(as_of))),
        Command::Symbols { config } => emit(
            load_config(&config)
                .and_then(|c| data_port_from_config(&c))
                .and_then(|data| data.list_symbols()),
        ),
    }
}

fn as_of_or_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Utc::now().date_naive())
}

/// Print the envelope for `result` and map it to an exit code.
pub fn emit<T: Serialize>(result: Result<T, QuantdashError>) -> ExitCode {
    let (envelope, code) = match result {
        Ok(data) => (ApiResponse::ok(data), ExitCode::SUCCESS),
        Err(e) => {
            tracing::error!("{e}");
            (ApiResponse::failure(e.to_string()), ExitCode::from(&e))
        }
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(json) => {
            println!("{json}");
            code
        }
        Err(e) => {
            tracing::error!("failed to serialize response: {e}");
            ExitCode::from(&QuantdashError::from(e))
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, QuantdashError> {
    tracing::info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn data_port_from_config(config: &dyn ConfigPort) -> Result<CsvAdapter, QuantdashError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or_else(|| QuantdashError::ConfigMissing {
            section: "data".into(),
            key: "dir".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(dir)))
}

fn with_context<T, F>(config_path: &Path, f: F) -> Result<T, QuantdashError>
where
    F: FnOnce(&dyn DataPort, &AnalyticsSettings) -> Result<T, QuantdashError>,
{
    let config = load_config(config_path)?;
    let settings = AnalyticsSettings::from_config(&config)?;
    let data = data_port_from_config(&config)?;
    f(&data, &settings)
}

/// First day of a `days`-long window ending at `as_of`. A window reaching
/// past chrono's date range is reported against `key`.
fn window_start(as_of: NaiveDate, days: i64, key: &str) -> Result<NaiveDate, QuantdashError> {
    TimeDelta::try_days(days)
        .and_then(|span| as_of.checked_sub_signed(span))
        .ok_or_else(|| {
            QuantdashError::invalid(
                "analytics",
                key,
                format!("{days} days before {as_of} is out of range"),
            )
        })
}

pub fn run_market(
    data: &dyn DataPort,
    settings: &AnalyticsSettings,
    symbol: &str,
    as_of: NaiveDate,
) -> Result<MarketData, QuantdashError> {
    let symbol = symbol.trim().to_uppercase();
    let start = window_start(as_of, settings.market_lookback_days, "market_lookback_days")?;

    let bars = data.fetch_ohlcv(&symbol, start, as_of)?;
    let quote = market_quote(&symbol, &bars)?;
    tracing::info!(
        "{}: {:.2} ({:+.2}%) from {} bars",
        symbol,
        quote.price,
        quote.change_percent,
        quote.data.len()
    );
    Ok(quote)
}

pub fn run_signal(
    data: &dyn DataPort,
    settings: &AnalyticsSettings,
    symbol: &str,
    as_of: NaiveDate,
) -> Result<AiSignal, QuantdashError> {
    let symbol = symbol.trim().to_uppercase();
    let start = window_start(as_of, settings.signal_lookback_days, "signal_lookback_days")?;

    let bars = data.fetch_ohlcv(&symbol, start, as_of)?;
    tracing::info!("Generating signal for {} from {} bars", symbol, bars.len());

    let signal = analyze_signal(&symbol, &bars, settings)?;
    tracing::info!(
        "{}: {} ({:.0}% confidence)",
        symbol,
        signal.recommendation,
        signal.confidence * 100.0
    );
    Ok(signal)
}

pub fn run_risk(
    data: &dyn DataPort,
    settings: &AnalyticsSettings,
    symbol: &str,
    benchmark_override: Option<&str>,
    as_of: NaiveDate,
) -> Result<RiskReport, QuantdashError> {
    let symbol = symbol.trim().to_uppercase();
    let start = window_start(as_of, settings.risk_lookback_days, "risk_lookback_days")?;

    let bars = data.fetch_ohlcv(&symbol, start, as_of)?;
    if bars.len() < 2 {
        return Err(if bars.is_empty() {
            QuantdashError::NoData { symbol }
        } else {
            QuantdashError::InsufficientData {
                symbol,
                bars: bars.len(),
                minimum: 2,
            }
        });
    }

    let benchmark_symbol = benchmark_override
        .map(|b| b.trim().to_uppercase())
        .or_else(|| settings.benchmark.clone());

    let benchmark_bars = match benchmark_symbol.as_deref() {
        Some(bench) => match data.fetch_ohlcv(bench, start, as_of) {
            Ok(bars) => Some(bars),
            Err(e) => {
                tracing::warn!("benchmark {} unavailable, beta defaults to 1: {}", bench, e);
                None
            }
        },
        None => None,
    };

    tracing::info!(
        "Computing risk for {} over {} bars (benchmark: {})",
        symbol,
        bars.len(),
        benchmark_symbol.as_deref().unwrap_or("none")
    );
    analyze_risk(&symbol, &bars, benchmark_bars.as_deref(), settings)
}

/// Build the starting portfolio from the `[portfolio]` section.
pub fn portfolio_from_config(config: &dyn ConfigPort) -> Result<Portfolio, QuantdashError> {
    let positions = match config.get_string("portfolio", "positions") {
        Some(raw) => parse_positions(&raw)
            .map_err(|reason| QuantdashError::invalid("portfolio", "positions", reason))?,
        None => Vec::new(),
    };
    let watchlist = config
        .get_string("portfolio", "watchlist")
        .map(|raw| parse_watchlist(&raw))
        .unwrap_or_default();
    Ok(Portfolio::new(positions, watchlist))
}

/// Apply the requested additions, then mark every position at its latest
/// close inside the signal lookback window.
pub fn run_portfolio(
    data: &dyn DataPort,
    store: &dyn PortfolioPort,
    settings: &AnalyticsSettings,
    add: &[String],
    watch: &[String],
    as_of: NaiveDate,
) -> Result<Portfolio, QuantdashError> {
    for position in parse_positions(&add.join(","))
        .map_err(|reason| QuantdashError::invalid("portfolio", "add", reason))?
    {
        store.add_position(&position.symbol, position.quantity, position.avg_price)?;
    }
    for symbol in watch {
        store.add_to_watchlist(symbol)?;
    }

    let start = window_start(as_of, settings.signal_lookback_days, "signal_lookback_days")?;
    let mut portfolio = store.snapshot()?;
    portfolio.revalue(|symbol| match data.fetch_ohlcv(symbol, start, as_of) {
        Ok(bars) => bars.last().map(|b| b.close),
        Err(e) => {
            tracing::warn!("no quote for {}, marking at cost: {}", symbol, e);
            None
        }
    });

    tracing::info!(
        "Portfolio: {} positions, value {:.2}, P&L {:.2}",
        portfolio.positions.len(),
        portfolio.total_value,
        portfolio.total_pnl
    );
    Ok(portfolio)
}

fn run_portfolio_command(
    config_path: &Path,
    add: &[String],
    watch: &[String],
    as_of: NaiveDate,
) -> Result<Portfolio, QuantdashError> {
    let config = load_config(config_path)?;
    let settings = AnalyticsSettings::from_config(&config)?;
    let data = data_port_from_config(&config)?;
    let store = InMemoryPortfolioStore::new(portfolio_from_config(&config)?);
    run_portfolio(&data, &store, &settings, add, watch, as_of)
}
