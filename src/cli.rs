//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use crate::adapters::csv_export_adapter::{CsvExportAdapter, DEFAULT_EXPORT_PATH};
use crate::adapters::csv_quote_adapter::CsvQuoteAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::synthetic_quote_adapter::SyntheticQuoteAdapter;
use crate::adapters::table_renderer::TableRenderer;
use crate::domain::anomaly::AnomalyEngine;
use crate::domain::config_validation::validate_screener_config;
use crate::domain::error::QuantisError;
use crate::domain::quote::TickerRecord;
use crate::domain::screener::{collect_rows, refresh, MarketSource, ScreenerConfig, View};
use crate::domain::stats_buffer::MAX_CAPACITY;
use crate::logging::init_logging;
use crate::ports::config_port::ConfigPort;
use crate::ports::export_port::ExportPort;
use crate::ports::quote_port::QuotePort;
use crate::ports::render_port::RenderPort;
use crate::ports::ticker_store_port::TickerStore;

pub const CLEARED_MESSAGE: &str = "Cleared anomaly history.";
pub const DEFAULT_DB_PATH: &str = "quantis.db";

#[derive(Parser, Debug)]
#[command(name = "quantis", about = "Stock screener with anomaly alerts")]
pub struct Cli {
    /// INI configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Ticker database path, overriding [storage] path
    #[arg(long, global = true)]
    pub db: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Screen tracked tickers
    Screener {
        #[command(subcommand)]
        action: ScreenerCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScreenerCommand {
    /// Show quotes for every tracked ticker
    List {
        #[command(subcommand)]
        mode: Option<ListMode>,
    },
    /// Evaluate anomaly alerts for every tracked ticker
    Alerts {
        #[command(subcommand)]
        mode: Option<AlertsMode>,
    },
    /// Start tracking a ticker
    Add {
        symbol: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        sector: String,
        #[arg(long, default_value = "")]
        industry: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Stop tracking a ticker
    Remove { symbol: String },
    /// Export a snapshot of tracked tickers and their quotes
    Export {
        #[arg(value_enum)]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListMode {
    /// Refresh continuously until interrupted
    Realtime {
        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<usize>,
    },
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertsMode {
    /// Only rows with at least one alert
    List,
    /// Refresh continuously until interrupted
    Realtime {
        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<usize>,
    },
    /// Discard accumulated history
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

pub fn run(cli: Cli) -> ExitCode {
    let adapter = match cli.config.as_ref() {
        Some(path) => match load_config(path) {
            Ok(a) => a,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };

    if let Err(e) = validate_screener_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let (level, json) = log_settings(&adapter);
    init_logging(&level, json);

    let mut cfg = match build_screener_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(db) = cli.db {
        cfg.db_path = db;
    }
    debug!(?cfg, "screener configured");

    let store = match open_store(&cfg) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let mut quotes = open_quote_port(&cfg.market);
    let mut engine = AnomalyEngine::with_capacity(cfg.window_capacity);
    let mut renderer = TableRenderer::stdout(cfg.color && std::io::stdout().is_terminal());

    let Command::Screener { action } = cli.command;
    match execute(
        action,
        &cfg,
        store.as_ref(),
        quotes.as_mut(),
        &mut engine,
        &mut renderer,
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = QuantisError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_screener_config(adapter: &dyn ConfigPort) -> Result<ScreenerConfig, QuantisError> {
    let source = adapter
        .get_string("market", "source")
        .unwrap_or_else(|| "synthetic".to_string());

    let market = match source.trim().to_lowercase().as_str() {
        "csv" => {
            let dir = adapter
                .get_string("market", "csv_dir")
                .filter(|d| !d.trim().is_empty())
                .ok_or_else(|| QuantisError::ConfigInvalid {
                    section: "market".into(),
                    key: "csv_dir".into(),
                    reason: "csv_dir is required when source = csv".into(),
                })?;
            MarketSource::Csv {
                dir: PathBuf::from(dir.trim()),
            }
        }
        _ => {
            let seed = adapter
                .get_string("market", "seed")
                .map(|s| s.trim().parse::<u64>())
                .transpose()
                .map_err(|_| QuantisError::ConfigInvalid {
                    section: "market".into(),
                    key: "seed".into(),
                    reason: "seed must be a non-negative integer".into(),
                })?;
            MarketSource::Synthetic { seed }
        }
    };

    Ok(ScreenerConfig {
        db_path: adapter
            .get_string("storage", "path")
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        pool_size: adapter.get_int("storage", "pool_size", 4).max(1) as u32,
        refresh_interval: Duration::from_millis(
            adapter
                .get_int("screener", "refresh_interval_ms", 1000)
                .max(1) as u64,
        ),
        window_capacity: adapter
            .get_int("screener", "window_capacity", 60)
            .clamp(1, MAX_CAPACITY as i64) as usize,
        color: adapter.get_bool("screener", "color", true),
        export_path: PathBuf::from(
            adapter
                .get_string("export", "path")
                .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string()),
        ),
        market,
    })
}

pub fn log_settings(adapter: &dyn ConfigPort) -> (String, bool) {
    let level = adapter
        .get_string("logging", "level")
        .map(|l| l.trim().to_lowercase())
        .unwrap_or_else(|| "warn".to_string());
    (level, adapter.get_bool("logging", "json", false))
}

/// Upper-cases `symbol`; rejects empty symbols and ones containing
/// whitespace or commas.
pub fn normalize_symbol(symbol: &str) -> Result<String, QuantisError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c == ',') {
        return Err(QuantisError::InvalidTicker {
            ticker: symbol.to_string(),
        });
    }
    Ok(trimmed.to_uppercase())
}

pub fn new_ticker_record(
    symbol: &str,
    name: String,
    sector: String,
    industry: String,
    notes: String,
) -> Result<TickerRecord, QuantisError> {
    Ok(TickerRecord {
        ticker: normalize_symbol(symbol)?,
        name,
        sector,
        industry,
        notes,
        date_added: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    })
}

pub fn open_quote_port(market: &MarketSource) -> Box<dyn QuotePort> {
    match market {
        MarketSource::Synthetic { seed } => Box::new(SyntheticQuoteAdapter::from_seed(*seed)),
        MarketSource::Csv { dir } => Box::new(CsvQuoteAdapter::new(dir.clone())),
    }
}

fn open_store(cfg: &ScreenerConfig) -> Result<Box<dyn TickerStore>, QuantisError> {
    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_adapter::SqliteTickerStore;

        let store = SqliteTickerStore::open(&cfg.db_path, cfg.pool_size)?;
        Ok(Box::new(store))
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = cfg;
        Err(QuantisError::Database {
            reason: "sqlite feature is required for the ticker registry".into(),
        })
    }
}

/// Runs one screener subcommand against already opened collaborators.
pub fn execute(
    action: ScreenerCommand,
    cfg: &ScreenerConfig,
    store: &dyn TickerStore,
    quotes: &mut dyn QuotePort,
    engine: &mut AnomalyEngine,
    renderer: &mut dyn RenderPort,
) -> Result<(), QuantisError> {
    match action {
        ScreenerCommand::List { mode } => match mode {
            Some(ListMode::Realtime { cycles }) => run_realtime(
                View::Quotes,
                cfg.refresh_interval,
                cycles,
                store,
                quotes,
                engine,
                renderer,
            ),
            None => refresh(View::Quotes, store, quotes, engine, renderer).map(|_| ()),
        },
        ScreenerCommand::Alerts { mode } => match mode {
            None => refresh(
                View::Alerts { alerts_only: false },
                store,
                quotes,
                engine,
                renderer,
            )
            .map(|_| ()),
            Some(AlertsMode::List) => refresh(
                View::Alerts { alerts_only: true },
                store,
                quotes,
                engine,
                renderer,
            )
            .map(|_| ()),
            Some(AlertsMode::Realtime { cycles }) => run_realtime(
                View::Alerts { alerts_only: false },
                cfg.refresh_interval,
                cycles,
                store,
                quotes,
                engine,
                renderer,
            ),
            Some(AlertsMode::Clear) => {
                engine.clear();
                renderer.message(CLEARED_MESSAGE)
            }
        },
        ScreenerCommand::Add {
            symbol,
            name,
            sector,
            industry,
            notes,
        } => {
            let record = new_ticker_record(&symbol, name, sector, industry, notes)?;
            store.add_ticker(&record)?;
            renderer.message(&format!("Added ticker {}", record.ticker))
        }
        ScreenerCommand::Remove { symbol } => {
            let ticker = normalize_symbol(&symbol)?;
            store.remove_ticker(&ticker)?;
            renderer.message(&format!("Removed ticker {}", ticker))
        }
        ScreenerCommand::Export { format, output } => match format {
            ExportFormat::Csv => {
                let path = output.unwrap_or_else(|| cfg.export_path.clone());
                let rows = collect_rows(store, quotes)?;
                CsvExportAdapter.export(&rows, &path)?;
                renderer.message(&format!("Exported to {}", path.display()))
            }
        },
    }
}

/// Refreshes every `interval` until Ctrl-C, or until `cycles` refreshes
/// have completed when given.
#[cfg(feature = "realtime")]
pub fn run_realtime(
    view: View,
    interval: Duration,
    cycles: Option<usize>,
    store: &dyn TickerStore,
    quotes: &mut dyn QuotePort,
    engine: &mut AnomalyEngine,
    renderer: &mut dyn RenderPort,
) -> Result<(), QuantisError> {
    use tokio::time::MissedTickBehavior;
    use tracing::{info, warn};

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut completed = 0usize;

        while cycles.is_none_or(|n| completed < n) {
            tokio::select! {
                result = &mut shutdown => {
                    if let Err(e) = result {
                        warn!(error = %e, "interrupt listener failed");
                    }
                    info!(completed, "interrupted, stopping refresh loop");
                    break;
                }
                _ = ticker.tick() => {
                    renderer.clear_screen()?;
                    refresh(view, store, quotes, engine, renderer)?;
                    completed += 1;
                }
            }
        }
        Ok::<(), QuantisError>(())
    })
}

#[cfg(not(feature = "realtime"))]
pub fn run_realtime(
    view: View,
    interval: Duration,
    cycles: Option<usize>,
    store: &dyn TickerStore,
    quotes: &mut dyn QuotePort,
    engine: &mut AnomalyEngine,
    renderer: &mut dyn RenderPort,
) -> Result<(), QuantisError> {
    let _ = (view, interval, cycles, store, quotes, engine, renderer);
    Err(QuantisError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "realtime feature is required for realtime mode",
    )))
}
