//! One screener refresh cycle: registry → quotes → alerts → presentation.
//!
//! The realtime loop in the CLI calls [`refresh`] once per tick; one-shot
//! commands call it once.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::anomaly::{AlertTag, AnomalyEngine};
use crate::domain::error::QuantisError;
use crate::domain::quote::{ScreenerRow, TickerRecord};
use crate::ports::quote_port::QuotePort;
use crate::ports::render_port::RenderPort;
use crate::ports::ticker_store_port::TickerStore;

pub const NO_TICKERS_MESSAGE: &str =
    "No tickers tracked. Add one with 'quantis screener add SYMBOL'.";
pub const NO_QUOTES_MESSAGE: &str = "No quotes available for tracked tickers.";

#[derive(Debug, Clone, PartialEq)]
pub enum MarketSource {
    Synthetic { seed: Option<u64> },
    Csv { dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerConfig {
    pub db_path: String,
    pub pool_size: u32,
    pub refresh_interval: Duration,
    pub window_capacity: usize,
    pub color: bool,
    pub export_path: PathBuf,
    pub market: MarketSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Quotes,
    Alerts { alerts_only: bool },
}

/// Fetches a quote for every registered ticker. Tickers whose quote cannot be
/// fetched are skipped with a warning.
pub fn collect_rows(
    store: &dyn TickerStore,
    quotes: &mut dyn QuotePort,
) -> Result<Vec<ScreenerRow>, QuantisError> {
    let records = store.list_tickers()?;
    Ok(fetch_quotes(records, quotes))
}

fn fetch_quotes(records: Vec<TickerRecord>, quotes: &mut dyn QuotePort) -> Vec<ScreenerRow> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        match quotes.get_quote(&record.ticker) {
            Ok(quote) => rows.push(ScreenerRow::new(record, quote)),
            Err(e) => warn!(ticker = %record.ticker, error = %e, "skipping ticker"),
        }
    }
    rows
}

/// One `evaluate` call per row, in row order.
pub fn evaluate_alerts(engine: &mut AnomalyEngine, rows: &[ScreenerRow]) -> Vec<Vec<AlertTag>> {
    rows.iter()
        .map(|row| engine.evaluate(&row.record.ticker, &row.quote))
        .collect()
}

/// Runs a single cycle and returns the number of rows fetched.
pub fn refresh(
    view: View,
    store: &dyn TickerStore,
    quotes: &mut dyn QuotePort,
    engine: &mut AnomalyEngine,
    renderer: &mut dyn RenderPort,
) -> Result<usize, QuantisError> {
    let records = store.list_tickers()?;
    if records.is_empty() {
        renderer.message(NO_TICKERS_MESSAGE)?;
        return Ok(0);
    }

    let rows = fetch_quotes(records, quotes);
    if rows.is_empty() {
        renderer.message(NO_QUOTES_MESSAGE)?;
        return Ok(0);
    }

    match view {
        View::Quotes => renderer.render(&rows)?,
        View::Alerts { alerts_only } => {
            let alerts = evaluate_alerts(engine, &rows);
            debug!(
                rows = rows.len(),
                alerts = alerts.iter().map(Vec::len).sum::<usize>(),
                "evaluated alerts"
            );
            renderer.render_with_alerts(&rows, &alerts, alerts_only)?;
        }
    }
    Ok(rows.len())
}
