//! CSV replay feed.
//!
//! Reads `<dir>/<TICKER>.csv` on first use and hands out one row per call,
//! wrapping back to the first row after the last.

use crate::domain::error::QuantisError;
use crate::domain::quote::Quote;
use crate::ports::quote_port::QuotePort;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    #[serde(default)]
    name: String,
    price: f64,
    bid: f64,
    ask: f64,
    volume: i64,
    average_volume: i64,
    #[serde(rename = "52w_high")]
    fiftytwo_week_high: f64,
    #[serde(rename = "52w_low")]
    fiftytwo_week_low: f64,
    #[serde(default)]
    market_cap: f64,
    #[serde(default)]
    daily_percent_change: f64,
}

impl From<QuoteRecord> for Quote {
    fn from(r: QuoteRecord) -> Self {
        Quote {
            name: r.name,
            price: r.price,
            bid: r.bid,
            ask: r.ask,
            volume: r.volume,
            average_volume: r.average_volume,
            fiftytwo_week_high: r.fiftytwo_week_high,
            fiftytwo_week_low: r.fiftytwo_week_low,
            market_cap: r.market_cap,
            daily_percent_change: r.daily_percent_change,
        }
    }
}

struct Series {
    quotes: Vec<Quote>,
    cursor: usize,
}

pub struct CsvQuoteAdapter {
    base_path: PathBuf,
    series: HashMap<String, Series>,
}

impl CsvQuoteAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            series: HashMap::new(),
        }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    fn load(&self, ticker: &str) -> Result<Vec<Quote>, QuantisError> {
        let path = self.csv_path(ticker);
        let market_error = |reason: String| QuantisError::MarketData {
            ticker: ticker.to_string(),
            reason,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| market_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut quotes = Vec::new();
        for result in rdr.deserialize::<QuoteRecord>() {
            let record = result.map_err(|e| market_error(format!("CSV parse error: {}", e)))?;
            quotes.push(record.into());
        }

        if quotes.is_empty() {
            return Err(market_error(format!("{} has no quotes", path.display())));
        }
        Ok(quotes)
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn get_quote(&mut self, ticker: &str) -> Result<Quote, QuantisError> {
        if !self.series.contains_key(ticker) {
            let quotes = self.load(ticker)?;
            self.series
                .insert(ticker.to_string(), Series { quotes, cursor: 0 });
        }

        let series = self
            .series
            .get_mut(ticker)
            .ok_or_else(|| QuantisError::MarketData {
                ticker: ticker.to_string(),
                reason: "series not loaded".into(),
            })?;
        let quote = series.quotes[series.cursor].clone();
        series.cursor = (series.cursor + 1) % series.quotes.len();
        Ok(quote)
    }
}
