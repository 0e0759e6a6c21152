#![allow(dead_code)]

use quantis::domain::anomaly::AlertTag;
use quantis::domain::error::QuantisError;
pub use quantis::domain::quote::{Quote, ScreenerRow, TickerRecord};
use quantis::ports::quote_port::QuotePort;
use quantis::ports::render_port::RenderPort;
use quantis::ports::ticker_store_port::TickerStore;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Default)]
pub struct MockTickerStore {
    pub records: RefCell<BTreeMap<String, TickerRecord>>,
}

impl MockTickerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tickers(tickers: &[&str]) -> Self {
        let store = Self::new();
        for t in tickers {
            store.add_ticker(&TickerRecord::new(*t)).unwrap();
        }
        store
    }
}

impl TickerStore for MockTickerStore {
    fn add_ticker(&self, record: &TickerRecord) -> Result<(), QuantisError> {
        let mut records = self.records.borrow_mut();
        if records.contains_key(&record.ticker) {
            return Err(QuantisError::TickerExists {
                ticker: record.ticker.clone(),
            });
        }
        records.insert(record.ticker.clone(), record.clone());
        Ok(())
    }

    fn remove_ticker(&self, ticker: &str) -> Result<(), QuantisError> {
        self.records
            .borrow_mut()
            .remove(ticker)
            .map(|_| ())
            .ok_or_else(|| QuantisError::TickerNotFound {
                ticker: ticker.to_string(),
            })
    }

    fn ticker_exists(&self, ticker: &str) -> Result<bool, QuantisError> {
        Ok(self.records.borrow().contains_key(ticker))
    }

    fn list_tickers(&self) -> Result<Vec<TickerRecord>, QuantisError> {
        Ok(self.records.borrow().values().cloned().collect())
    }
}

/// Replays a scripted quote sequence per ticker; the last quote repeats once
/// the script runs out.
#[derive(Default)]
pub struct ScriptedQuotes {
    pub scripts: HashMap<String, VecDeque<Quote>>,
    pub last: HashMap<String, Quote>,
    pub requests: Vec<String>,
}

impl ScriptedQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(mut self, ticker: &str, quotes: Vec<Quote>) -> Self {
        self.scripts.insert(ticker.to_string(), quotes.into());
        self
    }
}

impl QuotePort for ScriptedQuotes {
    fn get_quote(&mut self, ticker: &str) -> Result<Quote, QuantisError> {
        self.requests.push(ticker.to_string());
        if let Some(q) = self.scripts.get_mut(ticker).and_then(VecDeque::pop_front) {
            self.last.insert(ticker.to_string(), q.clone());
            return Ok(q);
        }
        self.last
            .get(ticker)
            .cloned()
            .ok_or_else(|| QuantisError::MarketData {
                ticker: ticker.to_string(),
                reason: "no scripted quote".into(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Quotes(Vec<String>),
    Alerts {
        rows: Vec<(String, Vec<AlertTag>)>,
        alerts_only: bool,
    },
    Clear,
    Message(String),
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub events: Vec<Rendered>,
}

impl RecordingRenderer {
    pub fn messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Rendered::Message(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Alert tags per ticker from the most recent alerts render.
    pub fn last_alerts(&self) -> HashMap<String, Vec<AlertTag>> {
        self.events
            .iter()
            .rev()
            .find_map(|e| match e {
                Rendered::Alerts { rows, .. } => Some(rows.iter().cloned().collect()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl RenderPort for RecordingRenderer {
    fn render(&mut self, rows: &[ScreenerRow]) -> Result<(), QuantisError> {
        self.events.push(Rendered::Quotes(
            rows.iter().map(|r| r.record.ticker.clone()).collect(),
        ));
        Ok(())
    }

    fn render_with_alerts(
        &mut self,
        rows: &[ScreenerRow],
        alerts: &[Vec<AlertTag>],
        alerts_only: bool,
    ) -> Result<(), QuantisError> {
        self.events.push(Rendered::Alerts {
            rows: rows
                .iter()
                .zip(alerts)
                .map(|(r, a)| (r.record.ticker.clone(), a.clone()))
                .collect(),
            alerts_only,
        });
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), QuantisError> {
        self.events.push(Rendered::Clear);
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<(), QuantisError> {
        self.events.push(Rendered::Message(text.to_string()));
        Ok(())
    }
}

/// A quiet quote: tight spread, volume at average, price well inside the
/// 52-week range.
pub fn make_quote(price: f64) -> Quote {
    Quote {
        name: "Test Corp".into(),
        price,
        bid: price - 0.05,
        ask: price + 0.05,
        volume: 1_000,
        average_volume: 1_000,
        fiftytwo_week_high: 1_000.0,
        fiftytwo_week_low: 1.0,
        market_cap: 1e9,
        daily_percent_change: 0.0,
    }
}

pub fn with_volume(mut quote: Quote, volume: i64, average_volume: i64) -> Quote {
    quote.volume = volume;
    quote.average_volume = average_volume;
    quote
}

pub fn with_spread(mut quote: Quote, spread: f64) -> Quote {
    quote.bid = quote.price - spread / 2.0;
    quote.ask = quote.price + spread / 2.0;
    quote
}

pub fn with_range(mut quote: Quote, low: f64, high: f64) -> Quote {
    quote.fiftytwo_week_low = low;
    quote.fiftytwo_week_high = high;
    quote
}
