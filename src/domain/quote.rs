//! Quote and ticker registry types.

/// One observation of price, volume and spread state for a ticker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub name: String,
    pub price: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: i64,
    pub average_volume: i64,
    pub fiftytwo_week_high: f64,
    pub fiftytwo_week_low: f64,
    pub market_cap: f64,
    pub daily_percent_change: f64,
}

impl Quote {
    /// ask - bid
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}

/// A tracked symbol as stored in the ticker registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerRecord {
    pub ticker: String,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub notes: String,
    pub date_added: String,
}

impl TickerRecord {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenerRow {
    pub record: TickerRecord,
    pub quote: Quote,
}

impl ScreenerRow {
    pub fn new(record: TickerRecord, quote: Quote) -> Self {
        Self { record, quote }
    }

    /// Quote name, falling back to the registry name when the feed has none.
    pub fn display_name(&self) -> &str {
        if self.quote.name.is_empty() {
            &self.record.name
        } else {
            &self.quote.name
        }
    }
}
