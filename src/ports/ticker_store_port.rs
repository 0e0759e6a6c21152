//! Ticker registry port trait.

use crate::domain::error::QuantisError;
use crate::domain::quote::TickerRecord;

/// Keyed record store of tracked symbols.
pub trait TickerStore {
    /// Fails with `TickerExists` if the symbol is already registered.
    fn add_ticker(&self, record: &TickerRecord) -> Result<(), QuantisError>;

    /// Fails with `TickerNotFound` if the symbol is not registered.
    fn remove_ticker(&self, ticker: &str) -> Result<(), QuantisError>;

    fn ticker_exists(&self, ticker: &str) -> Result<bool, QuantisError>;

    /// All records ordered by symbol.
    fn list_tickers(&self) -> Result<Vec<TickerRecord>, QuantisError>;
}
