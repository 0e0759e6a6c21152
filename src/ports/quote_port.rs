//! Quote acquisition port trait.

use crate::domain::error::QuantisError;
use crate::domain::quote::Quote;

pub trait QuotePort {
    fn get_quote(&mut self, ticker: &str) -> Result<Quote, QuantisError>;
}
