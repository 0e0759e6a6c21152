//! Random quote generator standing in for a market-data feed.
//!
//! Every call draws an independent quote; there is no continuity between
//! successive prices of the same ticker.

use crate::domain::error::QuantisError;
use crate::domain::quote::Quote;
use crate::ports::quote_port::QuotePort;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct SyntheticQuoteAdapter {
    rng: StdRng,
}

impl SyntheticQuoteAdapter {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence of quotes for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }
}

impl Default for SyntheticQuoteAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl QuotePort for SyntheticQuoteAdapter {
    fn get_quote(&mut self, ticker: &str) -> Result<Quote, QuantisError> {
        let rng = &mut self.rng;
        let price = rng.gen_range(10.0..500.0);
        let daily_percent_change = rng.gen_range(-5.0..5.0);
        let market_cap = rng.gen_range(1e9..5e12);
        let volume = rng.gen_range(100_000..=50_000_000);
        let average_volume = rng.gen_range(100_000..=50_000_000);
        let a: f64 = rng.gen_range(5.0..550.0);
        let b: f64 = rng.gen_range(5.0..550.0);
        let half_spread = rng.gen_range(0.01..1.0);

        Ok(Quote {
            name: format!("{ticker} Corp"),
            price,
            bid: price - half_spread,
            ask: price + half_spread,
            volume,
            average_volume,
            fiftytwo_week_high: a.max(b),
            fiftytwo_week_low: a.min(b),
            market_cap,
            daily_percent_change,
        })
    }
}
