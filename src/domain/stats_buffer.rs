//! Per-ticker rolling window of quotes and the metrics derived from it.
//!
//! The window is a fixed-capacity ring: storage grows up to `capacity` and
//! afterwards each new sample overwrites the oldest slot. Logical index 0 is
//! always the oldest sample and `len() - 1` the most recent.
//!
//! All metric accessors are pure functions of the window contents and fall
//! back to `0.0` when the history is too short or a denominator is zero.

use crate::domain::quote::Quote;

pub const DEFAULT_CAPACITY: usize = 60;
pub const SHORT_SLOPE_WINDOW: usize = 10;
pub const LONG_SLOPE_WINDOW: usize = 60;
/// Largest window a buffer will allocate.
pub const MAX_CAPACITY: usize = 10_000;

#[derive(Debug, Clone)]
pub struct RollingStatsBuffer {
    slots: Vec<Quote>,
    head: usize,
    capacity: usize,
}

impl Default for RollingStatsBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RollingStatsBuffer {
    /// Creates an empty window with `capacity` clamped to `1..=MAX_CAPACITY`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Appends `quote`, evicting the oldest sample first when full.
    pub fn add_sample(&mut self, quote: Quote) {
        if self.slots.len() < self.capacity {
            self.slots.push(quote);
        } else {
            self.slots[self.head] = quote;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sample at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<&Quote> {
        if index >= self.slots.len() {
            return None;
        }
        Some(&self.slots[(self.head + index) % self.slots.len()])
    }

    /// Samples in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Quote> + '_ {
        (0..self.slots.len()).filter_map(move |i| self.get(i))
    }

    fn latest(&self) -> Option<&Quote> {
        self.slots.len().checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn latest_price(&self) -> f64 {
        self.latest().map_or(0.0, |q| q.price)
    }

    pub fn latest_spread(&self) -> f64 {
        self.latest().map_or(0.0, Quote::spread)
    }

    /// (last - prev) / prev over the two most recent prices.
    pub fn price_return(&self) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let (Some(prev), Some(last)) = (self.get(n - 2), self.get(n - 1)) else {
            return 0.0;
        };
        if prev.price == 0.0 {
            return 0.0;
        }
        (last.price - prev.price) / prev.price
    }

    /// Population standard deviation of every consecutive return in the window.
    pub fn recent_volatility(&self) -> f64 {
        let returns = self.compute_returns();
        if returns.len() < 2 {
            return 0.0;
        }
        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns
            .iter()
            .map(|r| {
                let diff = r - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        variance.sqrt()
    }

    pub fn mean_spread(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.iter().map(Quote::spread).sum::<f64>() / self.len() as f64
    }

    pub fn short_term_slope(&self) -> f64 {
        self.slope(SHORT_SLOPE_WINDOW)
    }

    pub fn long_term_slope(&self) -> f64 {
        self.slope(LONG_SLOPE_WINDOW)
    }

    // (last - first) / window over the last min(max_window, len) samples
    fn slope(&self, max_window: usize) -> f64 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let window = max_window.min(n);
        match (self.get(n - window), self.get(n - 1)) {
            (Some(first), Some(last)) => (last.price - first.price) / window as f64,
            _ => 0.0,
        }
    }

    // A zero previous price yields an explicit 0.0 return rather than
    // dropping the pair, so the series always has len() - 1 entries.
    fn compute_returns(&self) -> Vec<f64> {
        if self.len() < 2 {
            return Vec::new();
        }
        let prices: Vec<f64> = self.iter().map(|q| q.price).collect();
        prices
            .windows(2)
            .map(|pair| {
                let (prev, curr) = (pair[0], pair[1]);
                if prev == 0.0 {
                    0.0
                } else {
                    (curr - prev) / prev
                }
            })
            .collect()
    }
}
