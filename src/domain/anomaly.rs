//! Anomaly engine: routes quotes into per-ticker windows and runs the alert rules.
//!
//! Rules are evaluated in a fixed order against the window *after* the
//! incoming quote has been appended:
//!
//! | Rule | Tag | Fires when |
//! |------|-----|------------|
//! | A | `VOL_SPIKE` | `average_volume > 0` and `volume / average_volume > 2.0` |
//! | B | `VOLATILITY_SURGE` | `volatility > 0` and `|return| > 1.5 * volatility` |
//! | C | `SPREAD_WIDE` | `mean_spread > 0` and `spread > 2.0 * mean_spread` |
//! | D | `BREAKOUT_UP` / `BREAKOUT_DOWN` | price within 0.5% of the 52-week high, else of the low |
//! | E | `LOW_LIQUIDITY` | volume below 40% of average and `spread > 1.5 * mean_spread` |
//! | F | `MOMENTUM_FLIP` | 10+ samples, slopes of opposite sign, `|short| > 1.5 * |long|` |

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::domain::quote::Quote;
use crate::domain::stats_buffer::{RollingStatsBuffer, DEFAULT_CAPACITY};

const VOL_SPIKE_RATIO: f64 = 2.0;
const VOLATILITY_SURGE_FACTOR: f64 = 1.5;
const SPREAD_WIDE_FACTOR: f64 = 2.0;
const BREAKOUT_HIGH_FACTOR: f64 = 0.995;
const BREAKOUT_LOW_FACTOR: f64 = 1.005;
const LOW_LIQUIDITY_VOLUME_RATIO: f64 = 0.4;
const LOW_LIQUIDITY_SPREAD_FACTOR: f64 = 1.5;
const MOMENTUM_MIN_SAMPLES: usize = 10;
const MOMENTUM_FLIP_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertTag {
    VolSpike,
    VolatilitySurge,
    SpreadWide,
    BreakoutUp,
    BreakoutDown,
    LowLiquidity,
    MomentumFlip,
}

impl AlertTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertTag::VolSpike => "VOL_SPIKE",
            AlertTag::VolatilitySurge => "VOLATILITY_SURGE",
            AlertTag::SpreadWide => "SPREAD_WIDE",
            AlertTag::BreakoutUp => "BREAKOUT_UP",
            AlertTag::BreakoutDown => "BREAKOUT_DOWN",
            AlertTag::LowLiquidity => "LOW_LIQUIDITY",
            AlertTag::MomentumFlip => "MOMENTUM_FLIP",
        }
    }
}

impl fmt::Display for AlertTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns one rolling window per ticker, created on first evaluation.
#[derive(Debug, Clone)]
pub struct AnomalyEngine {
    buffers: HashMap<String, RollingStatsBuffer>,
    capacity: usize,
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyEngine {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Engine whose lazily created windows hold `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffers: HashMap::new(),
            capacity,
        }
    }

    /// Number of tickers with a live window.
    pub fn tracked_count(&self) -> usize {
        self.buffers.len()
    }

    /// Appends `quote` to the ticker's window and returns the alerts it triggers.
    pub fn evaluate(&mut self, ticker: &str, quote: &Quote) -> Vec<AlertTag> {
        let capacity = self.capacity;
        let buffer = self
            .buffers
            .entry(ticker.to_string())
            .or_insert_with(|| RollingStatsBuffer::new(capacity));
        buffer.add_sample(quote.clone());

        let alerts = run_rules(buffer, quote);
        if !alerts.is_empty() {
            debug!(ticker, samples = buffer.len(), ?alerts, "alerts triggered");
        }
        alerts
    }

    /// Drops every window, returning the engine to its freshly built state.
    pub fn clear(&mut self) {
        debug!(tickers = self.buffers.len(), "clearing anomaly history");
        self.buffers.clear();
    }
}

fn run_rules(buffer: &RollingStatsBuffer, quote: &Quote) -> Vec<AlertTag> {
    let mut alerts = Vec::new();
    let avg = quote.average_volume as f64;
    let vol = quote.volume as f64;

    // A: unusual volume
    if quote.average_volume > 0 && vol / avg > VOL_SPIKE_RATIO {
        alerts.push(AlertTag::VolSpike);
    }

    // B: volatility surge
    let ret = buffer.price_return();
    let vola = buffer.recent_volatility();
    if vola > 0.0 && ret.abs() > VOLATILITY_SURGE_FACTOR * vola {
        alerts.push(AlertTag::VolatilitySurge);
    }

    let spread = buffer.latest_spread();
    let mean_spread = buffer.mean_spread();

    // C: spread widening
    if mean_spread > 0.0 && spread > SPREAD_WIDE_FACTOR * mean_spread {
        alerts.push(AlertTag::SpreadWide);
    }

    // D: breakout, high takes precedence
    if quote.price > BREAKOUT_HIGH_FACTOR * quote.fiftytwo_week_high {
        alerts.push(AlertTag::BreakoutUp);
    } else if quote.price < BREAKOUT_LOW_FACTOR * quote.fiftytwo_week_low {
        alerts.push(AlertTag::BreakoutDown);
    }

    // E: liquidity compression
    if quote.average_volume > 0
        && vol < LOW_LIQUIDITY_VOLUME_RATIO * avg
        && mean_spread > 0.0
        && spread > LOW_LIQUIDITY_SPREAD_FACTOR * mean_spread
    {
        alerts.push(AlertTag::LowLiquidity);
    }

    // F: momentum shift
    let short_slope = buffer.short_term_slope();
    let long_slope = buffer.long_term_slope();
    if buffer.len() >= MOMENTUM_MIN_SAMPLES
        && opposite_signs(short_slope, long_slope)
        && short_slope.abs() > MOMENTUM_FLIP_FACTOR * long_slope.abs()
    {
        alerts.push(AlertTag::MomentumFlip);
    }

    alerts
}

// Strictly positive against strictly negative; zero never flips.
fn opposite_signs(a: f64, b: f64) -> bool {
    (a > 0.0 && b < 0.0) || (a < 0.0 && b > 0.0)
}
