//! Fixed-width terminal table.

use crate::domain::anomaly::AlertTag;
use crate::domain::error::QuantisError;
use crate::domain::quote::ScreenerRow;
use crate::ports::render_port::RenderPort;
use std::io::{self, Stdout, Write};

const TICKER_W: usize = 8;
const NAME_W: usize = 20;
const PRICE_W: usize = 10;
const CAP_W: usize = 14;
const PCT_W: usize = 8;
const VOL_W: usize = 14;
const AVG_VOL_W: usize = 14;
const LEVEL_W: usize = 12;
const NOTES_W: usize = 30;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const NO_ALERTS_MESSAGE: &str = "No alerts triggered.";

/// Shortens `text` to `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

pub fn format_number(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

/// 1234567.0 → "1.23M"; values under a thousand keep no decimals.
pub fn format_large_number(value: f64) -> String {
    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    let mut value = value;
    let mut idx = 0;
    while value >= 1000.0 && idx < SUFFIXES.len() - 1 {
        value /= 1000.0;
        idx += 1;
    }
    let precision = if idx == 0 { 0 } else { 2 };
    format!("{:.*}{}", precision, value, SUFFIXES[idx])
}

pub struct TableRenderer<W: Write> {
    out: W,
    color: bool,
}

impl TableRenderer<Stdout> {
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: String, color: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text
        }
    }

    fn write_header(&mut self, last_column: &str) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<TICKER_W$}{:<NAME_W$}{:<PRICE_W$}{:<CAP_W$}{:<PCT_W$}{:<VOL_W$}{:<AVG_VOL_W$}{:<LEVEL_W$}{:<LEVEL_W$}{:<PRICE_W$}{:<PRICE_W$}{}",
            "Ticker",
            "Name",
            "Price",
            "Market Cap",
            "%Chg",
            "Volume",
            "Avg Volume",
            "52W High",
            "52W Low",
            "Bid",
            "Ask",
            last_column,
        )?;
        let width = TICKER_W
            + NAME_W
            + PRICE_W * 3
            + CAP_W
            + PCT_W
            + VOL_W
            + AVG_VOL_W
            + LEVEL_W * 2
            + 10;
        writeln!(self.out, "{}", "-".repeat(width))
    }

    fn write_row(&mut self, row: &ScreenerRow, tail: &str) -> io::Result<()> {
        let q = &row.quote;
        let pct = format!("{:>PCT_W$}", format_number(q.daily_percent_change, 2));
        let pct = if q.daily_percent_change > 0.0 {
            self.paint(pct, GREEN)
        } else if q.daily_percent_change < 0.0 {
            self.paint(pct, RED)
        } else {
            pct
        };

        writeln!(
            self.out,
            "{:<TICKER_W$}{:<NAME_W$}{:>PRICE_W$}{:>CAP_W$}{}{:>VOL_W$}{:>AVG_VOL_W$}{:>LEVEL_W$}{:>LEVEL_W$}{:>PRICE_W$}{:>PRICE_W$} {}",
            truncate(&row.record.ticker, TICKER_W),
            truncate(row.display_name(), NAME_W),
            format_number(q.price, 2),
            format_large_number(q.market_cap),
            pct,
            q.volume,
            q.average_volume,
            format_number(q.fiftytwo_week_high, 2),
            format_number(q.fiftytwo_week_low, 2),
            format_number(q.bid, 2),
            format_number(q.ask, 2),
            tail,
        )
    }
}

impl<W: Write> RenderPort for TableRenderer<W> {
    fn render(&mut self, rows: &[ScreenerRow]) -> Result<(), QuantisError> {
        self.write_header("Notes")?;
        for row in rows {
            let notes = truncate(&row.record.notes, NOTES_W);
            self.write_row(row, &notes)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_with_alerts(
        &mut self,
        rows: &[ScreenerRow],
        alerts: &[Vec<AlertTag>],
        alerts_only: bool,
    ) -> Result<(), QuantisError> {
        let visible: Vec<(&ScreenerRow, &Vec<AlertTag>)> = rows
            .iter()
            .zip(alerts)
            .filter(|(_, tags)| !alerts_only || !tags.is_empty())
            .collect();

        if visible.is_empty() {
            return self.message(NO_ALERTS_MESSAGE);
        }

        self.write_header("Alerts")?;
        for (row, tags) in visible {
            let joined = tags
                .iter()
                .map(AlertTag::as_str)
                .collect::<Vec<_>>()
                .join(",");
            let tail = if joined.is_empty() {
                joined
            } else {
                self.paint(joined, YELLOW)
            };
            self.write_row(row, &tail)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), QuantisError> {
        write!(self.out, "{CLEAR_SCREEN}")?;
        self.out.flush()?;
        Ok(())
    }

    fn message(&mut self, text: &str) -> Result<(), QuantisError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}
