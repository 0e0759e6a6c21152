//! CSV snapshot export of registry records joined with their quotes.

use crate::domain::error::QuantisError;
use crate::domain::quote::ScreenerRow;
use crate::ports::export_port::ExportPort;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub const DEFAULT_EXPORT_PATH: &str = "quantis_export.csv";

#[derive(Serialize)]
struct ExportRecord<'a> {
    ticker: &'a str,
    name: &'a str,
    sector: &'a str,
    industry: &'a str,
    notes: &'a str,
    date_added: &'a str,
    price: f64,
    market_cap: f64,
    daily_percent_change: f64,
    volume: i64,
    average_volume: i64,
    #[serde(rename = "52w_high")]
    fiftytwo_week_high: f64,
    #[serde(rename = "52w_low")]
    fiftytwo_week_low: f64,
    bid: f64,
    ask: f64,
}

impl<'a> From<&'a ScreenerRow> for ExportRecord<'a> {
    fn from(row: &'a ScreenerRow) -> Self {
        let (meta, q) = (&row.record, &row.quote);
        Self {
            ticker: &meta.ticker,
            name: &meta.name,
            sector: &meta.sector,
            industry: &meta.industry,
            notes: &meta.notes,
            date_added: &meta.date_added,
            price: q.price,
            market_cap: q.market_cap,
            daily_percent_change: q.daily_percent_change,
            volume: q.volume,
            average_volume: q.average_volume,
            fiftytwo_week_high: q.fiftytwo_week_high,
            fiftytwo_week_low: q.fiftytwo_week_low,
            bid: q.bid,
            ask: q.ask,
        }
    }
}

#[derive(Debug, Default)]
pub struct CsvExportAdapter;

impl CsvExportAdapter {
    /// Writes the header and one fully quoted line per row to `writer`.
    pub fn write_rows<W: Write>(rows: &[ScreenerRow], writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(writer);
        for row in rows {
            wtr.serialize(ExportRecord::from(row))?;
        }
        // an empty export still carries the header
        if rows.is_empty() {
            wtr.write_record(HEADER)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

const HEADER: [&str; 15] = [
    "ticker",
    "name",
    "sector",
    "industry",
    "notes",
    "date_added",
    "price",
    "market_cap",
    "daily_percent_change",
    "volume",
    "average_volume",
    "52w_high",
    "52w_low",
    "bid",
    "ask",
];

impl ExportPort for CsvExportAdapter {
    fn export(&self, rows: &[ScreenerRow], path: &Path) -> Result<(), QuantisError> {
        let export_error = |reason: String| QuantisError::Export {
            path: path.display().to_string(),
            reason,
        };
        let file = std::fs::File::create(path).map_err(|e| export_error(e.to_string()))?;
        Self::write_rows(rows, file).map_err(|e| export_error(e.to_string()))?;
        info!(path = %path.display(), rows = rows.len(), "exported snapshot");
        Ok(())
    }
}
