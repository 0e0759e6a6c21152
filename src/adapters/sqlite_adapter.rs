//! SQLite ticker registry.

use crate::domain::error::QuantisError;
use crate::domain::quote::TickerRecord;
use crate::ports::ticker_store_port::TickerStore;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use tracing::info;

pub struct SqliteTickerStore {
    pool: Pool<SqliteConnectionManager>,
}

fn query_error(e: rusqlite::Error) -> QuantisError {
    QuantisError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn pool_error(e: r2d2::Error) -> QuantisError {
    QuantisError::Database {
        reason: e.to_string(),
    }
}

impl SqliteTickerStore {
    /// Opens (creating if needed) the database file and ensures the schema
    /// exists.
    pub fn open(db_path: &str, pool_size: u32) -> Result<Self, QuantisError> {
        let manager = SqliteConnectionManager::file(db_path);
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .build(manager)
            .map_err(pool_error)?;

        let store = Self { pool };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self, QuantisError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_error)?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), QuantisError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS tickers (
                    ticker TEXT PRIMARY KEY,
                    name TEXT,
                    sector TEXT,
                    industry TEXT,
                    notes TEXT,
                    date_added TEXT
                );",
            )
            .map_err(query_error)
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, QuantisError> {
        self.pool.get().map_err(pool_error)
    }
}

impl TickerStore for SqliteTickerStore {
    fn add_ticker(&self, record: &TickerRecord) -> Result<(), QuantisError> {
        if self.ticker_exists(&record.ticker)? {
            return Err(QuantisError::TickerExists {
                ticker: record.ticker.clone(),
            });
        }

        self.conn()?
            .execute(
                "INSERT INTO tickers (ticker, name, sector, industry, notes, date_added)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.ticker,
                    record.name,
                    record.sector,
                    record.industry,
                    record.notes,
                    record.date_added
                ],
            )
            .map_err(query_error)?;

        info!(ticker = %record.ticker, "ticker added");
        Ok(())
    }

    fn remove_ticker(&self, ticker: &str) -> Result<(), QuantisError> {
        let removed = self
            .conn()?
            .execute("DELETE FROM tickers WHERE ticker = ?1", params![ticker])
            .map_err(query_error)?;

        if removed == 0 {
            return Err(QuantisError::TickerNotFound {
                ticker: ticker.to_string(),
            });
        }
        info!(ticker, "ticker removed");
        Ok(())
    }

    fn ticker_exists(&self, ticker: &str) -> Result<bool, QuantisError> {
        let found: Option<i64> = self
            .conn()?
            .query_row(
                "SELECT 1 FROM tickers WHERE ticker = ?1",
                params![ticker],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_error)?;
        Ok(found.is_some())
    }

    fn list_tickers(&self) -> Result<Vec<TickerRecord>, QuantisError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT ticker, name, sector, industry, notes, date_added
                 FROM tickers ORDER BY ticker",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map([], |row| {
                let text = |i: usize| -> rusqlite::Result<String> {
                    Ok(row.get::<_, Option<String>>(i)?.unwrap_or_default())
                };
                Ok(TickerRecord {
                    ticker: row.get(0)?,
                    name: text(1)?,
                    sector: text(2)?,
                    industry: text(3)?,
                    notes: text(4)?,
                    date_added: text(5)?,
                })
            })
            .map_err(query_error)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(query_error)?);
        }
        Ok(records)
    }
}
