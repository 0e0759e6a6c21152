//! Concrete adapter implementations for ports.

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
pub mod csv_export_adapter;
pub mod csv_quote_adapter;
pub mod file_config_adapter;
pub mod synthetic_quote_adapter;
pub mod table_renderer;
