//! Port traits for the screener's external collaborators.

pub mod config_port;
pub mod export_port;
pub mod quote_port;
pub mod render_port;
pub mod ticker_store_port;
