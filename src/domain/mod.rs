//! Core domain types and logic.

pub mod quote;
pub mod stats_buffer;
pub mod anomaly;
pub mod screener;
pub mod config_validation;
pub mod error;
