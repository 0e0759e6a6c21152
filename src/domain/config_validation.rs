//! Configuration validation.
//!
//! Every key is optional; only values that are present and out of range are
//! rejected.

use crate::domain::error::QuantisError;
use crate::domain::stats_buffer::MAX_CAPACITY;
use crate::ports::config_port::ConfigPort;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_screener_config(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    validate_pool_size(config)?;
    validate_refresh_interval(config)?;
    validate_window_capacity(config)?;
    validate_market(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> QuantisError {
    QuantisError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    if config.get_int("storage", "pool_size", 4) < 1 {
        return Err(invalid("storage", "pool_size", "pool_size must be at least 1"));
    }
    Ok(())
}

fn validate_refresh_interval(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    if config.get_int("screener", "refresh_interval_ms", 1000) <= 0 {
        return Err(invalid(
            "screener",
            "refresh_interval_ms",
            "refresh_interval_ms must be positive",
        ));
    }
    Ok(())
}

fn validate_window_capacity(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    let capacity = config.get_int("screener", "window_capacity", 60);
    if capacity < 1 {
        return Err(invalid(
            "screener",
            "window_capacity",
            "window_capacity must be at least 1",
        ));
    }
    if capacity > MAX_CAPACITY as i64 {
        return Err(invalid(
            "screener",
            "window_capacity",
            &format!("window_capacity must be at most {MAX_CAPACITY}"),
        ));
    }
    Ok(())
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    let source = config
        .get_string("market", "source")
        .unwrap_or_else(|| "synthetic".to_string());
    match source.trim().to_lowercase().as_str() {
        "synthetic" => {}
        "csv" => {
            let dir = config.get_string("market", "csv_dir").unwrap_or_default();
            if dir.trim().is_empty() {
                return Err(invalid(
                    "market",
                    "csv_dir",
                    "csv_dir is required when source = csv",
                ));
            }
        }
        _ => {
            return Err(invalid(
                "market",
                "source",
                "source must be 'synthetic' or 'csv'",
            ));
        }
    }

    if let Some(seed) = config.get_string("market", "seed") {
        if seed.trim().parse::<u64>().is_err() {
            return Err(invalid(
                "market",
                "seed",
                "seed must be a non-negative integer",
            ));
        }
    }
    Ok(())
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), QuantisError> {
    if let Some(level) = config.get_string("logging", "level") {
        if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) {
            return Err(invalid(
                "logging",
                "level",
                "level must be one of trace, debug, info, warn, error",
            ));
        }
    }
    Ok(())
}
