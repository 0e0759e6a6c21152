//! Snapshot export port trait.

use crate::domain::error::QuantisError;
use crate::domain::quote::ScreenerRow;
use std::path::Path;

pub trait ExportPort {
    fn export(&self, rows: &[ScreenerRow], path: &Path) -> Result<(), QuantisError>;
}
