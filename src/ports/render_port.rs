//! Presentation port trait.

use crate::domain::anomaly::AlertTag;
use crate::domain::error::QuantisError;
use crate::domain::quote::ScreenerRow;

pub trait RenderPort {
    fn render(&mut self, rows: &[ScreenerRow]) -> Result<(), QuantisError>;

    /// `alerts[i]` belongs to `rows[i]`. With `alerts_only`, rows without
    /// alerts are omitted.
    fn render_with_alerts(
        &mut self,
        rows: &[ScreenerRow],
        alerts: &[Vec<AlertTag>],
        alerts_only: bool,
    ) -> Result<(), QuantisError>;

    fn clear_screen(&mut self) -> Result<(), QuantisError>;

    fn message(&mut self, text: &str) -> Result<(), QuantisError>;
}
