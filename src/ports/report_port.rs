//! Report generation port trait.

use std::fs;
use std::path::Path;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;

/// Port for rendering backtest results.
pub trait ReportPort {
    fn render(&self, result: &BacktestResult) -> Result<String, BacktestError>;

    /// Default implementation: render, then write the text to `output_path`.
    fn write(&self, result: &BacktestResult, output_path: &Path) -> Result<(), BacktestError> {
        let text = self.render(result)?;
        fs::write(output_path, text)?;
        Ok(())
    }
}
