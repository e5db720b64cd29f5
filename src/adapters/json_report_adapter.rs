//! JSON report adapter implementing ReportPort.
//!
//! Emits the camelCase result document consumed by charting front ends.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportAdapter {
    pub pretty: bool,
}

impl JsonReportAdapter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportPort for JsonReportAdapter {
    fn render(&self, result: &BacktestResult) -> Result<String, BacktestError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string(result)
        };
        text.map_err(|e| BacktestError::Report {
            reason: format!("failed to serialize result: {e}"),
        })
    }
}
