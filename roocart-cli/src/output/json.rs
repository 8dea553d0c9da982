//! JSON output formatting.

use anyhow::Result;
use roocart_checkout::RunReport;

/// Serializes run reports.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}
