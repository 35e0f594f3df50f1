use crate::application::read_models::Report;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use anyhow::Context;

/// JsonFormatter adapter rendering any report as pretty-printed JSON
///
/// Reports carry a `kind` tag (`graph`, `updates`, `flow`) so consumers can
/// dispatch without knowing which command produced them.
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        serde_json::to_string_pretty(report)
            .with_context(|| format!("Failed to serialize {} report to JSON", report.kind()))
    }
}
