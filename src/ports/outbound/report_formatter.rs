use crate::application::read_models::Report;
use crate::shared::Result;

/// ReportFormatter port for rendering analysis results
pub trait ReportFormatter {
    /// Renders a report
    ///
    /// # Errors
    /// Returns an error if serialization fails or the format cannot
    /// represent this kind of report
    fn format(&self, report: &Report) -> Result<String>;
}
