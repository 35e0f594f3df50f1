/// Formatter adapters for the supported report formats
mod graphviz_formatter;
mod json_formatter;
mod text_formatter;

pub use graphviz_formatter::GraphvizFormatter;
pub use json_formatter::JsonFormatter;
pub use text_formatter::TextFormatter;
