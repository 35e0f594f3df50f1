/// Data Transfer Objects for application layer
///
/// DTOs carry parsed command options into the use cases, keeping the
/// domain layer unaware of the CLI and configuration file.
mod output_format;
mod requests;

pub use output_format::OutputFormat;
pub use requests::{CoherencyRequest, FlowRequest, GraphRequest};
