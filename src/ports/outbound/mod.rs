/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach manifests, build records, channel configuration and the console.
pub mod build_registry;
pub mod flow_config_source;
pub mod manifest_source;
pub mod output_presenter;
pub mod progress_reporter;
pub mod report_formatter;

pub use build_registry::BuildRegistry;
pub use flow_config_source::FlowConfigSource;
pub use manifest_source::ManifestSource;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
