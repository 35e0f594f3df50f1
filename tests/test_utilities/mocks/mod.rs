/// Mock implementations for testing
mod mock_build_registry;
mod mock_flow_config_source;
mod mock_manifest_source;
mod mock_progress_reporter;

pub use mock_build_registry::MockBuildRegistry;
pub use mock_flow_config_source::MockFlowConfigSource;
pub use mock_manifest_source::MockManifestSource;
pub use mock_progress_reporter::MockProgressReporter;
