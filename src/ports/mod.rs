/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound (driven) ports describe the collaborators the analysis core needs:
/// manifest sources, the build registry, flow configuration, and output sinks.
pub mod outbound;
