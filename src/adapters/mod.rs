/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the ports,
/// backed by snapshot files, manifest directories and the console.
pub mod outbound;
