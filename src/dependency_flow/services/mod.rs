pub mod asset_disambiguator;
pub mod build_times;
pub mod coherency_resolver;
pub mod critical_path;
pub mod fetch_cache;
pub mod flow_filter;
pub mod graph_builder;
pub mod tooling_classifier;

pub use asset_disambiguator::AssetDisambiguator;
pub use build_times::BuildTimeAssigner;
pub use coherency_resolver::CoherencyResolver;
pub use critical_path::CriticalPathAnalyzer;
pub use fetch_cache::FetchCache;
pub use flow_filter::FlowFilter;
pub use graph_builder::{DependencyGraphBuilder, GraphBuildOptions, GraphRoot};
pub use tooling_classifier::ToolingClassifier;

#[cfg(test)]
pub(crate) mod test_support;
