/// Use cases module containing application business logic orchestration
mod build_dependency_graph;
mod build_flow_graph;
mod resolve_coherency;

pub use build_dependency_graph::BuildDependencyGraphUseCase;
pub use build_flow_graph::BuildFlowGraphUseCase;
pub use resolve_coherency::ResolveCoherencyUseCase;
