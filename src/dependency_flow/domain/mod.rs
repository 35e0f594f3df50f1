pub mod build;
pub mod channel;
pub mod coherency;
pub mod dependency;
pub mod dependency_graph;
pub mod flow_graph;
pub mod identity;

pub use build::{Asset, AssetLocation, Build, LocationType};
pub use channel::{BuildTime, DefaultChannel, Subscription, SubscriptionPolicy, UpdateFrequency};
pub use coherency::{CoherencyError, UpdatePlan};
pub use dependency::{DependencyDetail, DependencyType, DependencyUpdate};
pub use dependency_graph::{DependencyGraph, DependencyGraphNode, NodeId};
pub use flow_graph::{DependencyFlowGraph, FlowEdge, FlowEdgeId, FlowNode, FlowNodeId};
pub use identity::{normalize_branch, repo_commit_key, DependencyKey};
