//! Dependency graph views

use crate::dependency_flow::domain::DependencyDetail;
use serde::Serialize;

/// Build summary attached to graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildView {
    pub id: u64,
    pub repository: String,
    pub commit: String,
    pub build_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphNodeView {
    pub index: usize,
    pub repository: String,
    pub commit: String,
    pub incoherent: bool,
    pub dependencies: Vec<DependencyDetail>,
    /// Indices of nodes this node depends on
    pub children: Vec<usize>,
    /// Indices of nodes depending on this node
    pub parents: Vec<usize>,
    /// Ids of builds that produced this node's incoming dependencies
    pub contributing_builds: Vec<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    pub root: usize,
    pub nodes: Vec<GraphNodeView>,
    pub unique_dependencies: Vec<DependencyDetail>,
    pub incoherent_dependencies: Vec<DependencyDetail>,
    pub contributing_builds: Vec<BuildView>,
    /// Node index paths closing each skipped cycle
    pub cycles: Vec<Vec<usize>>,
}

impl GraphReport {
    pub fn root_node(&self) -> Option<&GraphNodeView> {
        self.nodes.get(self.root)
    }

    pub fn incoherent_nodes(&self) -> impl Iterator<Item = &GraphNodeView> {
        self.nodes.iter().filter(|n| n.incoherent)
    }
}
