use super::build::Build;
use super::dependency::DependencyDetail;
use super::identity::{repo_commit_key, DependencyKey};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Index of a node inside its [`DependencyGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A repository at a commit, with the dependencies its manifest declared there.
#[derive(Debug, Clone)]
pub struct DependencyGraphNode {
    pub repository: String,
    pub commit: String,
    pub dependencies: Vec<DependencyDetail>,
    pub children: BTreeSet<NodeId>,
    pub parents: BTreeSet<NodeId>,
    pub contributing_builds: Vec<Build>,
}

impl DependencyGraphNode {
    fn new(repository: &str, commit: &str) -> Self {
        Self {
            repository: repository.to_string(),
            commit: commit.to_string(),
            dependencies: Vec::new(),
            children: BTreeSet::new(),
            parents: BTreeSet::new(),
            contributing_builds: Vec::new(),
        }
    }

    pub fn key(&self) -> String {
        repo_commit_key(&self.repository, &self.commit)
    }
}

/// Transitive dependency graph across repositories.
///
/// Nodes live in an arena and refer to each other by [`NodeId`], so parent and
/// child links may form cycles without shared ownership. Each `repo@commit`
/// maps to exactly one node.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: Vec<DependencyGraphNode>,
    index: HashMap<String, NodeId>,
    root: NodeId,
    unique_dependencies: Vec<DependencyDetail>,
    unique_keys: HashSet<DependencyKey>,
    incoherent_nodes: BTreeSet<NodeId>,
    incoherent_dependencies: Vec<DependencyDetail>,
    incoherent_keys: HashSet<DependencyKey>,
    cycles: Vec<Vec<NodeId>>,
}

impl DependencyGraph {
    /// Creates a graph holding only the root node.
    pub fn with_root(repository: &str, commit: &str) -> Self {
        let root = DependencyGraphNode::new(repository, commit);
        let mut index = HashMap::new();
        index.insert(root.key(), NodeId(0));
        Self {
            nodes: vec![root],
            index,
            root: NodeId(0),
            unique_dependencies: Vec::new(),
            unique_keys: HashSet::new(),
            incoherent_nodes: BTreeSet::new(),
            incoherent_dependencies: Vec::new(),
            incoherent_keys: HashSet::new(),
            cycles: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &DependencyGraphNode {
        &self.nodes[self.root.0]
    }

    pub fn node(&self, id: NodeId) -> &DependencyGraphNode {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut DependencyGraphNode {
        &mut self.nodes[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in discovery order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &DependencyGraphNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn find(&self, repository: &str, commit: &str) -> Option<NodeId> {
        self.index.get(&repo_commit_key(repository, commit)).copied()
    }

    /// Adds a node for `repository@commit`, or returns the existing one.
    ///
    /// The boolean is true when a new node was created.
    pub(crate) fn insert_node(&mut self, repository: &str, commit: &str) -> (NodeId, bool) {
        let key = repo_commit_key(repository, commit);
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(DependencyGraphNode::new(repository, commit));
        self.index.insert(key, id);
        (id, true)
    }

    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.insert(child);
        self.nodes[child.0].parents.insert(parent);
    }

    /// Records a dependency unless an identical one (name, version, repo, commit) is known.
    pub(crate) fn record_dependency(&mut self, dependency: &DependencyDetail) {
        if self.unique_keys.insert(DependencyKey::from(dependency)) {
            self.unique_dependencies.push(dependency.clone());
        }
    }

    pub(crate) fn mark_incoherent_node(&mut self, id: NodeId) {
        self.incoherent_nodes.insert(id);
    }

    pub(crate) fn mark_incoherent_dependency(&mut self, dependency: &DependencyDetail) {
        if self.incoherent_keys.insert(DependencyKey::from(dependency)) {
            self.incoherent_dependencies.push(dependency.clone());
        }
    }

    /// Records a cycle path, starting at the node the cycle returns to.
    pub(crate) fn record_cycle(&mut self, path: Vec<NodeId>) {
        if !self.cycles.contains(&path) {
            self.cycles.push(path);
        }
    }

    /// Cycle paths found during the build; empty unless they were requested.
    pub fn cycles(&self) -> &[Vec<NodeId>] {
        &self.cycles
    }

    pub fn unique_dependencies(&self) -> &[DependencyDetail] {
        &self.unique_dependencies
    }

    pub fn incoherent_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.incoherent_nodes.iter().copied()
    }

    pub fn is_incoherent(&self, id: NodeId) -> bool {
        self.incoherent_nodes.contains(&id)
    }

    pub fn incoherent_dependencies(&self) -> &[DependencyDetail] {
        &self.incoherent_dependencies
    }

    /// Builds attached to any node, deduplicated by id.
    pub fn contributing_builds(&self) -> Vec<&Build> {
        let mut seen = HashSet::new();
        self.nodes
            .iter()
            .flat_map(|n| n.contributing_builds.iter())
            .filter(|b| seen.insert(b.id))
            .collect()
    }
}
