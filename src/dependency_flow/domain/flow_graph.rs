use super::channel::{DefaultChannel, Subscription};
use super::identity::normalize_branch;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowNodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowEdgeId(pub usize);

/// A repository branch taking part in channel flow.
#[derive(Debug, Clone)]
pub struct FlowNode {
    pub uid: Uuid,
    pub repository: String,
    pub branch: String,
    pub output_channels: BTreeSet<String>,
    /// Derived from incoming edges; refreshed on every structural change.
    pub input_channels: BTreeSet<String>,
    pub incoming_edges: Vec<FlowEdgeId>,
    pub outgoing_edges: Vec<FlowEdgeId>,
    pub official_build_time: f64,
    pub pr_build_time: f64,
    pub goal_time_in_minutes: i32,
    pub best_case_time: f64,
    pub worst_case_time: f64,
    pub on_longest_build_path: bool,
}

impl FlowNode {
    fn new(repository: &str, branch: &str) -> Self {
        Self {
            uid: Uuid::new_v4(),
            repository: repository.to_string(),
            branch: branch.to_string(),
            output_channels: BTreeSet::new(),
            input_channels: BTreeSet::new(),
            incoming_edges: Vec::new(),
            outgoing_edges: Vec::new(),
            official_build_time: 0.0,
            pr_build_time: 0.0,
            goal_time_in_minutes: 0,
            best_case_time: 0.0,
            worst_case_time: 0.0,
            on_longest_build_path: false,
        }
    }
}

/// One subscription-backed flow from `from` into `to`.
#[derive(Debug, Clone)]
pub struct FlowEdge {
    pub from: FlowNodeId,
    pub to: FlowNodeId,
    pub subscription: Subscription,
    pub part_of_cycle: bool,
    pub back_edge: bool,
    pub on_longest_build_path: bool,
    pub tooling_only: bool,
}

fn node_key(repository: &str, branch: &str) -> String {
    format!("{}@{}", repository, normalize_branch(branch)).to_lowercase()
}

/// Channel/subscription flow graph.
///
/// Nodes and edges are stored in arenas keyed by id. After construction the
/// graph only shrinks.
#[derive(Debug, Clone, Default)]
pub struct DependencyFlowGraph {
    nodes: BTreeMap<FlowNodeId, FlowNode>,
    edges: BTreeMap<FlowEdgeId, FlowEdge>,
    index: HashMap<String, FlowNodeId>,
    next_node: usize,
    next_edge: usize,
}

impl DependencyFlowGraph {
    /// Builds the flow graph from default channels and subscriptions.
    ///
    /// A subscription produces one edge per default channel that publishes
    /// the subscription's source repository to the subscription's channel.
    pub fn build(default_channels: &[DefaultChannel], subscriptions: &[Subscription]) -> Self {
        let mut graph = Self::default();

        for default_channel in default_channels {
            let id = graph.get_or_create_node(&default_channel.repository, &default_channel.branch);
            if let Some(node) = graph.nodes.get_mut(&id) {
                node.output_channels.insert(default_channel.channel.clone());
            }
        }

        for subscription in subscriptions {
            let target =
                graph.get_or_create_node(&subscription.target_repository, &subscription.target_branch);
            if let Some(node) = graph.nodes.get_mut(&target) {
                node.input_channels.insert(subscription.channel.clone());
            }

            let sources = default_channels.iter().filter(|dc| {
                dc.channel == subscription.channel
                    && dc.repository.eq_ignore_ascii_case(&subscription.source_repository)
            });
            for source in sources {
                let from = graph.get_or_create_node(&source.repository, &source.branch);
                graph.add_edge(from, target, subscription.clone());
            }
        }

        graph
    }

    /// Returns the node for `repository`/`branch`, creating it when missing.
    ///
    /// Lookup ignores case and a `refs/heads/` prefix on the branch.
    pub fn get_or_create_node(&mut self, repository: &str, branch: &str) -> FlowNodeId {
        let key = node_key(repository, branch);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = FlowNodeId(self.next_node);
        self.next_node += 1;
        self.nodes
            .insert(id, FlowNode::new(repository, normalize_branch(branch)));
        self.index.insert(key, id);
        id
    }

    fn add_edge(&mut self, from: FlowNodeId, to: FlowNodeId, subscription: Subscription) -> FlowEdgeId {
        let id = FlowEdgeId(self.next_edge);
        self.next_edge += 1;
        self.edges.insert(
            id,
            FlowEdge {
                from,
                to,
                subscription,
                part_of_cycle: false,
                back_edge: false,
                on_longest_build_path: false,
                tooling_only: false,
            },
        );
        if let Some(node) = self.nodes.get_mut(&from) {
            node.outgoing_edges.push(id);
        }
        if let Some(node) = self.nodes.get_mut(&to) {
            node.incoming_edges.push(id);
        }
        id
    }

    pub fn find_node(&self, repository: &str, branch: &str) -> Option<FlowNodeId> {
        self.index.get(&node_key(repository, branch)).copied()
    }

    pub fn node(&self, id: FlowNodeId) -> Option<&FlowNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: FlowNodeId) -> Option<&mut FlowNode> {
        self.nodes.get_mut(&id)
    }

    pub fn edge(&self, id: FlowEdgeId) -> Option<&FlowEdge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: FlowEdgeId) -> Option<&mut FlowEdge> {
        self.edges.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (FlowNodeId, &FlowNode)> {
        self.nodes.iter().map(|(id, n)| (*id, n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (FlowEdgeId, &FlowEdge)> {
        self.edges.iter().map(|(id, e)| (*id, e))
    }

    pub fn node_ids(&self) -> Vec<FlowNodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn edge_ids(&self) -> Vec<FlowEdgeId> {
        self.edges.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Recomputes a node's input channels from its current incoming edges.
    fn recompute_input_channels(&mut self, id: FlowNodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let channels: BTreeSet<String> = node
            .incoming_edges
            .iter()
            .filter_map(|e| self.edges.get(e))
            .map(|e| e.subscription.channel.clone())
            .collect();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.input_channels = channels;
        }
    }

    /// Detaches an edge from both endpoints and refreshes the target's inputs.
    pub fn remove_edge(&mut self, id: FlowEdgeId) {
        let Some(edge) = self.edges.remove(&id) else {
            return;
        };
        if let Some(from) = self.nodes.get_mut(&edge.from) {
            from.outgoing_edges.retain(|e| *e != id);
        }
        if let Some(to) = self.nodes.get_mut(&edge.to) {
            to.incoming_edges.retain(|e| *e != id);
        }
        self.recompute_input_channels(edge.to);
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: FlowNodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let touching: BTreeSet<FlowEdgeId> = node
            .incoming_edges
            .iter()
            .chain(node.outgoing_edges.iter())
            .copied()
            .collect();
        for edge in touching {
            self.remove_edge(edge);
        }
        if let Some(node) = self.nodes.remove(&id) {
            self.index.remove(&node_key(&node.repository, &node.branch));
        }
    }

    /// Keeps only what feeds an interesting node through interesting edges.
    ///
    /// Marking walks backward from every interesting node over interesting
    /// incoming edges; everything left unmarked is removed.
    pub fn prune<N, E>(&mut self, is_interesting_node: N, is_interesting_edge: E)
    where
        N: Fn(&FlowNode) -> bool,
        E: Fn(&FlowEdge) -> bool,
    {
        let mut marked_nodes: HashSet<FlowNodeId> = HashSet::new();
        let mut marked_edges: HashSet<FlowEdgeId> = HashSet::new();
        let mut stack: Vec<FlowNodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| is_interesting_node(n))
            .map(|(id, _)| *id)
            .collect();
        marked_nodes.extend(stack.iter().copied());

        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            for edge_id in &node.incoming_edges {
                let Some(edge) = self.edges.get(edge_id) else {
                    continue;
                };
                if !is_interesting_edge(edge) {
                    continue;
                }
                marked_edges.insert(*edge_id);
                if marked_nodes.insert(edge.from) {
                    stack.push(edge.from);
                }
            }
        }

        for edge in self.edge_ids() {
            if !marked_edges.contains(&edge) {
                self.remove_edge(edge);
            }
        }
        for node in self.node_ids() {
            if !marked_nodes.contains(&node) {
                self.remove_node(node);
            }
        }
    }
}
