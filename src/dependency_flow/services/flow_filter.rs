use crate::dependency_flow::domain::{DependencyFlowGraph, FlowEdge, FlowNode, UpdateFrequency};

/// Selects the part of a flow graph worth showing.
#[derive(Debug, Clone)]
pub struct FlowFilter {
    /// Keep only nodes feeding this channel; `None` keeps the whole graph.
    pub channel: Option<String>,
    pub include_disabled_subscriptions: bool,
    pub included_frequencies: Vec<UpdateFrequency>,
}

impl Default for FlowFilter {
    fn default() -> Self {
        Self {
            channel: None,
            include_disabled_subscriptions: false,
            included_frequencies: UpdateFrequency::ALL.to_vec(),
        }
    }
}

impl FlowFilter {
    /// A node is interesting when it publishes to `channel`.
    pub fn is_interesting_node(channel: &str, node: &FlowNode) -> bool {
        node.output_channels.contains(channel)
    }

    pub fn is_interesting_edge(&self, edge: &FlowEdge) -> bool {
        (self.include_disabled_subscriptions || edge.subscription.enabled)
            && self
                .included_frequencies
                .contains(&edge.subscription.policy.update_frequency)
    }

    /// Prunes `graph` to what feeds the configured channel.
    ///
    /// Returns false when no channel is configured and the graph is untouched.
    pub fn apply(&self, graph: &mut DependencyFlowGraph) -> bool {
        let Some(channel) = self.channel.as_deref() else {
            return false;
        };
        graph.prune(
            |node| Self::is_interesting_node(channel, node),
            |edge| self.is_interesting_edge(edge),
        );
        true
    }
}
