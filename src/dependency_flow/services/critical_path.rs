use crate::dependency_flow::domain::{DependencyFlowGraph, FlowEdgeId, FlowNodeId};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// Cycle marking and longest-build-path analysis over a flow graph.
pub struct CriticalPathAnalyzer;

impl CriticalPathAnalyzer {
    /// Runs back-edge marking, path-time calculation and longest-path marking.
    pub fn analyze(graph: &mut DependencyFlowGraph) {
        Self::mark_back_edges(graph);
        Self::calculate_longest_path_times(graph);
        Self::mark_longest_build_path(graph);
    }

    /// Flags edges that close a cycle.
    ///
    /// Dominators are computed on the reversed graph from a virtual start
    /// joined to every node without outgoing edges. Edge `from -> to` is a back
    /// edge when `from` dominates `to` there. Independently, an edge is part of
    /// a cycle when `from` is reachable from `to`.
    pub fn mark_back_edges(graph: &mut DependencyFlowGraph) {
        let ids = graph.node_ids();
        let position: HashMap<FlowNodeId, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let start = ids.len();

        // Predecessors of a node in the reversed graph are its edge targets.
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
        for (i, id) in ids.iter().enumerate() {
            let Some(node) = graph.node(*id) else {
                continue;
            };
            if node.outgoing_edges.is_empty() {
                predecessors[i].push(start);
            }
            for edge_id in &node.outgoing_edges {
                if let Some(to) = graph.edge(*edge_id).and_then(|e| position.get(&e.to)) {
                    predecessors[i].push(*to);
                }
            }
        }

        let everything: BTreeSet<usize> = (0..=start).collect();
        let mut dominators: Vec<BTreeSet<usize>> = vec![everything; start + 1];
        dominators[start] = BTreeSet::from([start]);

        let mut changed = true;
        while changed {
            changed = false;
            for i in 0..start {
                let mut preds = predecessors[i].iter();
                let Some(first) = preds.next() else {
                    continue;
                };
                let mut next = dominators[*first].clone();
                for p in preds {
                    next = next.intersection(&dominators[*p]).copied().collect();
                }
                next.insert(i);
                if next != dominators[i] {
                    dominators[i] = next;
                    changed = true;
                }
            }
        }

        let reachable = reachability(graph);
        for edge_id in graph.edge_ids() {
            let Some((from, to)) = graph.edge(edge_id).map(|e| (e.from, e.to)) else {
                continue;
            };
            let back_edge = match (position.get(&from), position.get(&to)) {
                (Some(f), Some(t)) => dominators[*t].contains(f),
                _ => false,
            };
            let part_of_cycle = reachable.get(&to).is_some_and(|r| r.contains(&from));
            if let Some(edge) = graph.edge_mut(edge_id) {
                edge.back_edge = back_edge;
                edge.part_of_cycle = part_of_cycle;
            }
        }
    }

    /// Computes best- and worst-case downstream build times for every node.
    ///
    /// Tooling-only edges are ignored. Non-back edges are preferred; a node
    /// whose remaining edges are all back edges uses them anyway. Nodes are
    /// evaluated downstream first, so nodes caught in an unresolvable cycle
    /// keep their previous times.
    pub fn calculate_longest_path_times(graph: &mut DependencyFlowGraph) {
        let chosen: HashMap<FlowNodeId, Vec<FlowNodeId>> = graph
            .node_ids()
            .into_iter()
            .map(|id| (id, chosen_targets(graph, id)))
            .collect();

        let mut pending: HashMap<FlowNodeId, usize> = HashMap::new();
        let mut upstream: HashMap<FlowNodeId, Vec<FlowNodeId>> = HashMap::new();
        for (id, targets) in &chosen {
            pending.insert(*id, targets.len());
            for target in targets {
                upstream.entry(*target).or_default().push(*id);
            }
        }

        let mut ready: VecDeque<FlowNodeId> = graph
            .node_ids()
            .into_iter()
            .filter(|id| pending.get(id) == Some(&0))
            .collect();
        let mut evaluated = 0usize;

        while let Some(id) = ready.pop_front() {
            let targets = chosen.get(&id).map(Vec::as_slice).unwrap_or(&[]);
            let (best_downstream, worst_downstream) = targets
                .iter()
                .filter_map(|t| graph.node(*t))
                .fold((0.0_f64, 0.0_f64), |(best, worst), t| {
                    (
                        best.max(t.best_case_time),
                        worst.max(t.worst_case_time + t.pr_build_time),
                    )
                });
            if let Some(node) = graph.node_mut(id) {
                node.best_case_time = best_downstream + node.official_build_time;
                node.worst_case_time = worst_downstream + node.official_build_time;
            }
            evaluated += 1;

            for parent in upstream.get(&id).into_iter().flatten() {
                if let Some(count) = pending.get_mut(parent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(*parent);
                    }
                }
            }
        }

        if evaluated < graph.node_count() {
            debug!(
                unresolved = graph.node_count() - evaluated,
                "Some nodes sit on cycles without back edges and keep their times"
            );
        }
    }

    /// Marks the chain of nodes with the longest best-case path.
    ///
    /// Starts from the slowest non-tooling node and greedily follows the
    /// slowest non-back, non-tooling edge until no unmarked edge remains.
    pub fn mark_longest_build_path(graph: &mut DependencyFlowGraph) {
        let mut start: Option<(FlowNodeId, f64)> = None;
        for (id, node) in graph.nodes() {
            if Self::is_tooling_only(graph, id) {
                continue;
            }
            if start.map_or(true, |(_, best)| node.best_case_time > best) {
                start = Some((id, node.best_case_time));
            }
        }
        let Some((mut current, _)) = start else {
            return;
        };
        if let Some(node) = graph.node_mut(current) {
            node.on_longest_build_path = true;
        }

        loop {
            let mut next: Option<(FlowEdgeId, FlowNodeId, f64)> = None;
            let outgoing = graph
                .node(current)
                .map(|n| n.outgoing_edges.clone())
                .unwrap_or_default();
            for edge_id in outgoing {
                let Some(edge) = graph.edge(edge_id) else {
                    continue;
                };
                if edge.on_longest_build_path || edge.back_edge || edge.tooling_only {
                    continue;
                }
                let target_time = graph.node(edge.to).map_or(0.0, |n| n.best_case_time);
                if next.map_or(true, |(_, _, best)| target_time >= best) {
                    next = Some((edge_id, edge.to, target_time));
                }
            }

            let Some((edge_id, target, _)) = next else {
                break;
            };
            if let Some(edge) = graph.edge_mut(edge_id) {
                edge.on_longest_build_path = true;
            }
            if let Some(node) = graph.node_mut(target) {
                node.on_longest_build_path = true;
            }
            current = target;
        }
    }

    /// True when a node has outgoing edges and every one of them is tooling-only.
    pub fn is_tooling_only(graph: &DependencyFlowGraph, id: FlowNodeId) -> bool {
        let Some(node) = graph.node(id) else {
            return false;
        };
        !node.outgoing_edges.is_empty()
            && node
                .outgoing_edges
                .iter()
                .filter_map(|e| graph.edge(*e))
                .all(|e| e.tooling_only)
    }
}

fn chosen_targets(graph: &DependencyFlowGraph, id: FlowNodeId) -> Vec<FlowNodeId> {
    let Some(node) = graph.node(id) else {
        return Vec::new();
    };
    let product: Vec<_> = node
        .outgoing_edges
        .iter()
        .filter_map(|e| graph.edge(*e))
        .filter(|e| !e.tooling_only)
        .collect();
    let forward: Vec<FlowNodeId> = product
        .iter()
        .filter(|e| !e.back_edge)
        .map(|e| e.to)
        .collect();
    if forward.is_empty() {
        product.iter().map(|e| e.to).collect()
    } else {
        forward
    }
}

/// Nodes reachable from each node by following outgoing edges.
fn reachability(graph: &DependencyFlowGraph) -> HashMap<FlowNodeId, HashSet<FlowNodeId>> {
    let mut result = HashMap::new();
    for (start, _) in graph.nodes() {
        let mut seen: HashSet<FlowNodeId> = HashSet::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = graph.node(id) else {
                continue;
            };
            for edge in node.outgoing_edges.iter().filter_map(|e| graph.edge(*e)) {
                if seen.insert(edge.to) {
                    stack.push(edge.to);
                }
            }
        }
        result.insert(start, seen);
    }
    result
}
