//! Builds read models from domain graphs

use super::flow_view::{FlowEdgeView, FlowNodeView, FlowReport};
use super::graph_view::{BuildView, GraphNodeView, GraphReport};
use super::report::Report;
use super::update_view::UpdatesReport;
use crate::dependency_flow::domain::{DependencyFlowGraph, DependencyGraph, FlowNodeId, UpdatePlan};
use std::collections::HashMap;

/// Converts analysis results into [`Report`]s.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Graph report; node indices are the graph's own arena positions.
    pub fn graph(graph: &DependencyGraph) -> Report {
        let nodes = graph
            .nodes()
            .map(|(id, node)| GraphNodeView {
                index: id.0,
                repository: node.repository.clone(),
                commit: node.commit.clone(),
                incoherent: graph.is_incoherent(id),
                dependencies: node.dependencies.clone(),
                children: node.children.iter().map(|c| c.0).collect(),
                parents: node.parents.iter().map(|p| p.0).collect(),
                contributing_builds: node.contributing_builds.iter().map(|b| b.id).collect(),
            })
            .collect();

        Report::Graph(GraphReport {
            root: graph.root().0,
            nodes,
            unique_dependencies: graph.unique_dependencies().to_vec(),
            incoherent_dependencies: graph.incoherent_dependencies().to_vec(),
            contributing_builds: graph
                .contributing_builds()
                .into_iter()
                .map(|b| BuildView {
                    id: b.id,
                    repository: b.repository.clone(),
                    commit: b.commit.clone(),
                    build_number: b.build_number.clone(),
                })
                .collect(),
            cycles: graph
                .cycles()
                .iter()
                .map(|path| path.iter().map(|id| id.0).collect())
                .collect(),
        })
    }

    /// Flow report; surviving nodes are renumbered densely.
    pub fn flow(graph: &DependencyFlowGraph, channel: Option<&str>, build_times: bool) -> Report {
        let index: HashMap<FlowNodeId, usize> = graph
            .node_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();

        let nodes = graph
            .nodes()
            .enumerate()
            .map(|(i, (_, node))| FlowNodeView {
                index: i,
                uid: node.uid,
                repository: node.repository.clone(),
                branch: node.branch.clone(),
                output_channels: node.output_channels.iter().cloned().collect(),
                input_channels: node.input_channels.iter().cloned().collect(),
                official_build_time: node.official_build_time,
                pr_build_time: node.pr_build_time,
                goal_time_in_minutes: node.goal_time_in_minutes,
                best_case_time: node.best_case_time,
                worst_case_time: node.worst_case_time,
                on_longest_build_path: node.on_longest_build_path,
            })
            .collect();

        let edges = graph
            .edges()
            .filter_map(|(_, edge)| {
                Some(FlowEdgeView {
                    from: *index.get(&edge.from)?,
                    to: *index.get(&edge.to)?,
                    subscription_id: edge.subscription.id,
                    channel: edge.subscription.channel.clone(),
                    update_frequency: edge.subscription.policy.update_frequency,
                    enabled: edge.subscription.enabled,
                    part_of_cycle: edge.part_of_cycle,
                    back_edge: edge.back_edge,
                    on_longest_build_path: edge.on_longest_build_path,
                    tooling_only: edge.tooling_only,
                })
            })
            .collect();

        Report::Flow(FlowReport {
            channel: channel.map(str::to_string),
            build_times,
            nodes,
            edges,
        })
    }

    pub fn updates(repository: &str, commit: &str, build_id: Option<u64>, plan: UpdatePlan) -> Report {
        Report::Updates(UpdatesReport {
            repository: repository.to_string(),
            commit: commit.to_string(),
            build_id,
            non_coherency_updates: plan.non_coherency_updates,
            coherency_updates: plan.coherency_updates,
        })
    }
}
