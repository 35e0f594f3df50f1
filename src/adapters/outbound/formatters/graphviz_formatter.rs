use crate::application::read_models::{FlowEdgeView, FlowReport, GraphReport, Report};
use crate::dependency_flow::domain::UpdateFrequency;
use crate::ports::outbound::ReportFormatter;
use crate::shared::error::FlowError;
use crate::shared::Result;

const LONGEST_PATH_COLOR: &str = "darkgreen";

/// GraphvizFormatter adapter rendering graph and flow reports as DOT
///
/// Flow edges are styled by update frequency: `everyBuild` bold, daily and
/// weekly variants dashed, `none` dotted. Update plans have no graph shape
/// and are rejected.
pub struct GraphvizFormatter;

impl GraphvizFormatter {
    pub fn new() -> Self {
        Self
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }

    fn edge_style(frequency: UpdateFrequency) -> &'static str {
        match frequency {
            UpdateFrequency::EveryBuild => "bold",
            UpdateFrequency::EveryDay | UpdateFrequency::TwiceDaily | UpdateFrequency::EveryWeek => {
                "dashed"
            }
            UpdateFrequency::None => "dotted",
        }
    }

    fn render_graph(&self, output: &mut String, report: &GraphReport) {
        output.push_str("digraph dependencies {\n");
        output.push_str("  node [shape=box];\n");
        for node in &report.nodes {
            let mut attributes = format!(
                "label=\"{}\\n{}\"",
                Self::escape(&node.repository),
                Self::escape(&node.commit)
            );
            if node.incoherent {
                attributes.push_str(", color=red, fontcolor=red");
            }
            if node.index == report.root {
                attributes.push_str(", penwidth=2");
            }
            output.push_str(&format!("  n{} [{}];\n", node.index, attributes));
        }
        for node in &report.nodes {
            for child in &node.children {
                output.push_str(&format!("  n{} -> n{};\n", node.index, child));
            }
        }
        output.push_str("}\n");
    }

    fn flow_edge_attributes(edge: &FlowEdgeView) -> String {
        let mut attributes = format!(
            "label=\"{}\", style={}",
            Self::escape(&edge.channel),
            Self::edge_style(edge.update_frequency)
        );
        if edge.on_longest_build_path {
            attributes.push_str(&format!(", color={}, penwidth=2", LONGEST_PATH_COLOR));
        } else if edge.tooling_only {
            attributes.push_str(", color=gray");
        }
        if edge.back_edge {
            attributes.push_str(", constraint=false");
        }
        attributes
    }

    fn render_flow(&self, output: &mut String, report: &FlowReport) {
        output.push_str("digraph flow {\n");
        output.push_str("  rankdir=LR;\n");
        output.push_str("  node [shape=box];\n");
        for node in &report.nodes {
            let mut label = format!(
                "{}\\n{}",
                Self::escape(&node.repository),
                Self::escape(&node.branch)
            );
            if report.build_times {
                label.push_str(&format!(
                    "\\nbest {:.1} / worst {:.1}",
                    node.best_case_time, node.worst_case_time
                ));
            }
            let mut attributes = format!("label=\"{}\"", label);
            if node.on_longest_build_path {
                attributes.push_str(&format!(", color={}, penwidth=2", LONGEST_PATH_COLOR));
            }
            output.push_str(&format!("  n{} [{}];\n", node.index, attributes));
        }
        for edge in &report.edges {
            output.push_str(&format!(
                "  n{} -> n{} [{}];\n",
                edge.from,
                edge.to,
                Self::flow_edge_attributes(edge)
            ));
        }
        output.push_str("}\n");
    }
}

impl Default for GraphvizFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for GraphvizFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        let mut output = String::new();
        match report {
            Report::Graph(graph) => self.render_graph(&mut output, graph),
            Report::Flow(flow) => self.render_flow(&mut output, flow),
            Report::Updates(_) => {
                return Err(FlowError::Validation {
                    message: "DOT output is only available for graph and flow reports".to_string(),
                }
                .into())
            }
        }
        Ok(output)
    }
}
