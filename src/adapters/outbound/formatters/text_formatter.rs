use crate::application::read_models::{
    FlowEdgeView, FlowReport, GraphNodeView, GraphReport, Report, UpdatesReport,
};
use crate::dependency_flow::domain::DependencyUpdate;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;

/// TextFormatter adapter producing a human-readable summary of a report
pub struct TextFormatter;

impl TextFormatter {
    pub fn new() -> Self {
        Self
    }

    fn node_label(node: &GraphNodeView) -> String {
        format!("{} @ {}", node.repository, node.commit)
    }

    fn join_or_dash(values: &[String]) -> String {
        if values.is_empty() {
            "-".to_string()
        } else {
            values.join(", ")
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Graph report sections
impl TextFormatter {
    fn render_graph(&self, output: &mut String, report: &GraphReport) {
        let title = report
            .root_node()
            .map(Self::node_label)
            .unwrap_or_default();
        output.push_str(&format!("Dependency graph for {}\n\n", title));
        output.push_str(&format!("Nodes:                   {}\n", report.nodes.len()));
        output.push_str(&format!(
            "Unique dependencies:     {}\n",
            report.unique_dependencies.len()
        ));
        output.push_str(&format!(
            "Incoherent nodes:        {}\n",
            report.incoherent_nodes().count()
        ));
        output.push_str(&format!(
            "Incoherent dependencies: {}\n\n",
            report.incoherent_dependencies.len()
        ));

        output.push_str("Nodes:\n");
        for node in &report.nodes {
            let marker = if node.incoherent { "  [incoherent]" } else { "" };
            output.push_str(&format!("  {}{}\n", Self::node_label(node), marker));
            for child in node.children.iter().filter_map(|c| report.nodes.get(*c)) {
                output.push_str(&format!("    -> {}\n", Self::node_label(child)));
            }
        }

        if !report.incoherent_dependencies.is_empty() {
            output.push_str("\nIncoherent dependencies:\n");
            for dep in &report.incoherent_dependencies {
                output.push_str(&format!("  {} ({} @ {})\n", dep, dep.repo_uri, dep.commit));
            }
        }

        if !report.contributing_builds.is_empty() {
            output.push_str("\nContributing builds:\n");
            for build in &report.contributing_builds {
                output.push_str(&format!(
                    "  #{} {} ({} @ {})\n",
                    build.id, build.build_number, build.repository, build.commit
                ));
            }
        }

        if !report.cycles.is_empty() {
            output.push_str("\nCycles:\n");
            for cycle in &report.cycles {
                let labels: Vec<String> = cycle
                    .iter()
                    .filter_map(|i| report.nodes.get(*i))
                    .map(Self::node_label)
                    .collect();
                if let Some(first) = labels.first() {
                    output.push_str(&format!("  {} -> {}\n", labels.join(" -> "), first));
                }
            }
        }
    }
}

/// Update plan sections
impl TextFormatter {
    fn render_update(output: &mut String, update: &DependencyUpdate) {
        output.push_str(&format!(
            "  {}: {} -> {} ({} @ {})\n",
            update.to.name, update.from.version, update.to.version, update.to.repo_uri, update.to.commit
        ));
    }

    fn render_updates(&self, output: &mut String, report: &UpdatesReport) {
        output.push_str(&format!(
            "Dependency updates for {} @ {}\n\n",
            report.repository, report.commit
        ));

        if report.is_empty() {
            output.push_str("No updates required.\n");
            return;
        }

        if let Some(build_id) = report.build_id {
            output.push_str(&format!("Updates from build {}:\n", build_id));
            if report.non_coherency_updates.is_empty() {
                output.push_str("  (none)\n");
            }
            for update in &report.non_coherency_updates {
                Self::render_update(output, update);
            }
            output.push('\n');
        }

        output.push_str("Coherency updates:\n");
        if report.coherency_updates.is_empty() {
            output.push_str("  (none)\n");
        }
        for update in &report.coherency_updates {
            Self::render_update(output, update);
        }
    }
}

/// Flow report sections
impl TextFormatter {
    fn edge_flags(edge: &FlowEdgeView) -> String {
        let mut flags = vec![edge.update_frequency.to_string()];
        if !edge.enabled {
            flags.push("disabled".to_string());
        }
        if edge.back_edge {
            flags.push("back edge".to_string());
        } else if edge.part_of_cycle {
            flags.push("cycle".to_string());
        }
        if edge.tooling_only {
            flags.push("tooling".to_string());
        }
        flags.join(", ")
    }

    fn render_flow(&self, output: &mut String, report: &FlowReport) {
        match &report.channel {
            Some(channel) => output.push_str(&format!("Dependency flow into '{}'\n\n", channel)),
            None => output.push_str("Dependency flow across all channels\n\n"),
        }
        output.push_str(&format!("Nodes: {}\n", report.nodes.len()));
        output.push_str(&format!("Edges: {}\n\n", report.edges.len()));

        output.push_str("Nodes:\n");
        for node in &report.nodes {
            let marker = if node.on_longest_build_path { " *" } else { "" };
            output.push_str(&format!("  {} ({}){}\n", node.repository, node.branch, marker));
            output.push_str(&format!(
                "    outputs: {}\n    inputs:  {}\n",
                Self::join_or_dash(&node.output_channels),
                Self::join_or_dash(&node.input_channels)
            ));
            if report.build_times {
                output.push_str(&format!(
                    "    build: {:.1} min (PR {:.1}, goal {}), best {:.1}, worst {:.1}\n",
                    node.official_build_time,
                    node.pr_build_time,
                    node.goal_time_in_minutes,
                    node.best_case_time,
                    node.worst_case_time
                ));
            }
        }

        output.push_str("\nEdges:\n");
        for edge in &report.edges {
            let (Some(from), Some(to)) = (report.nodes.get(edge.from), report.nodes.get(edge.to))
            else {
                continue;
            };
            output.push_str(&format!(
                "  {} -> {} via '{}' [{}]\n",
                from.repository,
                to.repository,
                edge.channel,
                Self::edge_flags(edge)
            ));
        }

        if report.build_times {
            let path: Vec<&str> = report
                .longest_path()
                .map(|n| n.repository.as_str())
                .collect();
            if !path.is_empty() {
                output.push_str(&format!("\nLongest build path: {}\n", path.join(" -> ")));
            }
        }
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &Report) -> Result<String> {
        let mut output = String::new();
        match report {
            Report::Graph(graph) => self.render_graph(&mut output, graph),
            Report::Updates(updates) => self.render_updates(&mut output, updates),
            Report::Flow(flow) => self.render_flow(&mut output, flow),
        }
        Ok(output)
    }
}
