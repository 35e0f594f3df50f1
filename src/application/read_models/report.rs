use super::flow_view::FlowReport;
use super::graph_view::GraphReport;
use super::update_view::UpdatesReport;
use serde::Serialize;

/// Any report the tool can render.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Report {
    Graph(GraphReport),
    Updates(UpdatesReport),
    Flow(FlowReport),
}

impl Report {
    pub fn kind(&self) -> &'static str {
        match self {
            Report::Graph(_) => "graph",
            Report::Updates(_) => "updates",
            Report::Flow(_) => "flow",
        }
    }
}
