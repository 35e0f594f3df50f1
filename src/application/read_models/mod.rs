//! Read models for reporting
//!
//! Serializable, index-based views of the analysis results. Graph adjacency
//! is expressed as node indices so cyclic graphs serialize without recursion.

pub mod flow_view;
pub mod graph_view;
pub mod report;
pub mod report_builder;
pub mod update_view;

pub use flow_view::{FlowEdgeView, FlowNodeView, FlowReport};
pub use graph_view::{BuildView, GraphNodeView, GraphReport};
pub use report::Report;
pub use report_builder::ReportBuilder;
pub use update_view::UpdatesReport;
