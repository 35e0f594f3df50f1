/// Integration tests for the application layer
mod test_utilities;

use depflow::prelude::*;
use test_utilities::mocks::*;

const APP: &str = "https://github.com/org/app";
const RUNTIME: &str = "https://github.com/org/runtime";
const EXTENSIONS: &str = "https://github.com/org/extensions";
const TOOLS: &str = "https://github.com/org/tools";

fn dep(name: &str, version: &str, repo: &str, commit: &str) -> DependencyDetail {
    DependencyDetail::new(name, version, repo, commit)
}

#[tokio::test]
async fn test_dependency_graph_happy_path() {
    let manifests = MockManifestSource::new()
        .with_manifest(
            APP,
            "app1",
            vec![
                dep("Runtime", "1.0", RUNTIME, "rt1"),
                dep("Extensions", "1.0", EXTENSIONS, "ex1"),
            ],
        )
        .with_manifest(RUNTIME, "rt1", vec![dep("Extensions", "1.0", EXTENSIONS, "ex1")])
        .with_manifest(EXTENSIONS, "ex1", vec![]);
    let progress_reporter = MockProgressReporter::new();

    let use_case = BuildDependencyGraphUseCase::new(
        Some(manifests.clone()),
        None::<MockBuildRegistry>,
        progress_reporter.clone(),
    );
    let graph = use_case
        .execute(GraphRequest::new(APP, "app1"))
        .await
        .unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.unique_dependencies().len(), 2);
    assert_eq!(graph.incoherent_nodes().count(), 0);
    let extensions = graph.find(EXTENSIONS, "ex1").unwrap();
    assert_eq!(graph.node(extensions).parents.len(), 2);
    // The shared extensions manifest is read once.
    assert_eq!(manifests.request_count(), 3);
    assert!(progress_reporter.contains("3 nodes"));
}

#[tokio::test]
async fn test_dependency_graph_flags_incoherent_commits() {
    let manifests = MockManifestSource::new()
        .with_manifest(
            APP,
            "app1",
            vec![
                dep("Runtime", "1.0", RUNTIME, "rt1"),
                dep("Tools", "3.0", TOOLS, "t1"),
            ],
        )
        .with_manifest(RUNTIME, "rt1", vec![])
        .with_manifest(RUNTIME, "rt2", vec![])
        .with_manifest(TOOLS, "t1", vec![dep("Runtime", "2.0", RUNTIME, "rt2")]);

    let use_case = BuildDependencyGraphUseCase::new(
        Some(manifests),
        None::<MockBuildRegistry>,
        MockProgressReporter::new(),
    );
    let graph = use_case
        .execute(GraphRequest::new(APP, "app1"))
        .await
        .unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.incoherent_nodes().count(), 2);
    let versions: Vec<&str> = graph
        .incoherent_dependencies()
        .iter()
        .map(|d| d.version.as_str())
        .collect();
    assert!(versions.contains(&"1.0"));
    assert!(versions.contains(&"2.0"));

    let report = ReportBuilder::graph(&graph);
    let Report::Graph(graph_report) = report else {
        panic!("expected a graph report");
    };
    assert_eq!(graph_report.incoherent_nodes().count(), 2);
}

#[tokio::test]
async fn test_dependency_graph_attaches_contributing_builds() {
    let manifests = MockManifestSource::new()
        .with_manifest(APP, "app1", vec![dep("Runtime", "1.0", RUNTIME, "rt1")])
        .with_manifest(RUNTIME, "rt1", vec![]);
    let registry = MockBuildRegistry::new()
        .with_build(1, RUNTIME, "rt1", &[("Runtime", "1.0", "https://feed/rt")])
        .with_build(2, RUNTIME, "rt1", &[("Runtime.Other", "1.0", "https://feed/rt")]);
    let mut request = GraphRequest::new(APP, "app1");
    request.lookup_builds = true;

    let use_case =
        BuildDependencyGraphUseCase::new(Some(manifests), Some(registry), MockProgressReporter::new());
    let graph = use_case.execute(request).await.unwrap();

    let runtime = graph.find(RUNTIME, "rt1").unwrap();
    let ids: Vec<u64> = graph
        .node(runtime)
        .contributing_builds
        .iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn test_dependency_graph_without_manifest_source() {
    let progress_reporter = MockProgressReporter::new();
    let use_case = BuildDependencyGraphUseCase::new(
        None::<MockManifestSource>,
        None::<MockBuildRegistry>,
        progress_reporter.clone(),
    );

    let err = use_case
        .execute(GraphRequest::new(APP, "app1"))
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<FlowError>(),
        Some(FlowError::MissingManifestSource)
    ));
    assert!(progress_reporter.contains("Error: ❌ Dependency graph build failed"));
}

#[tokio::test]
async fn test_dependency_graph_manifest_failure_propagates() {
    let use_case = BuildDependencyGraphUseCase::new(
        Some(MockManifestSource::with_failure()),
        None::<MockBuildRegistry>,
        MockProgressReporter::new(),
    );

    let result = use_case.execute(GraphRequest::new(APP, "app1")).await;

    assert!(result.is_err());
}

fn coherent_app_manifest() -> Vec<DependencyDetail> {
    vec![
        dep("Runtime", "1.0", RUNTIME, "rt1"),
        dep("Extensions", "1.0", EXTENSIONS, "ex1").with_coherent_parent("Runtime"),
    ]
}

#[tokio::test]
async fn test_coherency_already_consistent() {
    let manifests = MockManifestSource::new()
        .with_manifest(APP, "app1", coherent_app_manifest())
        .with_manifest(RUNTIME, "rt1", vec![dep("Extensions", "1.0", EXTENSIONS, "ex1")]);
    let progress_reporter = MockProgressReporter::new();

    let use_case =
        ResolveCoherencyUseCase::new(manifests, MockBuildRegistry::new(), progress_reporter.clone());
    let plan = use_case
        .execute(CoherencyRequest::new(APP, "app1"))
        .await
        .unwrap();

    assert!(plan.is_empty());
    assert!(progress_reporter.contains("0 updates planned"));
}

#[tokio::test]
async fn test_coherency_follows_parent_and_picks_feed_asset() {
    let manifests = MockManifestSource::new()
        .with_manifest(APP, "app1", coherent_app_manifest())
        .with_manifest(RUNTIME, "rt2", vec![dep("Extensions", "2.0", EXTENSIONS, "ex2")]);
    let registry = MockBuildRegistry::new()
        .with_build(10, RUNTIME, "rt2", &[("Runtime", "1.5", "https://feed/runtime")])
        .with_build(11, EXTENSIONS, "ex2", &[("Extensions", "2.0", "https://feed/public")])
        .with_build(12, EXTENSIONS, "ex2", &[("Extensions", "2.0", "https://feed/internal")])
        .with_package_sources(RUNTIME, "rt2", &["https://feed/public"]);
    let mut request = CoherencyRequest::new(APP, "app1");
    request.build_id = Some(10);

    let use_case = ResolveCoherencyUseCase::new(manifests, registry, MockProgressReporter::new());
    let plan = use_case.execute(request).await.unwrap();

    assert_eq!(plan.non_coherency_updates.len(), 1);
    assert_eq!(plan.non_coherency_updates[0].to.commit, "rt2");
    assert_eq!(plan.coherency_updates.len(), 1);
    let extensions = &plan.coherency_updates[0].to;
    assert_eq!(extensions.version, "2.0");
    // Build 12 is newer, but only build 11 publishes to the parent's feed.
    assert_eq!(extensions.locations, vec!["https://feed/public".to_string()]);
}

#[tokio::test]
async fn test_coherency_failure_lists_solutions() {
    let manifests = MockManifestSource::new()
        .with_manifest(APP, "app1", coherent_app_manifest())
        .with_manifest(RUNTIME, "rt1", vec![]);

    let use_case =
        ResolveCoherencyUseCase::new(manifests, MockBuildRegistry::new(), MockProgressReporter::new());
    let err = use_case
        .execute(CoherencyRequest::new(APP, "app1"))
        .await
        .unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::CoherencyFailed);
    let Some(FlowError::CoherencyUpdateFailed { errors }) = err.downcast_ref::<FlowError>() else {
        panic!("expected a coherency failure, got {err}");
    };
    assert_eq!(errors.len(), 1);
    assert!(!errors[0].potential_solutions.is_empty());
}

fn flow_config() -> MockFlowConfigSource {
    MockFlowConfigSource::new()
        .with_channel(1, RUNTIME, ".NET 9", 60.0)
        .with_channel(2, EXTENSIONS, ".NET 9", 30.0)
        .with_channel(3, APP, ".NET 9", 20.0)
        .with_channel(4, TOOLS, "Tools", 15.0)
        .with_subscription(RUNTIME, EXTENSIONS, ".NET 9", UpdateFrequency::EveryBuild, true)
        .with_subscription(RUNTIME, APP, ".NET 9", UpdateFrequency::EveryBuild, true)
        .with_subscription(EXTENSIONS, APP, ".NET 9", UpdateFrequency::EveryDay, true)
        .with_subscription(TOOLS, APP, "Tools", UpdateFrequency::None, false)
}

#[tokio::test]
async fn test_flow_graph_unfiltered() {
    let use_case = BuildFlowGraphUseCase::new(
        flow_config(),
        None::<MockManifestSource>,
        None::<MockBuildRegistry>,
        MockProgressReporter::new(),
    );

    let graph = use_case.execute(FlowRequest::default()).await.unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
}

#[tokio::test]
async fn test_flow_graph_longest_build_path() {
    let progress_reporter = MockProgressReporter::new();
    let use_case = BuildFlowGraphUseCase::new(
        flow_config(),
        None::<MockManifestSource>,
        None::<MockBuildRegistry>,
        progress_reporter.clone(),
    );
    let request = FlowRequest {
        channel: Some(".NET 9".to_string()),
        include_build_times: true,
        ..FlowRequest::default()
    };

    let graph = use_case.execute(request).await.unwrap();

    let runtime = graph.find_node(RUNTIME, "main").unwrap();
    assert_eq!(graph.node(runtime).unwrap().best_case_time, 110.0);

    let report = ReportBuilder::flow(&graph, Some(".NET 9"), true);
    let Report::Flow(flow_report) = report else {
        panic!("expected a flow report");
    };
    let path: Vec<&str> = flow_report
        .longest_path()
        .map(|n| n.repository.as_str())
        .collect();
    assert_eq!(path, vec![RUNTIME, EXTENSIONS, APP]);
    assert!(progress_reporter.contains("Progress: 3/3"));
}

#[tokio::test]
async fn test_flow_graph_unknown_channel_reports_error() {
    let progress_reporter = MockProgressReporter::new();
    let use_case = BuildFlowGraphUseCase::new(
        flow_config(),
        None::<MockManifestSource>,
        None::<MockBuildRegistry>,
        progress_reporter.clone(),
    );
    let request = FlowRequest {
        channel: Some("nowhere".to_string()),
        ..FlowRequest::default()
    };

    let graph = use_case.execute(request).await.unwrap();

    assert_eq!(graph.node_count(), 0);
    assert!(progress_reporter.contains("No repository publishes to channel 'nowhere'"));
}

#[tokio::test]
async fn test_formatters_render_every_report_kind() {
    let use_case = BuildFlowGraphUseCase::new(
        flow_config(),
        None::<MockManifestSource>,
        None::<MockBuildRegistry>,
        MockProgressReporter::new(),
    );
    let graph = use_case.execute(FlowRequest::default()).await.unwrap();
    let report = ReportBuilder::flow(&graph, None, false);

    let text = TextFormatter::new().format(&report).unwrap();
    let json = JsonFormatter::new().format(&report).unwrap();
    let dot = GraphvizFormatter::new().format(&report).unwrap();

    assert!(text.contains("Dependency flow across all channels"));
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["kind"], "flow");
    assert!(dot.starts_with("digraph flow"));
}
