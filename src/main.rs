mod cli;
mod config;

use cli::{Args, CoherencyArgs, Command, FlowArgs, GraphArgs};
use config::{discover_config, load_config_from_path, ConfigFile};
use depflow::adapters::outbound::console::StderrProgressReporter;
use depflow::adapters::outbound::filesystem::DirectoryManifestSource;
use depflow::adapters::outbound::snapshot::SnapshotStore;
use depflow::application::dto::{CoherencyRequest, FlowRequest, GraphRequest};
use depflow::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use depflow::application::read_models::{Report, ReportBuilder};
use depflow::application::use_cases::{
    BuildDependencyGraphUseCase, BuildFlowGraphUseCase, ResolveCoherencyUseCase,
};
use depflow::ports::outbound::{
    BuildRegistry, FlowConfigSource, ManifestSource, OutputPresenter, ProgressReporter,
    ReportFormatter,
};
use depflow::shared::error::{ExitCode, FlowError};
use depflow::shared::{logging, Result};
use owo_colors::OwoColorize;
use std::collections::HashMap;
use std::path::Path;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    if let Err(e) = logging::init(args.verbose) {
        eprintln!("⚠️  Warning: logging is disabled: {}", e);
    }

    let exit_code = match run(args).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            print_error(&e);
            ExitCode::for_error(&e)
        }
    };

    process::exit(exit_code.as_i32());
}

fn print_error(error: &anyhow::Error) {
    eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
    eprintln!("{}", error);

    if let Some(FlowError::CoherencyUpdateFailed { errors }) = error.downcast_ref::<FlowError>() {
        for failure in errors {
            eprintln!("\n  {} {}", "•".red(), failure.error);
            for solution in &failure.potential_solutions {
                eprintln!("      - {}", solution.yellow());
            }
        }
    }

    for cause in error.chain().skip(1) {
        eprintln!("\n{} {}", "Caused by:".dimmed(), cause);
    }
    eprintln!();
}

async fn run(args: Args) -> Result<()> {
    let config = match args.config.as_deref() {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(Path::new("."))?.unwrap_or_default(),
    };
    let sources = Sources::open(&args, &config)?;
    let reporter = StderrProgressReporter::new();

    let (report, format) = match args.command {
        Command::Graph(graph_args) => {
            let format = graph_args.format.or(config.output_format()).unwrap_or_default();
            (run_graph(graph_args, &config, &sources, &reporter).await?, format)
        }
        Command::Coherency(coherency_args) => {
            let format = coherency_args
                .format
                .or(config.output_format())
                .unwrap_or_default();
            (run_coherency(coherency_args, &sources, &reporter).await?, format)
        }
        Command::Flow(flow_args) => {
            let format = flow_args.format.or(config.output_format()).unwrap_or_default();
            (run_flow(flow_args, &config, &sources, &reporter).await?, format)
        }
    };

    reporter.report(FormatterFactory::progress_message(format));
    let rendered = FormatterFactory::create(format).format(&report)?;
    PresenterFactory::create(PresenterType::for_output(args.output.as_deref())).present(&rendered)
}

/// Collaborators opened from the CLI flags and config file.
struct Sources {
    snapshot: Option<Arc<SnapshotStore>>,
    manifests: Option<Arc<dyn ManifestSource>>,
}

impl Sources {
    /// A manifests directory wins over the snapshot for manifest reads; builds
    /// and channel configuration only come from the snapshot.
    fn open(args: &Args, config: &ConfigFile) -> Result<Self> {
        let snapshot = match args.snapshot.as_ref().or(config.snapshot.as_ref()) {
            Some(path) => Some(Arc::new(SnapshotStore::load(path)?)),
            None => None,
        };

        let manifests: Option<Arc<dyn ManifestSource>> =
            match (args.manifests_dir.as_ref().or(config.manifests_dir.as_ref()), &snapshot) {
                (Some(dir), _) => Some(Arc::new(DirectoryManifestSource::new(
                    dir.clone(),
                    merge_remotes(config.remotes.clone(), &args.remotes),
                )) as Arc<dyn ManifestSource>),
                (None, Some(store)) => Some(store.clone() as Arc<dyn ManifestSource>),
                (None, None) => None,
            };

        Ok(Self {
            snapshot,
            manifests,
        })
    }

    fn registry(&self) -> Option<Arc<dyn BuildRegistry>> {
        self.snapshot
            .clone()
            .map(|store| store as Arc<dyn BuildRegistry>)
    }

    fn require_registry(&self, command: &str) -> Result<Arc<dyn BuildRegistry>> {
        self.registry()
            .ok_or_else(|| snapshot_required(command, "a build registry"))
    }

    fn require_flow_config(&self) -> Result<Arc<dyn FlowConfigSource>> {
        self.snapshot
            .clone()
            .map(|store| store as Arc<dyn FlowConfigSource>)
            .ok_or_else(|| snapshot_required("flow", "channel and subscription data"))
    }
}

fn snapshot_required(command: &str, what: &str) -> anyhow::Error {
    FlowError::Validation {
        message: format!(
            "The {} command needs {}\n\n💡 Hint: Pass --snapshot <file> or set `snapshot` in the config file",
            command, what
        ),
    }
    .into()
}

/// Config-file remotes overridden by `--remote` flags.
fn merge_remotes(
    from_config: Option<HashMap<String, String>>,
    from_cli: &[(String, String)],
) -> HashMap<String, String> {
    let mut remotes = from_config.unwrap_or_default();
    remotes.extend(from_cli.iter().cloned());
    remotes
}

async fn run_graph(
    args: GraphArgs,
    config: &ConfigFile,
    sources: &Sources,
    reporter: &StderrProgressReporter,
) -> Result<Report> {
    let registry = sources.registry();
    let mut request = GraphRequest::new(args.repo, args.commit);
    request.include_toolset = args.include_toolset || config.include_toolset.unwrap_or(false);
    request.lookup_builds =
        !args.skip_build_lookup && config.lookup_builds.unwrap_or(registry.is_some());
    request.compute_cycle_paths = args.compute_cycle_paths;
    if let Some(path) = &args.root_dependencies {
        request.root_dependencies = Some(DirectoryManifestSource::read_manifest(path)?);
    }

    let use_case = BuildDependencyGraphUseCase::new(sources.manifests.clone(), registry, reporter);
    let graph = use_case.execute(request).await?;
    Ok(ReportBuilder::graph(&graph))
}

async fn run_coherency(
    args: CoherencyArgs,
    sources: &Sources,
    reporter: &StderrProgressReporter,
) -> Result<Report> {
    let manifests = sources
        .manifests
        .clone()
        .ok_or(FlowError::MissingManifestSource)?;
    let registry = sources.require_registry("coherency")?;

    let mut request = CoherencyRequest::new(args.repo.clone(), args.commit.clone());
    request.build_id = args.build;

    let use_case = ResolveCoherencyUseCase::new(manifests, registry, reporter);
    let plan = use_case.execute(request).await?;
    Ok(ReportBuilder::updates(&args.repo, &args.commit, args.build, plan))
}

async fn run_flow(
    args: FlowArgs,
    config: &ConfigFile,
    sources: &Sources,
    reporter: &StderrProgressReporter,
) -> Result<Report> {
    let flow_config = sources.require_flow_config()?;
    let request = merge_flow_request(args, config);
    let channel = request.channel.clone();
    let include_build_times = request.include_build_times;

    let use_case = BuildFlowGraphUseCase::new(
        flow_config,
        sources.manifests.clone(),
        sources.registry(),
        reporter,
    );
    let graph = use_case.execute(request).await?;
    Ok(ReportBuilder::flow(&graph, channel.as_deref(), include_build_times))
}

/// CLI flags win; the config file's `flow` section fills the gaps.
fn merge_flow_request(args: FlowArgs, config: &ConfigFile) -> FlowRequest {
    let defaults = FlowRequest::default();
    let file = config.flow.as_ref();

    FlowRequest {
        channel: args.channel.or_else(|| file.and_then(|f| f.channel.clone())),
        include_disabled_subscriptions: args.include_disabled_subscriptions
            || file
                .and_then(|f| f.include_disabled_subscriptions)
                .unwrap_or(false),
        included_frequencies: if args.frequencies.is_empty() {
            file.and_then(|f| f.frequencies())
                .unwrap_or(defaults.included_frequencies)
        } else {
            args.frequencies
        },
        include_build_times: args.include_build_times
            || file.and_then(|f| f.include_build_times).unwrap_or(false),
        days: args
            .days
            .or_else(|| file.and_then(|f| f.days))
            .unwrap_or(defaults.days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowConfig;
    use depflow::dependency_flow::domain::UpdateFrequency;

    fn flow_args() -> FlowArgs {
        FlowArgs {
            channel: None,
            include_disabled_subscriptions: false,
            frequencies: vec![],
            include_build_times: false,
            days: None,
            format: None,
        }
    }

    #[test]
    fn test_merge_flow_request_defaults() {
        let request = merge_flow_request(flow_args(), &ConfigFile::default());
        assert_eq!(request.channel, None);
        assert_eq!(request.included_frequencies, UpdateFrequency::ALL.to_vec());
        assert_eq!(request.days, 7);
    }

    #[test]
    fn test_merge_flow_request_cli_overrides_file() {
        let config = ConfigFile {
            flow: Some(FlowConfig {
                channel: Some("from-file".to_string()),
                included_frequencies: Some(vec!["none".to_string()]),
                days: Some(30),
                include_build_times: Some(true),
                ..FlowConfig::default()
            }),
            ..ConfigFile::default()
        };
        let mut args = flow_args();
        args.channel = Some("from-cli".to_string());
        args.days = Some(3);

        let request = merge_flow_request(args, &config);

        assert_eq!(request.channel.as_deref(), Some("from-cli"));
        assert_eq!(request.days, 3);
        assert_eq!(request.included_frequencies, vec![UpdateFrequency::None]);
        assert!(request.include_build_times);
    }

    #[test]
    fn test_merge_remotes_cli_wins() {
        let file = HashMap::from([("https://r/a".to_string(), "from-file".to_string())]);
        let cli = [("https://r/a".to_string(), "from-cli".to_string())];

        let remotes = merge_remotes(Some(file), &cli);

        assert_eq!(remotes["https://r/a"], "from-cli");
    }

    #[test]
    fn test_snapshot_required_message_has_hint() {
        let err = snapshot_required("flow", "channel and subscription data");
        let message = err.to_string();
        assert!(message.contains("The flow command needs channel and subscription data"));
        assert!(message.contains("💡 Hint: Pass --snapshot"));
        assert_eq!(ExitCode::for_error(&err), ExitCode::ApplicationError);
    }

    #[test]
    fn test_coherency_failure_exit_code() {
        let err: anyhow::Error = FlowError::CoherencyUpdateFailed { errors: vec![] }.into();
        assert_eq!(ExitCode::for_error(&err), ExitCode::CoherencyFailed);
    }
}
