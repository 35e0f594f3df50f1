use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use depflow::application::dto::OutputFormat;
use depflow::dependency_flow::domain::UpdateFrequency;
use std::path::PathBuf;

/// Analyze dependency flow across repositories
#[derive(Parser, Debug)]
#[command(name = "depflow")]
#[command(version)]
#[command(
    about = "Build cross-repository dependency graphs, plan coherent updates and analyze channel flow",
    long_about = None
)]
pub struct Args {
    /// Snapshot file with manifests, builds, channels and subscriptions
    #[arg(long, global = true, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Directory of manifests laid out as <folder>/<commit>/dependencies.json
    #[arg(long, global = true, value_name = "DIR")]
    pub manifests_dir: Option<PathBuf>,

    /// Map a repository URI to a manifests folder; can be repeated
    #[arg(long = "remote", global = true, value_name = "URI=FOLDER", value_parser = parse_remote)]
    pub remotes: Vec<(String, String)>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Config file (defaults to depflow.config.yml in the current directory)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the transitive dependency graph of a repository at a commit
    Graph(GraphArgs),
    /// Plan the dependency updates that keep coherent-parent chains consistent
    Coherency(CoherencyArgs),
    /// Build the channel/subscription flow graph
    Flow(FlowArgs),
}

#[derive(ClapArgs, Debug)]
pub struct GraphArgs {
    /// Root repository URI
    #[arg(long)]
    pub repo: String,

    /// Root commit
    #[arg(long)]
    pub commit: String,

    /// Follow toolset dependencies as well as product ones
    #[arg(long)]
    pub include_toolset: bool,

    /// Do not attach contributing builds to nodes
    #[arg(long)]
    pub skip_build_lookup: bool,

    /// List the repository paths that close each dependency cycle
    #[arg(long)]
    pub compute_cycle_paths: bool,

    /// Start from the dependencies in this JSON file instead of the root manifest
    #[arg(long, value_name = "FILE")]
    pub root_dependencies: Option<PathBuf>,

    /// Output format: text, json or dot
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

#[derive(ClapArgs, Debug)]
pub struct CoherencyArgs {
    /// Repository URI whose manifest is updated
    #[arg(long)]
    pub repo: String,

    /// Commit of the manifest
    #[arg(long)]
    pub commit: String,

    /// Take the assets of this build before resolving coherency
    #[arg(long, value_name = "ID")]
    pub build: Option<u64>,

    /// Output format: text or json
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

#[derive(ClapArgs, Debug)]
pub struct FlowArgs {
    /// Keep only repositories feeding this channel
    #[arg(long)]
    pub channel: Option<String>,

    /// Keep edges of disabled subscriptions
    #[arg(long)]
    pub include_disabled_subscriptions: bool,

    /// Update frequencies to keep; can be repeated (default: all)
    #[arg(long = "frequency", value_name = "FREQUENCY")]
    pub frequencies: Vec<UpdateFrequency>,

    /// Fetch build times and compute the longest build path
    #[arg(long)]
    pub include_build_times: bool,

    /// Days of build history to average
    #[arg(long, value_name = "N")]
    pub days: Option<u32>,

    /// Output format: text, json or dot
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

fn parse_remote(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((uri, folder)) if !uri.trim().is_empty() && !folder.trim().is_empty() => {
            Ok((uri.trim().to_string(), folder.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid remote mapping: {}. Expected <uri>=<folder>",
            value
        )),
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
