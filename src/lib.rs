//! depflow - cross-repository dependency flow analysis
//!
//! This library builds transitive dependency graphs across repositories,
//! plans coherent dependency updates, and analyzes how builds flow between
//! repositories through channels and subscriptions.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`dependency_flow`): Graph models and the analyses over them
//! - **Application Layer** (`application`): Use cases, request DTOs and read models
//! - **Ports** (`ports`): Interfaces to manifests, builds and channel configuration
//! - **Adapters** (`adapters`): Snapshot files, manifest directories, console and formatters
//! - **Shared** (`shared`): Errors, logging and bounded file reads
//!
//! # Example
//!
//! ```no_run
//! use depflow::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let store = Arc::new(SnapshotStore::load(Path::new("snapshot.json"))?);
//! let use_case = BuildDependencyGraphUseCase::new(
//!     Some(store.clone()),
//!     Some(store),
//!     StderrProgressReporter::new(),
//! );
//!
//! let graph = use_case
//!     .execute(GraphRequest::new("https://github.com/org/sdk", "abc123"))
//!     .await?;
//!
//! let report = ReportBuilder::graph(&graph);
//! println!("{}", TextFormatter::new().format(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod dependency_flow;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        DirectoryManifestSource, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        GraphvizFormatter, JsonFormatter, TextFormatter,
    };
    pub use crate::adapters::outbound::snapshot::{Snapshot, SnapshotStore};
    pub use crate::application::dto::{CoherencyRequest, FlowRequest, GraphRequest, OutputFormat};
    pub use crate::application::read_models::{Report, ReportBuilder};
    pub use crate::application::use_cases::{
        BuildDependencyGraphUseCase, BuildFlowGraphUseCase, ResolveCoherencyUseCase,
    };
    pub use crate::dependency_flow::domain::{
        Asset, AssetLocation, Build, BuildTime, CoherencyError, DefaultChannel, DependencyDetail,
        DependencyFlowGraph, DependencyGraph, DependencyType, DependencyUpdate, Subscription,
        LocationType, SubscriptionPolicy, UpdateFrequency, UpdatePlan,
    };
    pub use crate::ports::outbound::{
        BuildRegistry, FlowConfigSource, ManifestSource, OutputPresenter, ProgressReporter,
        ReportFormatter,
    };
    pub use crate::shared::error::{ExitCode, FlowError};
    pub use crate::shared::Result;
}
