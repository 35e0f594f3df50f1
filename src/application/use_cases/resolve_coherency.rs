use crate::application::dto::CoherencyRequest;
use crate::dependency_flow::domain::{DependencyDetail, DependencyUpdate, UpdatePlan};
use crate::dependency_flow::services::CoherencyResolver;
use crate::ports::outbound::{BuildRegistry, ManifestSource, ProgressReporter};
use crate::shared::error::FlowError;
use crate::shared::Result;
use anyhow::Context;

/// ResolveCoherencyUseCase - plans the manifest edits for one repository
///
/// Optionally flows the assets of a new build in first, then makes every
/// coherent-parent chain agree with its parents.
///
/// # Type Parameters
/// * `M` - ManifestSource implementation
/// * `B` - BuildRegistry implementation
/// * `PR` - ProgressReporter implementation
pub struct ResolveCoherencyUseCase<M, B, PR> {
    manifests: M,
    registry: B,
    progress_reporter: PR,
}

impl<M, B, PR> ResolveCoherencyUseCase<M, B, PR>
where
    M: ManifestSource,
    B: BuildRegistry,
    PR: ProgressReporter,
{
    pub fn new(manifests: M, registry: B, progress_reporter: PR) -> Self {
        Self {
            manifests,
            registry,
            progress_reporter,
        }
    }

    /// Computes the update plan
    ///
    /// # Errors
    /// [`FlowError::CoherencyUpdateFailed`] lists every broken chain link;
    /// fetch failures and unknown build ids abort the plan.
    pub async fn execute(&self, request: CoherencyRequest) -> Result<UpdatePlan> {
        self.progress_reporter.report(&format!(
            "📖 Reading dependencies of {} @ {}",
            request.repository, request.commit
        ));
        let dependencies = self
            .manifests
            .get_dependencies(&request.repository, &request.commit)
            .await
            .with_context(|| {
                format!(
                    "Failed to get dependencies at {}@{}",
                    request.repository, request.commit
                )
            })?;

        let non_coherency_updates = match request.build_id {
            Some(build_id) => self.build_updates(build_id, &dependencies).await?,
            None => Vec::new(),
        };
        let dependencies = Self::apply_updates(dependencies, &non_coherency_updates);

        self.progress_reporter.report(&format!(
            "🔗 Resolving coherency across {} dependencies",
            dependencies.len()
        ));
        let resolver = CoherencyResolver::new(&self.manifests, &self.registry);
        let coherency_updates = resolver.resolve(&dependencies).await.inspect_err(|e| {
            self.progress_reporter
                .report_error(&format!("❌ Coherency resolution failed: {}", e))
        })?;

        let plan = UpdatePlan {
            non_coherency_updates,
            coherency_updates,
        };
        self.progress_reporter.report_completion(&format!(
            "✅ {} updates planned ({} from build, {} for coherency)",
            plan.len(),
            plan.non_coherency_updates.len(),
            plan.coherency_updates.len()
        ));
        Ok(plan)
    }

    async fn build_updates(
        &self,
        build_id: u64,
        dependencies: &[DependencyDetail],
    ) -> Result<Vec<DependencyUpdate>> {
        let build = self
            .registry
            .get_build(build_id)
            .await
            .with_context(|| format!("Failed to look up build {}", build_id))?
            .ok_or_else(|| FlowError::Validation {
                message: format!("Build {} was not found in the build registry", build_id),
            })?;

        self.progress_reporter.report(&format!(
            "📦 Taking {} assets of build {} ({} @ {})",
            build.assets.len(),
            build.id,
            build.repository,
            build.commit
        ));
        Ok(CoherencyResolver::required_non_coherency_updates(
            &build.repository,
            &build.commit,
            &build.assets,
            dependencies,
        ))
    }

    /// Replaces each updated dependency with its new value.
    fn apply_updates(
        mut dependencies: Vec<DependencyDetail>,
        updates: &[DependencyUpdate],
    ) -> Vec<DependencyDetail> {
        for update in updates {
            if let Some(current) = dependencies.iter_mut().find(|d| **d == update.from) {
                *current = update.to.clone();
            }
        }
        dependencies
    }
}
