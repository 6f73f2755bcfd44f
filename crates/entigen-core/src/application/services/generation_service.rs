//! Generation Service - main application orchestrator.
//!
//! Coordinates one generation run:
//! 1. Validate the loaded model
//! 2. Load the shared build descriptor (once)
//! 3. Run each artifact emitter in fixed order
//! 4. Persist the build descriptor (once)
//!
//! Each phase isolates its own failure: the error is logged, recorded in
//! the [`RunReport`], and later phases still run. A run that fails partway
//! leaves already-written artifacts in place; there is no rollback.

use std::path::Path;

use tracing::{error, info, instrument};

use crate::{
    application::{
        GenerationContext,
        emitters::{datasource, entity, persistence, pom, repository, resource, service, view},
        ports::{DependencyResolver, DescriptorStore, FeatureSource, Filesystem},
    },
    domain::{ApiModel, ProjectModel, ViewModel},
    error::{EntigenError, EntigenResult},
};

/// Style-specific options for one generation run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Emit the Payara Micro post-boot script instead of the static
    /// resources descriptor.
    pub payara_micro: bool,
}

/// Outcome of one phase of a run.
#[derive(Debug, Clone)]
pub struct PhaseOutcome {
    pub phase: &'static str,
    /// Human-readable summary on success, e.g. "3 classes".
    pub detail: String,
    pub error: Option<EntigenError>,
}

impl PhaseOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-phase outcomes of one generation run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub phases: Vec<PhaseOutcome>,
}

impl RunReport {
    fn record<T: std::fmt::Display>(
        &mut self,
        phase: &'static str,
        result: EntigenResult<T>,
    ) {
        match result {
            Ok(detail) => {
                info!(phase, %detail, "phase completed");
                self.phases.push(PhaseOutcome {
                    phase,
                    detail: detail.to_string(),
                    error: None,
                });
            }
            Err(e) => {
                // Phase-level partial failure: log with the underlying
                // cause, keep running independent phases.
                error!(phase, error = %e, "phase failed, continuing with remaining phases");
                self.phases.push(PhaseOutcome {
                    phase,
                    detail: String::new(),
                    error: Some(e),
                });
            }
        }
    }

    pub fn failed_phases(&self) -> impl Iterator<Item = &PhaseOutcome> {
        self.phases.iter().filter(|p| !p.succeeded())
    }

    pub fn is_clean(&self) -> bool {
        self.phases.iter().all(PhaseOutcome::succeeded)
    }
}

/// Main generation service.
///
/// Owns the driven ports; one instance serves any number of sequential
/// runs, but all run-scoped state (the resolution cache) lives in a fresh
/// [`GenerationContext`] per run.
pub struct GenerationService {
    filesystem: Box<dyn Filesystem>,
    descriptors: Box<dyn DescriptorStore>,
    resolver: Box<dyn DependencyResolver>,
    features: Box<dyn FeatureSource>,
}

impl GenerationService {
    /// Create a new generation service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        descriptors: Box<dyn DescriptorStore>,
        resolver: Box<dyn DependencyResolver>,
        features: Box<dyn FeatureSource>,
    ) -> Self {
        Self {
            filesystem,
            descriptors,
            resolver,
            features,
        }
    }

    /// Run one generation pass.
    ///
    /// Fatal errors (an invalid model, an unloadable build descriptor)
    /// return `Err`; per-phase failures are recorded in the report.
    #[instrument(skip_all, fields(project = %model.name, base = %base.display()))]
    pub fn run(
        &self,
        model: &ProjectModel,
        api: Option<&ApiModel>,
        view: Option<&ViewModel>,
        base: &Path,
        options: &GenerateOptions,
    ) -> EntigenResult<RunReport> {
        info!(
            entities = model.entities.len(),
            style = %model.datasource.style,
            "starting generation run"
        );
        model.validate()?;

        let ctx = GenerationContext::new(&*self.resolver);
        let mut report = RunReport::default();

        // The build descriptor is loaded once, mutated by successive
        // phases in run order, and persisted exactly once at the end.
        let (pom_path, mut build) = pom::load_or_default(&*self.descriptors, base, model)?;

        report.record(
            "entities",
            entity::emit(&*self.filesystem, model, base).map(count),
        );
        report.record(
            "repositories",
            repository::emit(&*self.filesystem, model, base).map(count),
        );
        report.record(
            "services",
            service::emit(&*self.filesystem, model, base).map(count),
        );
        report.record(
            "persistence-unit",
            persistence::emit(&*self.descriptors, model, base)
                .map(|p| p.display().to_string()),
        );

        if let Some(api) = api {
            report.record(
                "rest-resources",
                resource::emit(&*self.filesystem, api, &model.package, base).map(|o| {
                    format!(
                        "{} classes, {} methods added, {} skipped",
                        o.classes, o.methods_added, o.methods_skipped
                    )
                }),
            );
        }

        if let Some(view) = view {
            report.record(
                "views",
                view::emit(&*self.filesystem, view, &model.package, base).map(count),
            );
        }

        report.record(
            "datasource",
            datasource::emit(
                &*self.filesystem,
                &*self.descriptors,
                &ctx,
                &*self.features,
                model,
                base,
                &mut build,
                options.payara_micro,
            )
            .map(|_| "provisioned".to_string()),
        );

        report.record(
            "build-descriptor",
            self.descriptors
                .save(&pom_path, &build)
                .map(|_| pom_path.display().to_string()),
        );

        info!(
            phases = report.phases.len(),
            failed = report.failed_phases().count(),
            "generation run finished"
        );
        Ok(report)
    }
}

/// Small display helper: `3 classes`.
fn count(n: usize) -> String {
    format!("{n} classes")
}

// ── tests ─────────────────────────────────────────────────────────────────────
