//! Implementation of the `entigen generate` command.
//!
//! Wires the adapters to the core generation service, runs one pass, and
//! renders the per-phase report. Without `--strict`, phase failures are
//! reported but the command still exits 0 so partial output stays usable.

use std::path::Path;
use std::sync::Arc;

use tracing::instrument;

use entigen_adapters::{
    LocalFilesystem, MavenCentralResolver, RemoteFeatureSource, StaticFeatureSource,
    StaticResolver, XmlDescriptorStore,
};
use entigen_core::application::ports::{DependencyResolver, FeatureSource};
use entigen_core::application::{GenerateOptions, GenerationService, RunReport};
use entigen_core::domain::{ApiModel, ProjectModel, ViewModel};

use crate::{
    cli::GenerateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(model = %args.model.display()))]
pub fn execute(args: GenerateArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let model = ProjectModel::from_json(&read_document(&args.model)?)?;
    let api = args
        .api
        .as_deref()
        .map(|path| Ok::<_, CliError>(ApiModel::from_json(&read_document(path)?)?))
        .transpose()?;
    let view = args
        .view
        .as_deref()
        .map(|path| Ok::<_, CliError>(ViewModel::from_json(&read_document(path)?)?))
        .transpose()?;

    let offline = args.offline || config.generation.offline;
    let service = build_service(offline, config.generation.features_url.as_deref());

    output.header(&format!(
        "Generating '{}' into {}",
        model.name,
        args.project_dir.display()
    ))?;

    let options = GenerateOptions {
        payara_micro: args.payara_micro,
    };
    let report = service.run(
        &model,
        api.as_ref(),
        view.as_ref(),
        &args.project_dir,
        &options,
    )?;

    render_report(&report, &output)?;

    if args.strict && !report.is_clean() {
        return Err(CliError::GenerationIncomplete {
            failed: report
                .failed_phases()
                .map(|p| p.phase.to_string())
                .collect(),
        });
    }
    Ok(())
}

fn read_document(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::ModelUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Assemble the service with real adapters. Offline swaps the network
/// resolvers for their static counterparts.
fn build_service(offline: bool, features_url: Option<&str>) -> GenerationService {
    let filesystem = Arc::new(LocalFilesystem::new());
    let descriptors = XmlDescriptorStore::new(filesystem.clone());

    let resolver: Box<dyn DependencyResolver> = if offline {
        Box::new(StaticResolver::new())
    } else {
        Box::new(MavenCentralResolver::new())
    };
    let features: Box<dyn FeatureSource> = match (offline, features_url) {
        (false, Some(url)) => Box::new(RemoteFeatureSource::new(url)),
        _ => Box::new(StaticFeatureSource::default()),
    };

    GenerationService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(descriptors),
        resolver,
        features,
    )
}

fn render_report(report: &RunReport, output: &OutputManager) -> CliResult<()> {
    for phase in &report.phases {
        match &phase.error {
            None => output.success(&format!("{}: {}", phase.phase, phase.detail))?,
            Some(e) => output.error(&format!("{}: {}", phase.phase, e))?,
        }
    }
    if report.is_clean() {
        output.print("")?;
        output.success("Generation complete")?;
    } else {
        output.warning(&format!(
            "{} phase(s) failed; other artifacts were still written",
            report.failed_phases().count()
        ))?;
    }
    Ok(())
}
