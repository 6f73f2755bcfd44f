//! Implementation of the `entigen validate` command.
//!
//! Parses and validates the model documents without touching the target
//! project, so CI can gate on model health.

use std::path::Path;

use tracing::instrument;

use entigen_core::domain::{ApiModel, ProjectModel, ViewModel};

use crate::{
    cli::ValidateArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(model = %args.model.display()))]
pub fn execute(args: ValidateArgs, output: OutputManager) -> CliResult<()> {
    let model = ProjectModel::from_json(&read_document(&args.model)?)?;
    model.validate()?;
    output.success(&format!(
        "{}: {} entities, datasource '{}'",
        args.model.display(),
        model.entities.len(),
        model.datasource.database
    ))?;

    if let Some(path) = &args.api {
        let api = ApiModel::from_json(&read_document(path)?)?;
        output.success(&format!(
            "{}: {} paths, {} schemas",
            path.display(),
            api.paths.len(),
            api.schemas.len()
        ))?;
    }

    if let Some(path) = &args.view {
        let view = ViewModel::from_json(&read_document(path)?)?;
        output.success(&format!(
            "{}: {} forms, {} views",
            path.display(),
            view.forms.len(),
            view.views.len()
        ))?;
    }

    output.print("")?;
    output.success("All documents are valid")?;
    Ok(())
}

fn read_document(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::ModelUnreadable {
        path: path.to_path_buf(),
        source,
    })
}
