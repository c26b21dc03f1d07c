use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::artifact::{self, Artifact, ArtifactOptions};
use crate::config::Settings;
use crate::dataset::Payload;
use crate::delivery::{Dispatcher, Receipt};
use crate::grid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub artifact_name: String,
    pub rows: usize,
    pub recipients: Vec<String>,
    /// `None` when the payload named no recipients.
    pub receipt: Option<Receipt>,
}

/// Parse a payload and write its workbook. The caller owns the artifact.
pub fn render(body: &str, dir: &Path, options: &ArtifactOptions) -> Result<(Payload, Artifact)> {
    let payload = Payload::parse(body).context("Parsing request payload")?;
    let grid = grid::populate(&payload.dataset).context("Populating grid")?;
    let artifact = artifact::write_artifact(&grid, dir, options)
        .with_context(|| format!("Writing workbook into {dir:?}"))?;
    Ok((payload, artifact))
}

/// The artifact is removed whether or not dispatch succeeds; a failed removal
/// is logged and does not change the result.
pub fn handle_request(
    body: &str,
    settings: &Settings,
    dispatcher: &dyn Dispatcher,
) -> Result<Outcome> {
    let (payload, artifact) = render(body, &settings.output_dir, &settings.artifact_options())?;
    let artifact_name = artifact.file_name();

    let dispatched = if payload.recipients.is_empty() {
        warn!("Payload has no recipients; {artifact_name} will not be delivered");
        Ok(None)
    } else {
        dispatcher
            .dispatch(artifact.path(), &payload.recipients)
            .map(Some)
            .with_context(|| format!("Delivering {artifact_name}"))
    };

    cleanup(artifact);
    let receipt = dispatched?;
    info!(
        "Handled request for {} row(s), artifact {artifact_name}",
        payload.dataset.len()
    );
    Ok(Outcome {
        artifact_name,
        rows: payload.dataset.len(),
        recipients: payload.recipients,
        receipt,
    })
}

fn cleanup(artifact: Artifact) {
    let path = artifact.path().to_path_buf();
    if let Err(err) = artifact.remove() {
        warn!("Could not remove artifact {path:?}: {err}");
    }
}
