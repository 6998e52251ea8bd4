//! End-to-end orchestration: wide CSV → narrow CSV → diagram.

use crate::core::error::PipelineResult;
use crate::core::pairing::{self, PairingOptions, PairingSummary};
use crate::core::report::{self, DiagramBackend, RenderSettings, RenderSummary};
use std::path::PathBuf;

/// Everything one run needs, resolved once from CLI arguments and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SankeyRequest {
    /// Wide CSV to read; also used as the diagram title
    pub input_file: PathBuf,
    /// Narrow CSV to write
    pub output_file: PathBuf,
    /// Header handling for the wide CSV
    pub pairing: PairingOptions,
    /// How the narrow CSV is read back
    pub render: RenderSettings,
}

/// Counts from both stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    /// Pairing stage results
    pub pairing: PairingSummary,
    /// Rendering stage results, absent when rendering was skipped
    pub render: Option<RenderSummary>,
}

/// Run the pairing stage and then render the result through `backend`.
///
/// The stages are not transactional: if rendering fails, the narrow CSV
/// written by the pairing stage stays on disk.
///
/// # Errors
/// Returns [`PipelineError::Transform`](crate::core::error::PipelineError::Transform) or [`PipelineError::Render`](crate::core::error::PipelineError::Render) from the
/// stage that failed.
pub fn run<B: DiagramBackend + ?Sized>(
    request: &SankeyRequest,
    backend: &B,
) -> PipelineResult<PipelineSummary> {
    let pairing = pairing::transform(&request.input_file, &request.output_file, &request.pairing)?;

    let title = request.input_file.to_string_lossy();
    let render = report::render(&request.output_file, &title, &request.render, backend)?;
    logger::info!(
        "Rendered {} nodes and {} links",
        render.nodes,
        render.links
    );

    Ok(PipelineSummary {
        pairing,
        render: Some(render),
    })
}

/// Run only the pairing stage.
///
/// # Errors
/// Returns [`PipelineError::Transform`](crate::core::error::PipelineError::Transform) if pairing fails.
pub fn run_transform_only(request: &SankeyRequest) -> PipelineResult<PipelineSummary> {
    let pairing = pairing::transform(&request.input_file, &request.output_file, &request.pairing)?;
    Ok(PipelineSummary {
        pairing,
        render: None,
    })
}
