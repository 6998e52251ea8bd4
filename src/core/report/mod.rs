//! Diagram rendering for narrow edge lists
//!
//! Loads the `source,target,value` CSV written by the pairing stage, builds
//! the node label index and hands the indexed links to a [`DiagramBackend`]
//! that turns them into something a person can look at.

pub mod formats;
pub mod narrow;
pub mod visualization;

use crate::core::error::{RenderError, RenderResult};
use crate::core::models::{aggregate_edges, LabelIndex, Link};
use std::path::Path;

pub use formats::{HtmlBackend, JsonBackend, ReportFormat};
pub use narrow::{load_narrow, parse_narrow, NarrowEncoding};
pub use visualization::PlotlyFigure;

/// Visual settings for the Sankey nodes and text
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramStyle {
    /// Vertical gap between nodes
    pub node_pad: u32,
    /// Node bar thickness
    pub node_thickness: u32,
    /// Node border color
    pub node_line_color: String,
    /// Node border width
    pub node_line_width: f64,
    /// Font size for labels and title
    pub font_size: u32,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            node_pad: 15,
            node_thickness: 20,
            node_line_color: "black".to_string(),
            node_line_width: 0.5,
            font_size: 10,
        }
    }
}

/// A fully indexed Sankey diagram, ready to be displayed
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyDiagram {
    /// Diagram title
    pub title: String,
    /// Node labels; position is the node index
    pub labels: Vec<String>,
    /// Links between node indices
    pub links: Vec<Link>,
    /// Visual settings
    pub style: DiagramStyle,
}

impl SankeyDiagram {
    /// Assemble a diagram from borrowed labels and links
    #[must_use]
    pub fn new(nodes: &[String], links: &[Link], title: &str, style: DiagramStyle) -> Self {
        Self {
            title: title.to_string(),
            labels: nodes.to_vec(),
            links: links.to_vec(),
            style,
        }
    }
}

/// Something that can build and display a Sankey diagram
pub trait DiagramBackend {
    /// Assemble a diagram from node labels and indexed links
    ///
    /// # Errors
    /// Returns an error if the backend rejects the input
    fn build(&self, nodes: &[String], links: &[Link], title: &str)
        -> Result<SankeyDiagram, RenderError>;

    /// Present the diagram (write a file, open a viewer, ...)
    ///
    /// # Errors
    /// Returns an error if the diagram cannot be written or displayed
    fn show(&self, diagram: &SankeyDiagram) -> Result<(), RenderError>;
}

/// Settings for reading the narrow CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSettings {
    /// Encoding of the narrow CSV
    pub encoding: NarrowEncoding,
    /// Sum values of repeated `(source, target)` pairs before indexing
    pub aggregate: bool,
}

/// Counts reported after rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSummary {
    /// Distinct node labels
    pub nodes: usize,
    /// Links handed to the backend
    pub links: usize,
}

/// Render the narrow CSV at `narrow_path` through `backend`.
///
/// # Errors
/// Returns any load, indexing or backend error.
pub fn render<B: DiagramBackend + ?Sized>(
    narrow_path: &Path,
    title: &str,
    settings: &RenderSettings,
    backend: &B,
) -> RenderResult<RenderSummary> {
    let mut edges = load_narrow(narrow_path, settings.encoding)?;
    logger::info!("Loaded {} edges from {}", edges.len(), narrow_path.display());

    if settings.aggregate {
        edges = aggregate_edges(&edges);
        logger::debug!("Aggregated into {} distinct edges", edges.len());
    }

    let index = LabelIndex::from_edges(&edges);
    let links = index.links(&edges)?;
    logger::debug!("Indexed {} node labels", index.len());

    let diagram = backend.build(index.labels(), &links, title)?;
    backend.show(&diagram)?;

    Ok(RenderSummary {
        nodes: index.len(),
        links: links.len(),
    })
}
