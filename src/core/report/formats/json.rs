//! JSON diagram backend
//!
//! Writes the plotly figure to a file without launching anything, for
//! headless use or for feeding another plotting front end.

use super::write_output;
use crate::core::error::RenderError;
use crate::core::models::Link;
use crate::core::report::{DiagramBackend, DiagramStyle, PlotlyFigure, SankeyDiagram};
use std::path::PathBuf;

/// Writes the plotly figure JSON to `output_path`
#[derive(Debug, Clone)]
pub struct JsonBackend {
    style: DiagramStyle,
    output_path: PathBuf,
}

impl JsonBackend {
    /// Create a JSON backend writing to `output_path`
    #[must_use]
    pub fn new(output_path: impl Into<PathBuf>, style: DiagramStyle) -> Self {
        Self {
            style,
            output_path: output_path.into(),
        }
    }

    /// Serialize a diagram as pretty-printed plotly JSON
    ///
    /// # Errors
    /// Returns an error if serialization fails
    pub fn render(diagram: &SankeyDiagram) -> Result<String, RenderError> {
        Ok(serde_json::to_string_pretty(&PlotlyFigure::from_diagram(
            diagram,
        ))?)
    }
}

impl DiagramBackend for JsonBackend {
    fn build(
        &self,
        nodes: &[String],
        links: &[Link],
        title: &str,
    ) -> Result<SankeyDiagram, RenderError> {
        Ok(SankeyDiagram::new(nodes, links, title, self.style.clone()))
    }

    fn show(&self, diagram: &SankeyDiagram) -> Result<(), RenderError> {
        write_output(&self.output_path, &Self::render(diagram)?)?;
        logger::info!("Diagram JSON written to {}", self.output_path.display());
        Ok(())
    }
}
