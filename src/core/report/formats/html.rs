//! HTML diagram backend
//!
//! Renders a self-contained page that draws the diagram with plotly.js, writes
//! it to disk and opens it in the platform's default viewer.

use super::write_output;
use crate::core::error::RenderError;
use crate::core::models::Link;
use crate::core::report::{DiagramBackend, DiagramStyle, PlotlyFigure, SankeyDiagram};
use askama::Template;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default plotly.js bundle loaded by the page
pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Template)]
#[template(path = "sankey.html")]
struct SankeyPage<'a> {
    title: &'a str,
    plotly_src: &'a str,
    figure_json: &'a str,
}

/// Writes the diagram as an HTML page and optionally opens it
#[derive(Debug, Clone)]
pub struct HtmlBackend {
    style: DiagramStyle,
    output_path: PathBuf,
    plotly_src: String,
    open: bool,
}

impl HtmlBackend {
    /// Create an HTML backend writing to `output_path`
    #[must_use]
    pub fn new(output_path: impl Into<PathBuf>, style: DiagramStyle) -> Self {
        Self {
            style,
            output_path: output_path.into(),
            plotly_src: DEFAULT_PLOTLY_SRC.to_string(),
            open: true,
        }
    }

    /// Use a different plotly.js script URL or path
    #[must_use]
    pub fn with_plotly_src(mut self, src: impl Into<String>) -> Self {
        self.plotly_src = src.into();
        self
    }

    /// Whether `show` launches a viewer after writing the page
    #[must_use]
    pub const fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Path of the page written by `show`
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Render the page for a diagram
    ///
    /// # Errors
    /// Returns an error if serialization or templating fails
    pub fn render_page(&self, diagram: &SankeyDiagram) -> Result<String, RenderError> {
        let figure_json = PlotlyFigure::from_diagram(diagram).to_script_json()?;
        let page = SankeyPage {
            title: &diagram.title,
            plotly_src: &self.plotly_src,
            figure_json: &figure_json,
        };
        Ok(page.render()?)
    }
}

impl DiagramBackend for HtmlBackend {
    fn build(
        &self,
        nodes: &[String],
        links: &[Link],
        title: &str,
    ) -> Result<SankeyDiagram, RenderError> {
        Ok(SankeyDiagram::new(nodes, links, title, self.style.clone()))
    }

    fn show(&self, diagram: &SankeyDiagram) -> Result<(), RenderError> {
        write_output(&self.output_path, &self.render_page(diagram)?)?;
        logger::info!("Diagram written to {}", self.output_path.display());

        if self.open {
            open_in_viewer(&self.output_path)?;
        }
        Ok(())
    }
}

/// Open `path` with the platform's default handler
///
/// # Errors
/// Returns [`RenderError::Launch`] if the opener cannot be started or exits
/// with a failure status.
pub fn open_in_viewer(path: &Path) -> Result<(), RenderError> {
    let launch_err = |source| RenderError::Launch {
        path: path.to_path_buf(),
        source,
    };

    let status = opener_command(path).status().map_err(launch_err)?;
    if status.success() {
        logger::debug!("Opened {} in the default viewer", path.display());
        Ok(())
    } else {
        Err(launch_err(std::io::Error::other(format!(
            "viewer exited with {status}"
        ))))
    }
}

fn opener_command(path: &Path) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample(backend: &HtmlBackend, title: &str) -> SankeyDiagram {
        backend
            .build(
                &["col1-a".to_string(), "col2-b".to_string()],
                &[Link {
                    source: 0,
                    target: 1,
                    value: 1.0,
                }],
                title,
            )
            .unwrap()
    }

    #[test]
    fn test_page_embeds_figure_and_script() {
        let backend = HtmlBackend::new("unused.html", DiagramStyle::default())
            .with_plotly_src("plotly.min.js");
        let page = backend.render_page(&sample(&backend, "flows.csv")).unwrap();

        assert!(page.contains("<title>flows.csv</title>"));
        assert!(page.contains(r#"<script src="plotly.min.js"></script>"#));
        assert!(page.contains(r#""type":"sankey""#));
        assert!(page.contains(r#""label":["col1-a","col2-b"]"#));
    }

    #[test]
    fn test_title_is_escaped() {
        let backend = HtmlBackend::new("unused.html", DiagramStyle::default());
        let page = backend.render_page(&sample(&backend, "<b>x</b>")).unwrap();
        assert!(!page.contains("<title><b>x</b></title>"));
    }

    #[test]
    fn test_show_without_open_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("diagram.html");
        let backend = HtmlBackend::new(&path, DiagramStyle::default()).with_open(false);

        backend.show(&sample(&backend, "t")).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("Plotly.newPlot"));
    }
}
