//! Diagram output formats
//!
//! Provides backends for the supported formats: a self-contained HTML page
//! and the raw plotly figure as JSON.

pub mod html;
pub mod json;

pub use html::HtmlBackend;
pub use json::JsonBackend;

use crate::core::error::RenderError;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Supported diagram formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// HTML page with an interactive plotly.js diagram
    #[default]
    Html,
    /// plotly figure JSON
    Json,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown diagram format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Write `content` to `path`, creating missing parent directories
pub(crate) fn write_output(path: &Path, content: &str) -> Result<(), RenderError> {
    let io_err = |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)
}
