//! Visualization data for Sankey diagrams
//!
//! Provides the plotly.js figure model that the HTML and JSON backends
//! serialize.

pub mod plotly;

pub use plotly::PlotlyFigure;
