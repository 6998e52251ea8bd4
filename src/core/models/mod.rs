//! Data models shared by the pairing and rendering stages

pub mod edge;
pub mod labels;

pub use edge::{aggregate_edges, qualified_label, Edge, Link, NARROW_HEADER};
pub use labels::LabelIndex;
