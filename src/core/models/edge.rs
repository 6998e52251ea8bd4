//! Edges of the narrow edge list and their indexed form

use std::collections::HashMap;

/// Header row of every narrow CSV, in column order
pub const NARROW_HEADER: [&str; 3] = ["source", "target", "value"];

/// One row of the narrow CSV: a flow from `source` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    /// Source node label
    pub source: String,
    /// Target node label
    pub target: String,
    /// Flow weight (always 1 when emitted by the pairing stage)
    pub value: f64,
}

impl Edge {
    /// Create a new edge
    #[must_use]
    pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            value,
        }
    }

    /// Create an edge with the unit weight the pairing stage writes
    #[must_use]
    pub fn unit(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, 1.0)
    }
}

/// An edge whose endpoints are resolved to label indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Index of the source label
    pub source: usize,
    /// Index of the target label
    pub target: usize,
    /// Flow weight
    pub value: f64,
}

/// Build a header-qualified label, `"<column>-<value>"`.
///
/// Used when the same value appears under several columns and each
/// occurrence should become its own node.
#[must_use]
pub fn qualified_label(column: &str, value: &str) -> String {
    format!("{column}-{value}")
}

/// Sum the weights of edges sharing the same `(source, target)` pair.
///
/// The result keeps the order in which each pair first appears.
#[must_use]
pub fn aggregate_edges(edges: &[Edge]) -> Vec<Edge> {
    let mut position: HashMap<(&str, &str), usize> = HashMap::new();
    let mut merged: Vec<Edge> = Vec::new();

    for edge in edges {
        let key = (edge.source.as_str(), edge.target.as_str());
        if let Some(&idx) = position.get(&key) {
            merged[idx].value += edge.value;
        } else {
            position.insert(key, merged.len());
            merged.push(edge.clone());
        }
    }

    merged
}
