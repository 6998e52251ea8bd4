//! Label index: dense integer ids for Sankey nodes

use super::edge::{Edge, Link};
use crate::core::error::RenderError;
use std::collections::HashMap;

/// Bijection between node labels and indices `0..len()`.
///
/// Built from every source label (in row order) followed by every target
/// label (in row order); a label keeps the index of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelIndex {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelIndex {
    /// Build the index from a slice of edges
    #[must_use]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut labels = Self::default();
        let sources = edges.iter().map(|e| e.source.as_str());
        let targets = edges.iter().map(|e| e.target.as_str());
        for label in sources.chain(targets) {
            labels.insert(label);
        }
        labels
    }

    fn insert(&mut self, label: &str) {
        if !self.index.contains_key(label) {
            self.index.insert(label.to_string(), self.labels.len());
            self.labels.push(label.to_string());
        }
    }

    /// Number of distinct labels
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no edge has been indexed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by index
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index assigned to `label`
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Resolve each edge's endpoints to indices.
    ///
    /// # Errors
    /// Returns [`RenderError::UnknownLabel`] if an edge uses a label that
    /// was not indexed.
    pub fn links(&self, edges: &[Edge]) -> Result<Vec<Link>, RenderError> {
        edges
            .iter()
            .map(|edge| {
                Ok(Link {
                    source: self.resolve(&edge.source)?,
                    target: self.resolve(&edge.target)?,
                    value: edge.value,
                })
            })
            .collect()
    }

    fn resolve(&self, label: &str) -> Result<usize, RenderError> {
        self.index_of(label)
            .ok_or_else(|| RenderError::UnknownLabel(label.to_string()))
    }
}
