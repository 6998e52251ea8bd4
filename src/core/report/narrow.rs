//! Narrow CSV loader
//!
//! Reads the `source,target,value` edge list written by the pairing stage.
//! Columns are addressed by name, so extra or reordered columns are accepted
//! as long as the three required ones are present.

use crate::core::error::RenderError;
use crate::core::models::{Edge, NARROW_HEADER};
use csv::{ReaderBuilder, StringRecord};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Character encoding assumed when reading the narrow CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NarrowEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value
    #[default]
    Latin1,
    /// UTF-8, with invalid sequences replaced and a leading BOM dropped
    Utf8,
}

impl NarrowEncoding {
    /// Decode raw file bytes into text
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Cow<'_, str> {
        match self {
            Self::Latin1 => encoding_rs::mem::decode_latin1(bytes),
            Self::Utf8 => encoding_rs::UTF_8.decode_with_bom_removal(bytes).0,
        }
    }
}

impl FromStr for NarrowEncoding {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iso-8859-1" | "iso8859-1" | "latin-1" | "latin1" => Ok(Self::Latin1),
            "utf-8" | "utf8" => Ok(Self::Utf8),
            _ => Err(RenderError::UnsupportedEncoding(s.to_string())),
        }
    }
}

impl fmt::Display for NarrowEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latin1 => write!(f, "iso-8859-1"),
            Self::Utf8 => write!(f, "utf-8"),
        }
    }
}

/// Load the narrow CSV at `path`.
///
/// # Errors
/// Returns [`RenderError::Io`] if the file cannot be read, and any error of
/// [`parse_narrow`].
pub fn load_narrow(path: &Path, encoding: NarrowEncoding) -> Result<Vec<Edge>, RenderError> {
    let bytes = fs::read(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_narrow(&encoding.decode(&bytes))
}

/// Parse narrow CSV text into edges.
///
/// # Errors
/// - [`RenderError::MissingColumns`] if `source`, `target` or `value` is absent
/// - [`RenderError::MalformedRow`] if a row stops before a required column
/// - [`RenderError::InvalidValue`] if a `value` is not a finite number
pub fn parse_narrow(content: &str) -> Result<Vec<Edge>, RenderError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .double_quote(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = ColumnPositions::locate(reader.headers()?)?;

    let mut edges = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        edges.push(columns.edge(&record?, row_index)?);
    }
    Ok(edges)
}

/// Positions of the required columns within the header
struct ColumnPositions {
    source: usize,
    target: usize,
    value: usize,
}

impl ColumnPositions {
    fn locate(headers: &StringRecord) -> Result<Self, RenderError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let [source, target, value] = NARROW_HEADER.map(find);

        match (source, target, value) {
            (Some(source), Some(target), Some(value)) => Ok(Self {
                source,
                target,
                value,
            }),
            _ => Err(RenderError::MissingColumns {
                missing: NARROW_HEADER
                    .iter()
                    .zip([source, target, value])
                    .filter(|(_, pos)| pos.is_none())
                    .map(|(name, _)| (*name).to_string())
                    .collect(),
            }),
        }
    }

    fn width(&self) -> usize {
        self.source.max(self.target).max(self.value) + 1
    }

    fn edge(&self, record: &StringRecord, row_index: usize) -> Result<Edge, RenderError> {
        if record.len() < self.width() {
            return Err(RenderError::MalformedRow {
                row_index,
                expected_len: self.width(),
                actual_len: record.len(),
            });
        }

        let raw = &record[self.value];
        let value = raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| RenderError::InvalidValue {
                row_index,
                value: raw.to_string(),
            })?;

        Ok(Edge::new(&record[self.source], &record[self.target], value))
    }
}
