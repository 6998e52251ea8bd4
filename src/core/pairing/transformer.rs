//! Sliding-window pairing of adjacent columns
//!
//! Each data row `[c0, c1, ..., cn]` becomes the edges `c0→c1, c1→c2, ...,
//! c(n-1)→cn`, each with weight 1. Rows are addressed by position; the
//! header is only used to qualify labels when `header_key` is set.

use crate::core::error::{TransformError, TransformResult};
use crate::core::models::{qualified_label, Edge, NARROW_HEADER};
use csv::{ReaderBuilder, StringRecord, StringRecordsIter, Terminator, WriterBuilder};
use logger::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Options controlling how the wide CSV is read and labelled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairingOptions {
    /// Rows dropped before the header row.
    ///
    /// `skip_rows + 1` rows are consumed in total and the last of them is the
    /// header, so `0` means "the first row is the header".
    pub skip_rows: usize,
    /// Qualify labels as `"<column>-<value>"`
    pub header_key: bool,
}

/// What a pairing run read and wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingSummary {
    /// Header row of the wide CSV
    pub header: Vec<String>,
    /// Number of data rows paired
    pub rows: usize,
    /// Number of edges written
    pub edges: usize,
}

/// Convert the wide CSV at `input` into a narrow CSV at `output`.
///
/// The input is opened before the output is created, so a missing input
/// leaves no output file behind. Both handles are closed when this returns.
///
/// # Errors
/// Returns [`TransformError::Io`] if either file cannot be opened, and any
/// error of [`transform_reader`].
pub fn transform(
    input: &Path,
    output: &Path,
    options: &PairingOptions,
) -> TransformResult<PairingSummary> {
    info!(
        "Pairing {} -> {} (skip_rows={}, header_key={})",
        input.display(),
        output.display(),
        options.skip_rows,
        options.header_key
    );

    let reader = File::open(input).map_err(|source| TransformError::Io {
        path: input.to_path_buf(),
        source,
    })?;
    let writer = File::create(output).map_err(|source| TransformError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = transform_reader(reader, BufWriter::new(writer), options)?;
    info!(
        "Wrote {} edges from {} rows to {}",
        summary.edges,
        summary.rows,
        output.display()
    );
    Ok(summary)
}

/// Stream-convert a wide CSV from `input` into a narrow CSV on `output`.
///
/// # Errors
/// - [`TransformError::MissingHeader`] if fewer than `skip_rows + 1` rows exist
/// - [`TransformError::MalformedRow`] if a data row is shorter than the header
/// - [`TransformError::Decoding`] if the input is not valid UTF-8
/// - [`TransformError::Csv`] on other read/write failures
pub fn transform_reader<R: Read, W: Write>(
    input: R,
    output: W,
    options: &PairingOptions,
) -> TransformResult<PairingSummary> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let header = read_header(&mut records, options.skip_rows)?;
    debug!("headers: {:?}", header.iter().collect::<Vec<_>>());
    if header.len() < 2 {
        warn!(
            "Header has {} column(s); at least 2 are needed to produce edges",
            header.len()
        );
    }

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);
    writer.write_record(NARROW_HEADER)?;

    let mut summary = PairingSummary {
        header: header.iter().map(str::to_string).collect(),
        ..PairingSummary::default()
    };

    for (row_index, record) in records.enumerate() {
        let row = record.map_err(read_error)?;
        let edges = pair_row(&header, &row, row_index, options.header_key)?;
        for edge in &edges {
            let value = format_value(edge.value);
            writer.write_record([edge.source.as_str(), edge.target.as_str(), value.as_str()])?;
        }
        summary.rows += 1;
        summary.edges += edges.len();
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(summary)
}

/// Emit the edges of one data row.
///
/// Window `i` (for `i` in `1..header.len()`) pairs `row[i-1]` with `row[i]`.
/// Fields past the header length are ignored.
///
/// # Errors
/// Returns [`TransformError::MalformedRow`] when the row has fewer fields
/// than the header.
pub fn pair_row(
    header: &StringRecord,
    row: &StringRecord,
    row_index: usize,
    header_key: bool,
) -> TransformResult<Vec<Edge>> {
    if header.len() < 2 {
        return Ok(Vec::new());
    }
    if row.len() < header.len() {
        return Err(TransformError::MalformedRow {
            row_index,
            expected_len: header.len(),
            actual_len: row.len(),
        });
    }

    let edges = (1..header.len())
        .map(|i| {
            let (source, target) = (&row[i - 1], &row[i]);
            debug!("row {row_index} window {}..{i}: {source} -> {target}", i - 1);
            if header_key {
                Edge::unit(
                    qualified_label(&header[i - 1], source),
                    qualified_label(&header[i], target),
                )
            } else {
                Edge::unit(source, target)
            }
        })
        .collect();

    Ok(edges)
}

/// Consume `skip_rows + 1` records and return the last one.
fn read_header<R: Read>(
    records: &mut StringRecordsIter<'_, R>,
    skip_rows: usize,
) -> TransformResult<StringRecord> {
    let mut header = StringRecord::new();
    for consumed in 0..=skip_rows {
        header = records
            .next()
            .ok_or(TransformError::MissingHeader { skip_rows })?
            .map_err(read_error)?;
        if consumed < skip_rows {
            debug!("skipping row {consumed}");
        }
    }
    Ok(header)
}

fn read_error(err: csv::Error) -> TransformError {
    if let csv::ErrorKind::Utf8 { pos, err: utf8 } = err.kind() {
        return TransformError::Decoding {
            line: pos.as_ref().map_or(0, csv::Position::line),
            message: utf8.to_string(),
        };
    }
    TransformError::Csv(err)
}

/// Whole weights are written without a fractional part (`1`, not `1.0`).
fn format_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str, options: PairingOptions) -> Result<String, TransformError> {
        let mut out = Vec::new();
        transform_reader(input.as_bytes(), &mut out, &options)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_pairs_adjacent_columns() {
        let out = run("X,Y,Z\nA,B,C\n", PairingOptions::default()).unwrap();
        assert_eq!(out, "source,target,value\nA,B,1\nB,C,1\n");
    }

    #[test]
    fn test_header_key_qualifies_labels() {
        let options = PairingOptions {
            header_key: true,
            ..PairingOptions::default()
        };
        let out = run("X,Y,Z\nA,B,C\n", options).unwrap();
        assert_eq!(out, "source,target,value\nX-A,Y-B,1\nY-B,Z-C,1\n");
    }

    #[test]
    fn test_skip_rows_uses_last_consumed_row_as_header() {
        let options = PairingOptions {
            skip_rows: 2,
            header_key: true,
        };
        let out = run("h0,h0,h0\nh1,h1,h1\nP,Q,R\nA,B,C\n", options).unwrap();
        assert_eq!(out, "source,target,value\nP-A,Q-B,1\nQ-B,R-C,1\n");
    }

    #[test]
    fn test_blank_lines_not_counted_as_skipped_rows() {
        let options = PairingOptions {
            skip_rows: 1,
            header_key: true,
        };
        let out = run("h0,h0\n\nX,Y\nA,B\n", options).unwrap();
        assert_eq!(out, "source,target,value\nX-A,Y-B,1\n");
    }

    #[test]
    fn test_short_row_is_malformed() {
        let err = run("X,Y,Z\nA,B,C\nD,E\n", PairingOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MalformedRow {
                row_index: 1,
                expected_len: 3,
                actual_len: 2
            }
        ));
    }

    #[test]
    fn test_long_row_extra_fields_ignored() {
        let out = run("X,Y\nA,B,C,D\n", PairingOptions::default()).unwrap();
        assert_eq!(out, "source,target,value\nA,B,1\n");
    }

    #[test]
    fn test_missing_header() {
        let options = PairingOptions {
            skip_rows: 3,
            header_key: false,
        };
        let err = run("a,b\nc,d\n", options).unwrap_err();
        assert!(matches!(err, TransformError::MissingHeader { skip_rows: 3 }));

        let err = run("", PairingOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::MissingHeader { skip_rows: 0 }));
    }

    #[test]
    fn test_single_column_yields_no_edges() {
        let out = run("X\nA\nB\n", PairingOptions::default()).unwrap();
        assert_eq!(out, "source,target,value\n");
    }

    #[test]
    fn test_quoted_fields_are_preserved() {
        let out = run("X,Y\n\"a, b\",\"say \"\"hi\"\"\"\n", PairingOptions::default()).unwrap();
        assert_eq!(out, "source,target,value\n\"a, b\",\"say \"\"hi\"\"\",1\n");
    }

    #[test]
    fn test_invalid_utf8_is_a_decoding_error() {
        let mut out = Vec::new();
        let input: &[u8] = b"X,Y\nA,\xff\n";
        let err = transform_reader(input, &mut out, &PairingOptions::default()).unwrap_err();
        assert!(matches!(err, TransformError::Decoding { .. }));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(2.5), "2.5");
    }
}
