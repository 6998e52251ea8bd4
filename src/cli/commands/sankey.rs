//! Default command: pair a wide CSV and render it as a Sankey diagram

use crate::args::Cli;
use csv_sankey::config::Config;
use csv_sankey::pairing::PairingOptions;
use csv_sankey::pipeline::{self, PipelineSummary, SankeyRequest};
use csv_sankey::report::{DiagramBackend, HtmlBackend, JsonBackend, ReportFormat};
use logger::verbose;
use std::error::Error;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_FILE: &str = "output.csv";

/// Run the pipeline for `input_file`, exiting with status 1 on failure
pub fn run(args: &Cli, input_file: &Path, config: &Config) {
    match execute(args, input_file, config) {
        Ok(summary) => report_success(&summary, args, input_file, config),
        Err(e) => {
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    }
}

fn execute(
    args: &Cli,
    input_file: &Path,
    config: &Config,
) -> Result<PipelineSummary, Box<dyn Error>> {
    let request = build_request(args, input_file, config)?;
    verbose!("Reading {}", request.input_file.display());

    if args.no_render {
        return Ok(pipeline::run_transform_only(&request)?);
    }

    let diagram = diagram_path(args, input_file, config);
    let backend = build_backend(args.format, &diagram, config);
    Ok(pipeline::run(&request, backend.as_ref())?)
}

fn build_request(
    args: &Cli,
    input_file: &Path,
    config: &Config,
) -> Result<SankeyRequest, Box<dyn Error>> {
    let output_file = if config.paths.output_file.is_empty() {
        PathBuf::from(DEFAULT_OUTPUT_FILE)
    } else {
        PathBuf::from(&config.paths.output_file)
    };

    Ok(SankeyRequest {
        input_file: input_file.to_path_buf(),
        output_file,
        pairing: PairingOptions {
            skip_rows: args.skip_rows,
            header_key: args.header_key,
        },
        render: config.render_settings()?,
    })
}

/// `--diagram-file`, or `<diagram_dir>/<input stem>_sankey.<ext>`
fn diagram_path(args: &Cli, input_file: &Path, config: &Config) -> PathBuf {
    if let Some(path) = &args.diagram_file {
        return path.clone();
    }
    let stem = input_file
        .file_stem()
        .map_or_else(|| "diagram".into(), |s| s.to_string_lossy());
    let file_name = format!("{stem}_sankey.{}", args.format.extension());
    if config.paths.diagram_dir.is_empty() {
        PathBuf::from(file_name)
    } else {
        Path::new(&config.paths.diagram_dir).join(file_name)
    }
}

fn build_backend(format: ReportFormat, path: &Path, config: &Config) -> Box<dyn DiagramBackend> {
    let style = config.diagram_style();
    match format {
        ReportFormat::Html => {
            let mut backend = HtmlBackend::new(path, style).with_open(config.render.open);
            if !config.render.plotly_src.is_empty() {
                backend = backend.with_plotly_src(&config.render.plotly_src);
            }
            Box::new(backend)
        }
        ReportFormat::Json => Box::new(JsonBackend::new(path, style)),
    }
}

fn report_success(summary: &PipelineSummary, args: &Cli, input_file: &Path, config: &Config) {
    let output_file = if config.paths.output_file.is_empty() {
        DEFAULT_OUTPUT_FILE
    } else {
        config.paths.output_file.as_str()
    };
    println!(
        "✓ Wrote {} edges from {} rows to {output_file}",
        summary.pairing.edges, summary.pairing.rows
    );
    verbose!("  Header: {}", summary.pairing.header.join(", "));

    if let Some(render) = &summary.render {
        println!(
            "✓ Diagram ({} nodes, {} links): {}",
            render.nodes,
            render.links,
            diagram_path(args, input_file, config).display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(extra: &[&str]) -> Cli {
        Cli::try_parse_from(
            ["csvsankey"]
                .iter()
                .chain(extra)
                .chain(["data/flows.csv"].iter()),
        )
        .unwrap()
    }

    #[test]
    fn test_diagram_path_from_config_dir() {
        let mut config = Config::from_defaults();
        config.paths.diagram_dir = "out".to_string();
        let path = diagram_path(&cli(&[]), Path::new("data/flows.csv"), &config);
        assert_eq!(path, Path::new("out").join("flows_sankey.html"));
    }

    #[test]
    fn test_diagram_path_uses_format_extension() {
        let mut config = Config::from_defaults();
        config.paths.diagram_dir = String::new();
        let path = diagram_path(&cli(&["-f", "json"]), Path::new("flows.csv"), &config);
        assert_eq!(path, PathBuf::from("flows_sankey.json"));
    }

    #[test]
    fn test_explicit_diagram_file_wins() {
        let config = Config::from_defaults();
        let args = cli(&["--diagram-file", "x/y.html"]);
        assert_eq!(
            diagram_path(&args, Path::new("flows.csv"), &config),
            PathBuf::from("x/y.html")
        );
    }

    #[test]
    fn test_request_from_flags_and_config() {
        let mut config = Config::from_defaults();
        config.paths.output_file = "edges.csv".to_string();
        let args = cli(&["-s", "2", "-k"]);
        let request = build_request(&args, Path::new("data/flows.csv"), &config).unwrap();

        assert_eq!(request.output_file, PathBuf::from("edges.csv"));
        assert_eq!(request.pairing.skip_rows, 2);
        assert!(request.pairing.header_key);
    }

    #[test]
    fn test_invalid_encoding_rejected() {
        let mut config = Config::from_defaults();
        config.render.encoding = "ebcdic".to_string();
        assert!(build_request(&cli(&[]), Path::new("flows.csv"), &config).is_err());
    }
}
