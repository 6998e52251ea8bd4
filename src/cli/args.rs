//! CLI argument definitions for `csvsankey`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use csv_sankey::config::ConfigOverrides;
use csv_sankey::get_version;
use csv_sankey::report::ReportFormat;
use logger::Level;
use std::ffi::OsString;
use std::path::PathBuf;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `logger::Level`
/// for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `output_file`, `node_pad`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "csvsankey",
    about = "Turn a multi-column flow CSV into a source/target edge list and draw it as a Sankey diagram",
    version = get_version(),
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
pub struct Cli {
    /// Wide CSV file to pair; each row is a path through its columns
    #[arg(value_name = "INPUT_FILE", required = true)]
    pub input_file: Option<PathBuf>,

    /// Narrow CSV to write (defaults to config `output_file`)
    #[arg(short = 'o', long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Rows to skip before the header row (legacy spelling: -sr)
    #[arg(short = 's', long = "skip-rows", value_name = "N", default_value_t = 0)]
    pub skip_rows: usize,

    /// Prefix each label with its column name (legacy spelling: -hk)
    #[arg(short = 'k', long = "header-key")]
    pub header_key: bool,

    /// Sum repeated source/target pairs into one link
    #[arg(long)]
    pub aggregate: bool,

    /// Stop after writing the narrow CSV
    #[arg(long)]
    pub no_render: bool,

    /// Write the diagram without opening a viewer
    #[arg(long)]
    pub no_open: bool,

    /// Diagram format: html or json
    #[arg(short = 'f', long, value_name = "FORMAT", default_value = "html")]
    pub format: ReportFormat,

    /// Diagram file path (defaults to `<diagram_dir>/<input>_sankey.<ext>`)
    #[arg(long, value_name = "FILE")]
    pub diagram_file: Option<PathBuf>,

    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config diagram directory
    #[arg(long = "diagram-dir", value_name = "DIR")]
    pub diagram_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Flags that only switch a behaviour on (`--aggregate`, `--no-open`)
    /// override the config only when given.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            output_file: self.output_file.as_ref().map(path_string),
            diagram_dir: self.diagram_dir.as_ref().map(path_string),
            aggregate: self.aggregate.then_some(true),
            open: self.no_open.then_some(false),
        }
    }
}

/// Rewrite the two-letter legacy short flags into their long forms.
///
/// clap short flags are single characters, so `-sr 2`, `-sr=2`, `-sr2` and
/// `-hk` are mapped to `--skip-rows` and `--header-key` before parsing.
/// Arguments after `--` are left alone.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut after_separator = false;
    args.into_iter()
        .map(|arg| {
            if after_separator {
                return arg;
            }
            if arg == "--" {
                after_separator = true;
                return arg;
            }
            arg.to_str().and_then(legacy_long_form).unwrap_or(arg)
        })
        .collect()
}

fn legacy_long_form(arg: &str) -> Option<OsString> {
    if arg == "-hk" {
        return Some(OsString::from("--header-key"));
    }
    let rest = arg.strip_prefix("-sr")?;
    if rest.is_empty() {
        Some(OsString::from("--skip-rows"))
    } else if rest.starts_with('=') {
        Some(OsString::from(format!("--skip-rows{rest}")))
    } else if rest.bytes().all(|b| b.is_ascii_digit()) {
        Some(OsString::from(format!("--skip-rows={rest}")))
    } else {
        None
    }
}
