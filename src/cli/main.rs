//! Command-line interface entry point for `csvsankey`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use csv_sankey::config::Config;
use logger::{enable_verbose, info, init_file_logging, set_level, Level};
use std::path::PathBuf;

fn main() {
    let args = Cli::parse_from(args::normalize_legacy_flags(std::env::args_os()));

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    init_logging(&args, &config);

    match (&args.command, &args.input_file) {
        (Some(Command::Config { subcommand }), _) => {
            commands::config::run(subcommand.as_ref(), &mut config, &defaults);
        }
        (None, Some(input_file)) => commands::sankey::run(&args, input_file, &config),
        (None, None) => {
            eprintln!("✗ No input file given");
            std::process::exit(2);
        }
    }
}

fn init_logging(args: &Cli, config: &Config) {
    // CLI flag overrides config; otherwise use config logging.level; fallback warn
    let level = if args.debug_flag {
        Level::Debug
    } else {
        args.log_level
            .map(Level::from)
            .or_else(|| config.logging.level.parse().ok())
            .unwrap_or(Level::Warn)
    };
    set_level(level);

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path =
        (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = std::fs::create_dir_all(parent);
        }
        match init_file_logging(log_path) {
            Ok(()) => info!("File logging initialized at: {}", log_path.display()),
            Err(e) => eprintln!(
                "✗ Failed to initialize file logging at {}: {e}",
                log_path.display()
            ),
        }
    }
}
