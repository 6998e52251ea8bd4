//! Tests for verbose and file-logging features.

use logger::{disable_verbose, enable_verbose, error, info, is_verbose_enabled, verbose, warn};

#[cfg(feature = "verbose")]
#[test]
fn verbose_respects_runtime_flag() {
    disable_verbose();
    assert!(!is_verbose_enabled());
    verbose!("This should not appear");

    enable_verbose();
    assert!(is_verbose_enabled());
    verbose!("This should appear: verbose test {}", 42);
    disable_verbose();
}

#[cfg(all(feature = "file-logging", feature = "log-info"))]
#[test]
fn file_logging_receives_tagged_lines() {
    use logger::{close_file_logging, init_file_logging, set_level, Level};
    use std::fs;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let log_path = dir.path().join("csvsankey.log");

    set_level(Level::Info);
    init_file_logging(&log_path).expect("Failed to open log file");

    info!("Test info message");
    warn!("Test warning message");
    error!("Test error message");

    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
    assert!(contents.contains("[INFO] Test info message"));
    assert!(contents.contains("[WARN] Test warning message"));
    assert!(contents.contains("[ERROR] Test error message"));
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_reports_open_failure() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let missing = dir.path().join("no-such-dir").join("x.log");
    assert!(logger::init_file_logging(&missing).is_err());
}
