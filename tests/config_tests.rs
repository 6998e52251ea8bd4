//! Integration tests for configuration management

use csv_sankey::config::{Config, ConfigOverrides};
use csv_sankey::error::ConfigError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a temporary config directory
fn setup_temp_config() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    (temp_dir, config_file)
}

#[test]
fn test_config_from_defaults() {
    let config = Config::from_defaults();

    assert!(
        !config.logging.level.is_empty(),
        "Default log level should not be empty"
    );
    assert_eq!(config.paths.output_file, "output.csv");
    assert!(
        !config.paths.diagram_dir.is_empty(),
        "Default diagram_dir should not be empty"
    );
    assert_eq!(config.render.encoding, "iso-8859-1");
    assert!(!config.render.aggregate);
    assert_eq!(config.render.node_pad, 15);
    assert_eq!(config.render.node_thickness, 20);
    assert_eq!(config.render.font_size, 10);
}

#[test]
fn test_config_from_toml_basic() {
    let toml_str = r#"
[logging]
level = "info"
file = "/tmp/test.log"
verbose = true

[paths]
output_file = "edges.csv"
diagram_dir = "./diagrams"

[render]
encoding = "utf-8"
aggregate = true
open = false
plotly_src = "plotly.min.js"
node_pad = 8
node_thickness = 12
node_line_color = "gray"
node_line_width = 1.5
font_size = 14
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML");

    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.file, "/tmp/test.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.output_file, "edges.csv");
    assert_eq!(config.paths.diagram_dir, "./diagrams");
    assert_eq!(config.render.encoding, "utf-8");
    assert!(config.render.aggregate);
    assert!(!config.render.open);
    assert_eq!(config.render.plotly_src, "plotly.min.js");
    assert_eq!(config.render.node_pad, 8);
    assert_eq!(config.render.node_thickness, 12);
    assert_eq!(config.render.node_line_color, "gray");
    assert!((config.render.node_line_width - 1.5).abs() < f64::EPSILON);
    assert_eq!(config.render.font_size, 14);
}

#[test]
fn test_config_from_toml_partial() {
    // Missing sections and fields fall back to serde defaults
    let toml_str = r#"
[logging]
level = "error"

[paths]
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse partial TOML");

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "");
    assert!(!config.logging.verbose);
    assert_eq!(config.paths.output_file, "");
    assert_eq!(config.render.node_pad, 15);
    assert_eq!(config.render.node_line_color, "black");
    assert!(config.render.open);
}

#[test]
fn test_config_variable_expansion() {
    let toml_str = r#"
[logging]
file = "$CSV_SANKEY/test.log"

[paths]
diagram_dir = "$CSV_SANKEY/diagrams"
"#;

    let config = Config::from_toml(toml_str).expect("Failed to parse TOML with variables");

    assert!(config.logging.file.contains("csvsankey"));
    assert!(!config.logging.file.contains("$CSV_SANKEY"));
    assert!(config.paths.diagram_dir.contains("csvsankey"));
    assert!(!config.paths.diagram_dir.contains("$CSV_SANKEY"));
}

#[test]
fn test_config_get_set() {
    let mut config = Config::from_defaults();

    assert!(config.get("level").is_some());

    config.set("level", "debug").expect("Failed to set level");
    assert_eq!(config.get("level").unwrap(), "debug");

    config
        .set("verbose", "true")
        .expect("Failed to set verbose");
    assert_eq!(config.get("verbose").unwrap(), "true");
    assert!(config.logging.verbose);

    config
        .set("output-file", "narrow.csv")
        .expect("Failed to set output file");
    assert_eq!(config.get("output_file").unwrap(), "narrow.csv");

    config
        .set("aggregate", "true")
        .expect("Failed to set aggregate");
    assert!(config.render_settings().unwrap().aggregate);

    assert!(config.get("unknown_key").is_none());
    assert!(matches!(
        config.set("unknown_key", "value"),
        Err(ConfigError::UnknownKey(_))
    ));
    assert!(matches!(
        config.set("verbose", "maybe"),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_config_unset() {
    let mut config = Config::from_defaults();
    let defaults = Config::from_defaults();

    config.set("level", "error").expect("Failed to set level");
    config.set("font_size", "20").expect("Failed to set font size");
    assert_eq!(config.logging.level, "error");

    config
        .unset("level", &defaults)
        .expect("Failed to unset level");
    config
        .unset("font-size", &defaults)
        .expect("Failed to unset font size");
    assert_eq!(config.logging.level, defaults.logging.level);
    assert_eq!(config.render.font_size, defaults.render.font_size);
    assert!(config.unset("nope", &defaults).is_err());
}

#[test]
fn test_config_save_and_load() {
    let (_temp_dir, config_file) = setup_temp_config();

    let mut config = Config::from_defaults();
    config.set("level", "info").expect("Failed to set level");
    config.set("node_pad", "42").expect("Failed to set node_pad");

    // Manually save to our test location
    let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");
    fs::write(&config_file, toml_str).expect("Failed to write config");

    let content = fs::read_to_string(&config_file).expect("Failed to read config");
    let loaded_config = Config::from_toml(&content).expect("Failed to parse loaded config");

    assert_eq!(loaded_config.logging.level, "info");
    assert_eq!(loaded_config.render.node_pad, 42);
}

#[test]
fn test_config_overrides_apply() {
    let mut config = Config::from_defaults();

    let overrides = ConfigOverrides {
        level: Some("error".to_string()),
        file: Some("/custom/path.log".to_string()),
        verbose: Some(true),
        output_file: Some("./custom.csv".to_string()),
        diagram_dir: Some("./custom_diagrams".to_string()),
        aggregate: Some(true),
        open: Some(false),
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/custom/path.log");
    assert!(config.logging.verbose);
    assert_eq!(config.paths.output_file, "./custom.csv");
    assert_eq!(config.paths.diagram_dir, "./custom_diagrams");
    assert!(config.render.aggregate);
    assert!(!config.render.open);
}

#[test]
fn test_config_overrides_partial() {
    let mut config = Config::from_defaults();
    let before = config.paths.output_file.clone();

    let overrides = ConfigOverrides {
        level: Some("debug".to_string()),
        ..ConfigOverrides::default()
    };

    config.apply_overrides(&overrides);

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.paths.output_file, before);
}

#[test]
fn test_config_display_format() {
    let config = Config::from_defaults();
    let display_str = format!("{config}");

    assert!(display_str.contains("[logging]"));
    assert!(display_str.contains("[paths]"));
    assert!(display_str.contains("[render]"));

    assert!(display_str.contains("level"));
    assert!(display_str.contains("output_file"));
    assert!(display_str.contains("node_thickness"));
}

#[test]
fn test_merge_defaults_adds_missing_fields() {
    let toml_str = r#"
[logging]
level = "error"
file = ""
verbose = false

[paths]
output_file = ""
diagram_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse minimal config");
    let defaults = Config::from_defaults();

    let changed = config.merge_defaults(&defaults);

    assert!(
        changed,
        "merge_defaults should return true when fields are added"
    );
    assert_eq!(config.paths.output_file, "output.csv");
    assert_eq!(config.render.encoding, defaults.render.encoding);
}

#[test]
fn test_merge_defaults_preserves_existing() {
    let toml_str = r#"
[logging]
level = "error"
file = "/my/custom/path.log"
verbose = false

[paths]
output_file = "mine.csv"
diagram_dir = ""
"#;

    let mut config = Config::from_toml(toml_str).expect("Failed to parse config");
    let defaults = Config::from_defaults();

    config.merge_defaults(&defaults);

    assert_eq!(config.logging.level, "error");
    assert_eq!(config.logging.file, "/my/custom/path.log");
    assert_eq!(config.paths.output_file, "mine.csv");
}

#[test]
fn test_get_csvsankey_dir() {
    let dir = Config::get_csvsankey_dir();

    assert!(dir.to_string_lossy().contains("csvsankey"));
    assert_ne!(dir, PathBuf::from("."));
}

#[test]
fn test_get_config_file_path() {
    let path = Config::get_config_file_path();

    let path_str = path.to_string_lossy();
    assert!(path_str.ends_with("config.toml") || path_str.ends_with("dconfig.toml"));
}
