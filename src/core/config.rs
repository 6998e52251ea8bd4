//! Configuration module for `csvsankey`

use crate::core::error::ConfigError;
use crate::core::report::{DiagramStyle, NarrowEncoding, RenderSettings};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the config directory inside path values
const DIR_VARIABLE: &str = "$CSV_SANKEY";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Narrow CSV written by the pairing stage
    #[serde(default)]
    pub output_file: String,
    /// Directory for diagram files
    #[serde(default)]
    pub diagram_dir: String,
}

/// Diagram rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Encoding of the narrow CSV (iso-8859-1 or utf-8)
    pub encoding: String,
    /// Sum repeated `(source, target)` edges
    pub aggregate: bool,
    /// Open the diagram in a viewer after writing it
    pub open: bool,
    /// plotly.js script URL or path used by HTML diagrams
    pub plotly_src: String,
    /// Gap between nodes
    pub node_pad: u32,
    /// Node thickness
    pub node_thickness: u32,
    /// Node border color
    pub node_line_color: String,
    /// Node border width
    pub node_line_width: f64,
    /// Font size
    pub font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let style = DiagramStyle::default();
        Self {
            encoding: NarrowEncoding::default().to_string(),
            aggregate: false,
            open: true,
            plotly_src: String::new(),
            node_pad: style.node_pad,
            node_thickness: style.node_thickness,
            node_line_color: style.node_line_color,
            node_line_width: style.node_line_width,
            font_size: style.font_size,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override the narrow CSV path
    pub output_file: Option<String>,
    /// Override the diagram directory
    pub diagram_dir: Option<String>,
    /// Override edge aggregation
    pub aggregate: Option<bool>,
    /// Override viewer launch
    pub open: Option<bool>,
}

impl Config {
    /// Get the `$CSV_SANKEY` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/csvsankey`
    /// - macOS: `~/Library/Application Support/csvsankey`
    /// - Windows: `%APPDATA%\csvsankey`
    #[must_use]
    pub fn get_csvsankey_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("csvsankey")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Used when loading so that fields added in newer versions get their
    /// default values. Only string fields that are empty here and non-empty in
    /// `defaults` are updated; numbers and flags are filled by serde.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;
        let mut fill = |field: &mut String, default: &String| {
            if field.is_empty() && !default.is_empty() {
                field.clone_from(default);
                changed = true;
            }
        };

        fill(&mut self.logging.level, &defaults.logging.level);
        fill(&mut self.logging.file, &defaults.logging.file);
        fill(&mut self.paths.output_file, &defaults.paths.output_file);
        fill(&mut self.paths.diagram_dir, &defaults.paths.diagram_dir);
        fill(&mut self.render.encoding, &defaults.render.encoding);
        fill(&mut self.render.plotly_src, &defaults.render.plotly_src);
        fill(
            &mut self.render.node_line_color,
            &defaults.render.node_line_color,
        );

        changed
    }

    /// Apply CLI overrides to this config (runtime only)
    ///
    /// Only non-`None` values replace config values; nothing is persisted.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(output_file) = &overrides.output_file {
            self.paths.output_file.clone_from(output_file);
        }
        if let Some(diagram_dir) = &overrides.diagram_dir {
            self.paths.diagram_dir.clone_from(diagram_dir);
        }

        if let Some(aggregate) = overrides.aggregate {
            self.render.aggregate = aggregate;
        }
        if let Some(open) = overrides.open {
            self.render.open = open;
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds and `dconfig.toml` for debug builds,
    /// inside [`get_csvsankey_dir`](Self::get_csvsankey_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_csvsankey_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$CSV_SANKEY` to the config directory
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_csvsankey_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// `$CSV_SANKEY` is expanded in path values. Missing fields use their
    /// serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.output_file = Self::expand_variables(&config.paths.output_file);
        config.paths.diagram_dir = Self::expand_variables(&config.paths.diagram_dir);
        config.render.plotly_src = Self::expand_variables(&config.render.plotly_src);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// - Debug: `DefaultCLIConfigDebug.toml`
    /// - Release: `DefaultCLIConfigRelease.toml`
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled in and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// An existing file has missing fields merged from defaults and is saved
    /// back if anything changed. On first run the directory and file are
    /// created from defaults. Any read or parse failure falls back to defaults.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            if let Ok(content) = fs::read_to_string(&config_file) {
                if let Ok(mut config) = Self::from_toml(&content) {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
            }
            logger::warn!(
                "Could not read {}, using defaults",
                config_file.display()
            );
        } else {
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Keys are the bare field names (`level`, `output_file`, `node_pad`, ...);
    /// dashes are accepted in place of underscores.
    ///
    /// # Returns
    /// - `Some(String)`: The configuration value as a string
    /// - `None`: If the key is not recognized
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "level" => self.logging.level.clone(),
            "file" => self.logging.file.clone(),
            "verbose" => self.logging.verbose.to_string(),
            "output_file" => self.paths.output_file.clone(),
            "diagram_dir" => self.paths.diagram_dir.clone(),
            "encoding" => self.render.encoding.clone(),
            "aggregate" => self.render.aggregate.to_string(),
            "open" => self.render.open.to_string(),
            "plotly_src" => self.render.plotly_src.clone(),
            "node_pad" => self.render.node_pad.to_string(),
            "node_thickness" => self.render.node_thickness.to_string(),
            "node_line_color" => self.render.node_line_color.clone(),
            "node_line_width" => self.render.node_line_width.to_string(),
            "font_size" => self.render.font_size.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a configuration value by key
    ///
    /// The value is validated and converted to the field's type. Call
    /// [`save()`](Config::save) to persist the change.
    ///
    /// # Errors
    /// - [`ConfigError::UnknownKey`] if the key is not recognized
    /// - [`ConfigError::InvalidValue`] if the value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let normalized = normalize_key(key);
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match normalized.as_str() {
            "level" => {
                let level: logger::Level = value.parse().map_err(|_| invalid())?;
                self.logging.level = level.to_string();
            }
            "file" => self.logging.file = Self::expand_variables(value),
            "verbose" => self.logging.verbose = value.parse().map_err(|_| invalid())?,
            "output_file" => self.paths.output_file = Self::expand_variables(value),
            "diagram_dir" => self.paths.diagram_dir = Self::expand_variables(value),
            "encoding" => {
                let encoding: NarrowEncoding = value.parse().map_err(|_| invalid())?;
                self.render.encoding = encoding.to_string();
            }
            "aggregate" => self.render.aggregate = value.parse().map_err(|_| invalid())?,
            "open" => self.render.open = value.parse().map_err(|_| invalid())?,
            "plotly_src" => self.render.plotly_src = Self::expand_variables(value),
            "node_pad" => self.render.node_pad = value.parse().map_err(|_| invalid())?,
            "node_thickness" => {
                self.render.node_thickness = value.parse().map_err(|_| invalid())?;
            }
            "node_line_color" => self.render.node_line_color = value.to_string(),
            "node_line_width" => {
                self.render.node_line_width = value
                    .parse::<f64>()
                    .ok()
                    .filter(|w| w.is_finite() && *w >= 0.0)
                    .ok_or_else(invalid)?;
            }
            "font_size" => self.render.font_size = value.parse().map_err(|_| invalid())?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownKey`] if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), ConfigError> {
        match normalize_key(key).as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "output_file" => self
                .paths
                .output_file
                .clone_from(&defaults.paths.output_file),
            "diagram_dir" => self
                .paths
                .diagram_dir
                .clone_from(&defaults.paths.diagram_dir),
            "encoding" => self.render.encoding.clone_from(&defaults.render.encoding),
            "aggregate" => self.render.aggregate = defaults.render.aggregate,
            "open" => self.render.open = defaults.render.open,
            "plotly_src" => self
                .render
                .plotly_src
                .clone_from(&defaults.render.plotly_src),
            "node_pad" => self.render.node_pad = defaults.render.node_pad,
            "node_thickness" => self.render.node_thickness = defaults.render.node_thickness,
            "node_line_color" => self
                .render
                .node_line_color
                .clone_from(&defaults.render.node_line_color),
            "node_line_width" => self.render.node_line_width = defaults.render.node_line_width,
            "font_size" => self.render.font_size = defaults.render.font_size,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Reset all configuration to defaults
    ///
    /// Deletes the configuration file so the next [`load()`](Config::load)
    /// recreates it. Succeeds if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), ConfigError> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }

    /// Node and font settings for diagrams
    #[must_use]
    pub fn diagram_style(&self) -> DiagramStyle {
        DiagramStyle {
            node_pad: self.render.node_pad,
            node_thickness: self.render.node_thickness,
            node_line_color: self.render.node_line_color.clone(),
            node_line_width: self.render.node_line_width,
            font_size: self.render.font_size,
        }
    }

    /// Narrow CSV reading settings
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] if `encoding` is not supported.
    pub fn render_settings(&self) -> Result<RenderSettings, ConfigError> {
        let encoding = self
            .render
            .encoding
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "encoding".to_string(),
                value: self.render.encoding.clone(),
            })?;
        Ok(RenderSettings {
            encoding,
            aggregate: self.render.aggregate,
        })
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  output_file = \"{}\"", self.paths.output_file)?;
        writeln!(f, "  diagram_dir = \"{}\"", self.paths.diagram_dir)?;

        writeln!(f, "\n[render]")?;
        writeln!(f, "  encoding = \"{}\"", self.render.encoding)?;
        writeln!(f, "  aggregate = {}", self.render.aggregate)?;
        writeln!(f, "  open = {}", self.render.open)?;
        writeln!(f, "  plotly_src = \"{}\"", self.render.plotly_src)?;
        writeln!(f, "  node_pad = {}", self.render.node_pad)?;
        writeln!(f, "  node_thickness = {}", self.render.node_thickness)?;
        writeln!(f, "  node_line_color = \"{}\"", self.render.node_line_color)?;
        writeln!(f, "  node_line_width = {}", self.render.node_line_width)?;
        writeln!(f, "  font_size = {}", self.render.font_size)?;

        Ok(())
    }
}
