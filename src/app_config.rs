use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::segmentation::engine::EngineOptions;
use crate::segmentation::patterns::{PatternLibrary, PatternTable};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Marker recognition rules
    #[serde(default)]
    pub patterns: PatternTable,

    /// Classification engine options
    #[serde(default)]
    pub segmentation: EngineOptions,

    /// Input loading options
    #[serde(default)]
    pub input: InputConfig,

    /// Output options
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Rendering format for segmented documents
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    // @format: Human-readable report
    #[default]
    Text,
    // @format: Pretty-printed JSON
    Json,
}

impl OutputFormat {
    // @returns: Default file extension for the format
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Text => "qa.txt",
            Self::Json => "qa.json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(anyhow!("Invalid output format: {}", s)),
        }
    }
}

/// Input loading configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InputConfig {
    // @field: Page files read at the same time
    #[serde(default = "default_concurrency")]
    pub read_concurrency: usize,

    // @field: Documents segmented at the same time in batch mode
    #[serde(default = "default_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            read_concurrency: default_concurrency(),
            batch_concurrency: default_concurrency(),
        }
    }
}

/// Output configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct OutputConfig {
    // @field: Rendering format
    #[serde(default)]
    pub format: OutputFormat,

    // @field: Output file extension, empty for the format default
    #[serde(default)]
    pub extension: String,
}

impl OutputConfig {
    pub fn extension(&self) -> &str {
        if self.extension.is_empty() {
            self.format.default_extension()
        } else {
            self.extension.trim_start_matches('.')
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_concurrency() -> usize {
    4
}

impl Config {
    /// Configuration reproducing the original OCR script: every heuristic on
    pub fn original_heuristics() -> Self {
        Config {
            segmentation: EngineOptions::original_heuristics(),
            ..Config::default()
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Compiling the table is the only complete check of a rule
        self.pattern_library()?;

        if self.input.read_concurrency == 0 {
            return Err(anyhow!("input.read_concurrency must be at least 1"));
        }

        if self.input.batch_concurrency == 0 {
            return Err(anyhow!("input.batch_concurrency must be at least 1"));
        }

        if self.output.extension().is_empty() {
            return Err(anyhow!("output.extension must not be empty"));
        }

        Ok(())
    }

    /// Compile the configured pattern table
    pub fn pattern_library(&self) -> Result<PatternLibrary> {
        PatternLibrary::new(&self.patterns).context("Invalid pattern table")
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the file if it exists, otherwise write and return the default configuration.
    /// The boolean is true when a default file was created.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            return Ok((Self::from_file(path)?, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            patterns: PatternTable::builtin(),
            segmentation: EngineOptions::default(),
            input: InputConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
