//! Configuration for alpinefmt.
//!
//! Settings come from `.alpinefmt.toml`, `alpinefmt.toml`, or the
//! `[tool.alpinefmt]` table of `pyproject.toml`, discovered by walking up from
//! the working directory, or from an explicit `--config` path.

mod loading;
mod parsers;

pub use loading::{CONFIG_FILES, discover_config_upward, load_config};
pub use parsers::{parse_alpinefmt_toml, parse_pyproject_toml};

use crate::beautifier::{BeautifierConfig, ToolDefinition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// What to do with a file whose expressions could not be formatted.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OnError {
    /// Stop processing and exit with an error
    #[default]
    Fail,
    /// Leave the file untouched and continue silently
    Skip,
    /// Leave the file untouched, report it, and continue
    Warn,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// File extensions to format, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns for files and directories to skip
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Honour .gitignore files when scanning directories
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    #[serde(default)]
    pub on_error: OnError,

    #[serde(default)]
    pub beautifier: BeautifierConfig,

    /// Custom tool definitions (override built-ins)
    #[serde(default)]
    pub tools: HashMap<String, ToolDefinition>,
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string(), "jinja".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            exclude: Vec::new(),
            respect_gitignore: true,
            on_error: OnError::default(),
            beautifier: BeautifierConfig::default(),
            tools: HashMap::new(),
        }
    }
}

impl Config {
    /// Extensions with any leading dots removed.
    pub fn normalized_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError { path: String, message: String },

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

const DEFAULT_CONFIG: &str = r#"# alpinefmt configuration

# File extensions to format
extensions = ["html", "jinja"]

# Files and directories to skip (glob patterns)
exclude = [
    "node_modules",
    "vendor",
    "dist",
]

# Respect .gitignore files when scanning directories (default: true)
respect-gitignore = true

# What to do when an expression cannot be formatted: "fail", "skip" or "warn"
on-error = "fail"

[beautifier]
# Built-in tools: "js-beautify", "prettier"
tool = "js-beautify"
# Milliseconds per expression, 0 disables the timeout
timeout = 30000

# Define your own tool (reads the expression on stdin, prints the result):
# [tools.my-formatter]
# command = ["my-formatter", "--stdin"]
"#;

/// Write a commented default configuration to `path`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::FileExists {
            path: path.display().to_string(),
        });
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|source| ConfigError::IoError {
        source,
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["html", "jinja"]);
        assert!(config.exclude.is_empty());
        assert!(config.respect_gitignore);
        assert_eq!(config.on_error, OnError::Fail);
        assert_eq!(config.beautifier.tool, "js-beautify");
    }

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config = parse_alpinefmt_toml(DEFAULT_CONFIG, "default").unwrap();
        assert_eq!(config.extensions, Config::default().extensions);
        assert_eq!(config.exclude, vec!["node_modules", "vendor", "dist"]);
        assert_eq!(config.beautifier, BeautifierConfig::default());
    }

    #[test]
    fn test_normalized_extensions() {
        let config = Config {
            extensions: vec![".html".to_string(), "njk".to_string(), ".".to_string()],
            ..Default::default()
        };
        assert_eq!(config.normalized_extensions(), vec!["html", "njk"]);
    }

    #[test]
    fn test_create_default_config() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(".alpinefmt.toml");

        create_default_config(&path).unwrap();
        assert!(path.exists());

        let err = create_default_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::FileExists { .. }));
    }
}
