use super::{Config, ConfigError};
use serde::Deserialize;

const KNOWN_KEYS: &[&str] = &[
    "extensions",
    "exclude",
    "respect-gitignore",
    "on-error",
    "beautifier",
    "tools",
];

/// Parse an `.alpinefmt.toml` / `alpinefmt.toml` file.
pub fn parse_alpinefmt_toml(content: &str, display_path: &str) -> Result<Config, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: display_path.to_string(),
        message: e.to_string(),
    })?;

    config_from_table(table, display_path)
}

/// Parse the `[tool.alpinefmt]` table of a `pyproject.toml`.
///
/// Returns `Ok(None)` when the file has no such table.
pub fn parse_pyproject_toml(content: &str, display_path: &str) -> Result<Option<Config>, ConfigError> {
    let mut doc: toml::Table = toml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: display_path.to_string(),
        message: e.to_string(),
    })?;

    let section = doc
        .get_mut("tool")
        .and_then(|tool| tool.as_table_mut())
        .and_then(|tool| tool.remove("alpinefmt"));

    match section {
        Some(toml::Value::Table(table)) => config_from_table(table, display_path).map(Some),
        Some(_) => Err(ConfigError::ParseError {
            path: display_path.to_string(),
            message: "[tool.alpinefmt] must be a table".to_string(),
        }),
        None => Ok(None),
    }
}

fn config_from_table(table: toml::Table, display_path: &str) -> Result<Config, ConfigError> {
    for key in table.keys() {
        // snake_case spellings are accepted for pyproject users
        if !KNOWN_KEYS.contains(&key.replace('_', "-").as_str()) {
            log::warn!("[alpinefmt-config] Unknown key in {display_path}: {key}");
        }
    }

    let normalized: toml::Table = table
        .into_iter()
        .map(|(key, value)| (key.replace('_', "-"), value))
        .collect();

    Config::deserialize(toml::Value::Table(normalized)).map_err(|e| ConfigError::ParseError {
        path: display_path.to_string(),
        message: e.to_string(),
    })
}
