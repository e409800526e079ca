use super::parsers::{parse_alpinefmt_toml, parse_pyproject_toml};
use super::{Config, ConfigError};
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence within one directory.
pub const CONFIG_FILES: &[&str] = &[".alpinefmt.toml", "alpinefmt.toml", "pyproject.toml"];

/// Prevent runaway traversal on odd filesystems
const MAX_DEPTH: usize = 100;

/// Load configuration.
///
/// An explicit path always wins. Otherwise, unless `no_config` is set, the
/// nearest config file above `start_dir` is used. Falls back to defaults.
/// Returns the config and the file it came from.
pub fn load_config(
    explicit: Option<&Path>,
    no_config: bool,
    start_dir: &Path,
) -> Result<(Config, Option<PathBuf>), ConfigError> {
    if let Some(path) = explicit {
        log::debug!("[alpinefmt-config] Loading explicit config: {}", path.display());
        let config = load_config_file(path)?.unwrap_or_default();
        return Ok((config, Some(path.to_path_buf())));
    }

    if no_config {
        log::debug!("[alpinefmt-config] Config discovery disabled, using defaults");
        return Ok((Config::default(), None));
    }

    match discover_config_upward(start_dir) {
        Some(path) => {
            let config = load_config_file(&path)?.unwrap_or_default();
            Ok((config, Some(path)))
        }
        None => {
            log::debug!("[alpinefmt-config] No config file found, using defaults");
            Ok((Config::default(), None))
        }
    }
}

/// Read and parse one config file. `Ok(None)` for a pyproject.toml without `[tool.alpinefmt]`.
fn load_config_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    let display_path = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        source,
        path: display_path.clone(),
    })?;

    if path.file_name().is_some_and(|name| name == "pyproject.toml") {
        parse_pyproject_toml(&content, &display_path)
    } else {
        parse_alpinefmt_toml(&content, &display_path).map(Some)
    }
}

/// Find the nearest config file at or above `start_dir`.
///
/// The search stops at the first directory containing `.git`, so a config
/// outside the current repository is never picked up.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if depth >= MAX_DEPTH {
            log::debug!("[alpinefmt-config] Maximum traversal depth reached");
            return None;
        }

        log::debug!("[alpinefmt-config] Searching for config in: {}", current_dir.display());

        for config_name in CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if !config_path.is_file() {
                continue;
            }

            // pyproject.toml only counts when it configures us
            if *config_name == "pyproject.toml" {
                match std::fs::read_to_string(&config_path) {
                    Ok(content) if content.contains("tool.alpinefmt") => {}
                    _ => {
                        log::debug!("[alpinefmt-config] Found pyproject.toml but no [tool.alpinefmt] section");
                        continue;
                    }
                }
            }

            log::debug!("[alpinefmt-config] Found config file: {}", config_path.display());
            return Some(config_path);
        }

        if current_dir.join(".git").exists() {
            log::debug!("[alpinefmt-config] Stopping at .git directory");
            return None;
        }

        match current_dir.parent() {
            Some(parent) => {
                current_dir = parent.to_owned();
                depth += 1;
            }
            None => {
                log::debug!("[alpinefmt-config] Reached filesystem root");
                return None;
            }
        }
    }
}
