//! Template discovery: explicit files, directory walks, ignore rules and extension filtering.

use crate::config::Config;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use ignore::types::TypesBuilder;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{path} does not exist.")]
    InvalidPath { path: String },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern { pattern: String, source: ignore::Error },

    #[error("Invalid file extension '{extension}': {source}")]
    InvalidExtension { extension: String, source: ignore::Error },
}

/// What to collect and what to leave out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    /// Glob patterns, matched like .gitignore entries
    pub exclude: Vec<String>,
    pub respect_gitignore: bool,
}

impl From<&Config> for DiscoveryOptions {
    fn from(config: &Config) -> Self {
        Self {
            extensions: config.normalized_extensions(),
            exclude: config.exclude.clone(),
            respect_gitignore: config.respect_gitignore,
        }
    }
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Whether `path` has one of the supported extensions.
pub fn should_process(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Expands directory-style patterns to also match files within them.
/// Pattern "dir/path" becomes ["dir/path", "dir/path/**"].
///
/// Patterns containing glob characters (*, ?, [) are returned unchanged.
fn expand_directory_pattern(pattern: &str) -> Vec<String> {
    if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
        return vec![pattern.to_string()];
    }

    let base = pattern.trim_end_matches('/');
    vec![base.to_string(), format!("{base}/**")]
}

/// Collect every template under `paths`.
///
/// Explicit files are kept when their extension is supported; ignore rules and
/// excludes only apply to files found by walking a directory. A path that does
/// not exist is an error. The result is sorted and free of duplicates.
pub fn find_template_files(paths: &[PathBuf], options: &DiscoveryOptions) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut files = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(DiscoveryError::InvalidPath {
                path: path.display().to_string(),
            });
        }

        if path.is_file() {
            if should_process(path, &options.extensions) {
                files.push(path.clone());
            } else {
                log::debug!("[alpinefmt-discovery] Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            walk_directory(path, options, &mut files)?;
        }
    }

    files.sort();
    files.dedup();
    log::debug!("[alpinefmt-discovery] Found {} template files", files.len());

    Ok(files)
}

fn walk_directory(dir: &Path, options: &DiscoveryOptions, files: &mut Vec<PathBuf>) -> Result<(), DiscoveryError> {
    let mut walk_builder = WalkBuilder::new(dir);

    // .gitignore files apply from the directory and its parents, with or without a repository
    walk_builder
        .git_ignore(options.respect_gitignore)
        .git_global(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .require_git(false)
        .parents(true);

    let mut types_builder = TypesBuilder::new();
    for ext in &options.extensions {
        types_builder
            .add("template", &format!("*.{ext}"))
            .map_err(|source| DiscoveryError::InvalidExtension {
                extension: ext.clone(),
                source,
            })?;
    }
    types_builder.select("template");
    let types = types_builder.build().map_err(|source| DiscoveryError::InvalidExtension {
        extension: options.extensions.join(","),
        source,
    })?;
    walk_builder.types(types);

    if !options.exclude.is_empty() {
        let mut override_builder = OverrideBuilder::new(dir);
        for pattern in &options.exclude {
            for expanded in expand_directory_pattern(pattern) {
                override_builder
                    .add(&format!("!{expanded}"))
                    .map_err(|source| DiscoveryError::InvalidPattern {
                        pattern: pattern.clone(),
                        source,
                    })?;
            }
        }
        let overrides = override_builder.build().map_err(|source| DiscoveryError::InvalidPattern {
            pattern: options.exclude.join(","),
            source,
        })?;
        walk_builder.overrides(overrides);
    }

    for entry in walk_builder.build() {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_file()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("[alpinefmt-discovery] Skipping unreadable entry: {e}"),
        }
    }

    Ok(())
}
