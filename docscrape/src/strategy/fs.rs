//! Filesystem source discovery.
//!
//! Arguments are resolved strictly in the order given. A file argument is a
//! source when its name ends with a recognized suffix; anything else is
//! skipped. Directory arguments are only expanded when `recursive` is set, in
//! which case their matching files are inserted in place, sorted.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::SourceConfig;
use crate::error::ExtractError;

/// Directories never entered during recursive expansion.
pub const SKIP_DIRS: &[&str] = &["node_modules", ".git", "target", "bower_components"];

/// Sources resolved from the argument list.
#[derive(Debug, Default)]
pub struct ResolvedSources {
    /// Sources in processing order.
    pub files: Vec<PathBuf>,
    /// Arguments (or walked entries) that were not recognized sources.
    pub skipped: usize,
    /// Directory traversal failures (permission denied, loops). These are
    /// never silently discarded; the run treats each as a failed source.
    pub walk_errors: Vec<ExtractError>,
}

/// Check if a path matches any of the exclude patterns, by full path or file name.
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be entered (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Check whether the path ends with one of the recognized suffixes.
/// Suffixes given without a leading dot are treated as if they had one.
#[must_use]
pub fn has_source_suffix(path: &Path, extensions: &[String]) -> bool {
    let name = path.to_string_lossy();
    extensions.iter().any(|ext| {
        if ext.starts_with('.') {
            name.ends_with(ext.as_str())
        } else {
            name.ends_with(&format!(".{ext}"))
        }
    })
}

fn expand_dir(
    root: &Path,
    config: &SourceConfig,
    exclude_patterns: &[Pattern],
    resolved: &mut ResolvedSources,
) {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(is_not_skip_dir) {
        let entry = match entry {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                warn!(path = %path.display(), "directory traversal error: {walk_err}");
                resolved.walk_errors.push(ExtractError::Io {
                    path,
                    source: walk_err.into(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !has_source_suffix(path, &config.extensions) || matches_exclude(path, exclude_patterns) {
            debug!(path = %path.display(), "skipping non-source file");
            resolved.skipped += 1;
            continue;
        }
        found.push(path.to_path_buf());
    }
    found.sort();
    resolved.files.extend(found);
}

/// Resolve the configured arguments into the ordered list of sources.
///
/// # Errors
///
/// Returns an error if an exclude pattern is not a valid glob.
pub fn resolve_sources(config: &SourceConfig) -> anyhow::Result<ResolvedSources> {
    let exclude_patterns = config
        .exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid exclude glob pattern '{p}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut resolved = ResolvedSources::default();
    for arg in &config.paths {
        if has_source_suffix(arg, &config.extensions) {
            resolved.files.push(arg.clone());
        } else if config.recursive && arg.is_dir() {
            expand_dir(arg, config, &exclude_patterns, &mut resolved);
        } else {
            debug!(arg = %arg.display(), "skipping argument without a source suffix");
            resolved.skipped += 1;
        }
    }
    Ok(resolved)
}

/// Read a source using a bounded read, enforcing `max_file_size`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, exceeds
/// `max_file_size`, or is not valid UTF-8.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<String, ExtractError> {
    let io_err = |source| ExtractError::Io {
        path: path.to_owned(),
        source,
    };
    let file = std::fs::File::open(path).map_err(io_err)?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(io_err)?;

    if buffer.len() as u64 > max_file_size {
        return Err(ExtractError::FileTooLarge {
            path: path.to_owned(),
            limit: max_file_size,
        });
    }

    String::from_utf8(buffer).map_err(|_| ExtractError::InvalidEncoding {
        path: path.to_owned(),
    })
}
