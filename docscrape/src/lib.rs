//! # docscrape
//!
//! Extracts the documentation blocks of abstract classes from TypeScript
//! sources into a single JavaScript artifact, so a documentation generator can
//! see the interface docs a compiler drops.
//!
//! A block is selected when it documents an abstract class (`@class` together
//! with `@abstract`), when it is the `@namespace` block pending before such a
//! class, or when it follows an abstract class without opening a new class or
//! namespace.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use docscrape::{extract_fs, ExtractConfig, SourceConfig};
//!
//! let mut sources = SourceConfig::default();
//! sources.paths = vec![PathBuf::from("src/core.ts"), PathBuf::from("src/interfaces.d.ts")];
//!
//! let report = extract_fs(&sources, &ExtractConfig::default()).unwrap();
//! println!("Blocks emitted: {}", report.blocks_emitted);
//! ```

mod artifact;
mod classify;
mod config;
mod error;
pub mod output;
mod report;
mod scanner;
mod strategy;

pub use artifact::{Artifact, BLOCK_SEPARATOR, SourceWriter};
pub use classify::{BlockKind, ClassContext, Emission};
pub use config::{
    DEFAULT_EXTENSION, DEFAULT_OUTPUT, ExtractConfig, FailurePolicy, NamespaceScope,
    SourceConfig, TagConfig,
};
pub use error::{ExtractError, SourceFailure, StructuralViolation, ViolationKind};
pub use report::ExtractReport;
pub use scanner::{DocBlock, Scanner, extract_blocks};
pub use strategy::fs::{has_source_suffix, read_file_bounded, resolve_sources};

use std::path::Path;

use tracing::{info, warn};

/// Why scanning a single source stopped early.
enum SourceStop {
    Violation(StructuralViolation),
    Write(std::io::Error),
}

impl From<StructuralViolation> for SourceStop {
    fn from(violation: StructuralViolation) -> Self {
        Self::Violation(violation)
    }
}

impl From<std::io::Error> for SourceStop {
    fn from(err: std::io::Error) -> Self {
        Self::Write(err)
    }
}

/// Outcome of one source: blocks appended, and the error that stopped it, if any.
struct SourceOutcome {
    emitted: usize,
    error: Option<ExtractError>,
}

/// Scan one source's content and append its selected blocks to `artifact`.
///
/// The artifact is held open in append mode for the duration of this call.
/// Blocks are written as they are selected, so on failure the blocks emitted
/// before the offending line stay in the artifact.
fn scan_into_artifact(
    content: &str,
    path: &Path,
    artifact: &Artifact,
    tags: &TagConfig,
    context: &mut ClassContext,
) -> SourceOutcome {
    let io_failure = |source: std::io::Error| ExtractError::Io {
        path: artifact.path().to_owned(),
        source,
    };

    let mut writer = match artifact.append_source() {
        Ok(w) => w,
        Err(e) => {
            return SourceOutcome {
                emitted: 0,
                error: Some(io_failure(e)),
            };
        }
    };

    let scanned = extract_blocks(content, tags, context, |block| {
        writer.write_block(block).map_err(SourceStop::from)
    });

    // Flush whatever was written, including blocks preceding a violation.
    // Blocks only count once the flush has put them on disk.
    let (emitted, flushed) = match writer.finish() {
        Ok(n) => (n, Ok(())),
        Err(e) => (0, Err(e)),
    };

    let error = match (scanned, flushed) {
        (Err(SourceStop::Violation(violation)), flushed) => {
            if let Err(e) = flushed {
                warn!(
                    output = %artifact.path().display(),
                    source = %path.display(),
                    "blocks emitted before the violation were lost: {e}"
                );
            }
            Some(ExtractError::Structural {
                path: path.to_owned(),
                violation,
            })
        }
        (Err(SourceStop::Write(e)), _) | (Ok(_), Err(e)) => Some(io_failure(e)),
        (Ok(_), Ok(())) => None,
    };

    SourceOutcome { emitted, error }
}

/// Extract abstract-class documentation blocks from source files on disk.
///
/// This is the primary public API. The artifact at `extract_config.output` is
/// truncated first, then every source resolved from `source_config` is scanned
/// in argument order and its selected blocks are appended.
///
/// # Errors
///
/// Returns an error if the artifact cannot be created or an exclude pattern is
/// invalid. Under `FailurePolicy::Abort` (the default) the first failing
/// source is also returned as an error, wrapping an [`ExtractError`]; blocks
/// appended before the failure are not rolled back. Under
/// `FailurePolicy::Isolate` failures are recorded in `report.failures`.
/// Directories that cannot be traversed during recursive expansion count as
/// failing sources and are settled before any source is scanned.
pub fn extract_fs(
    source_config: &SourceConfig,
    extract_config: &ExtractConfig,
) -> anyhow::Result<ExtractReport> {
    let artifact = Artifact::create(&extract_config.output).map_err(|source| ExtractError::Io {
        path: extract_config.output.clone(),
        source,
    })?;

    let resolved = resolve_sources(source_config)?;
    let mut report = ExtractReport::new(extract_config.output.clone());
    report.sources_skipped = resolved.skipped;

    // Discovery failures are settled before any source is scanned.
    for err in resolved.walk_errors {
        record_failure(&mut report, err, extract_config.failure_policy)?;
    }

    let mut context = ClassContext::new();

    for path in &resolved.files {
        if extract_config.namespace_scope == NamespaceScope::PerSource {
            context = ClassContext::new();
        }

        let outcome = match read_file_bounded(path, source_config.max_file_size) {
            Ok(content) => scan_into_artifact(
                &content,
                path,
                &artifact,
                &extract_config.tags,
                &mut context,
            ),
            Err(e) => SourceOutcome {
                emitted: 0,
                error: Some(e),
            },
        };
        report.blocks_emitted += outcome.emitted;

        let Some(err) = outcome.error else {
            info!(source = %path.display(), blocks = outcome.emitted, "processed source");
            report.sources_processed += 1;
            continue;
        };

        record_failure(&mut report, err, extract_config.failure_policy)?;
    }

    Ok(report)
}

/// Apply the failure policy: record under `Isolate`, return the error under `Abort`.
fn record_failure(
    report: &mut ExtractReport,
    err: ExtractError,
    policy: FailurePolicy,
) -> Result<(), ExtractError> {
    match policy {
        FailurePolicy::Isolate => {
            warn!("{err}");
            report.sources_failed += 1;
            report.failures.push(SourceFailure::from(&err));
            report.ok = false;
            Ok(())
        }
        FailurePolicy::Abort => Err(err),
    }
}
