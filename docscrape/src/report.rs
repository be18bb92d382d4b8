//! Extraction report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::SourceFailure;

/// Result of an extraction run.
///
/// Only populated with `failures` under `FailurePolicy::Isolate`; with the
/// default `Abort` policy the first failure ends the run as an error instead.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ExtractReport {
    /// Path of the aggregate output artifact.
    pub output: PathBuf,
    /// Sources scanned to completion.
    pub sources_processed: usize,
    /// Arguments skipped because they are not recognized sources.
    pub sources_skipped: usize,
    /// Sources abandoned after a failure.
    pub sources_failed: usize,
    /// Blocks appended to the artifact, including those appended by failed
    /// sources before their failure.
    pub blocks_emitted: usize,
    /// One entry per failed source.
    pub failures: Vec<SourceFailure>,
    /// Whether every source was processed without failure.
    pub ok: bool,
}

impl ExtractReport {
    #[must_use]
    pub fn new(output: PathBuf) -> Self {
        Self {
            output,
            sources_processed: 0,
            sources_skipped: 0,
            sources_failed: 0,
            blocks_emitted: 0,
            failures: Vec::new(),
            ok: true,
        }
    }

    /// Total number of sources attempted (processed + failed).
    #[must_use]
    pub fn sources_attempted(&self) -> usize {
        self.sources_processed + self.sources_failed
    }
}
