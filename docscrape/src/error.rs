//! Error types for block extraction.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Which single-level nesting rule a source broke.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViolationKind {
    /// A block start (or a short-form block) appeared while a block was open.
    NestedBlock,
    /// A line that is neither a marker nor a continuation appeared inside a block.
    StrayLine,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NestedBlock => write!(f, "block opened while another block is open"),
            Self::StrayLine => write!(f, "non-comment line inside an open block"),
        }
    }
}

/// The comment structure of a source failed the single-level nesting assumption.
#[derive(Debug, Clone, Error, Serialize, PartialEq, Eq)]
#[error("line {line}: {kind}: {content:?}")]
#[non_exhaustive]
pub struct StructuralViolation {
    /// 1-based line number of the offending line.
    pub line: usize,
    /// The rule that was broken.
    pub kind: ViolationKind,
    /// The offending line, without its line terminator.
    pub content: String,
}

impl StructuralViolation {
    #[must_use]
    pub fn new(line: usize, kind: ViolationKind, content: &str) -> Self {
        Self {
            line,
            kind,
            content: content.trim_end_matches(['\r', '\n']).to_owned(),
        }
    }
}

/// Failure to extract blocks from one source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExtractError {
    /// The source broke the comment nesting rules.
    #[error("{}:{violation}", path.display())]
    Structural {
        path: PathBuf,
        #[source]
        violation: StructuralViolation,
    },

    /// Reading the source or writing the artifact failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not valid UTF-8.
    #[error("{}: file is not valid UTF-8", path.display())]
    InvalidEncoding { path: PathBuf },

    /// The source exceeds the configured size limit.
    #[error("{}: file exceeds maximum size of {limit} bytes", path.display())]
    FileTooLarge { path: PathBuf, limit: u64 },
}

impl ExtractError {
    /// The source the error belongs to.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Structural { path, .. }
            | Self::Io { path, .. }
            | Self::InvalidEncoding { path }
            | Self::FileTooLarge { path, .. } => path,
        }
    }

    /// Short machine-readable category, used in the JSON report.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Structural { .. } => "structural_violation",
            Self::Io { .. } => "io_error",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::FileTooLarge { .. } => "file_too_large",
        }
    }
}

/// A source that was abandoned under `FailurePolicy::Isolate`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct SourceFailure {
    /// The source path.
    pub file: PathBuf,
    /// Category from [`ExtractError::category`].
    pub kind: &'static str,
    /// Line of the structural violation, if that was the cause.
    pub line: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl SourceFailure {
    /// Format the failure for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}: {}", self.file.display(), line, self.message),
            None => format!("{}: {}", self.file.display(), self.message),
        }
    }
}

impl From<&ExtractError> for SourceFailure {
    fn from(err: &ExtractError) -> Self {
        let (line, message) = match err {
            ExtractError::Structural { violation, .. } => (
                Some(violation.line),
                format!("{}: {:?}", violation.kind, violation.content),
            ),
            ExtractError::Io { source, .. } => (None, source.to_string()),
            ExtractError::InvalidEncoding { .. } => (None, "file is not valid UTF-8".to_owned()),
            ExtractError::FileTooLarge { limit, .. } => {
                (None, format!("file exceeds maximum size of {limit} bytes"))
            }
        };
        Self {
            file: err.path().clone(),
            kind: err.category(),
            line,
            message,
        }
    }
}
