//! Configuration types for block extraction.
//!
//! Split into extraction config (how blocks are selected and where they go)
//! and source config (how input files are discovered). The scanner itself
//! never sees filesystem concerns.

use std::path::PathBuf;

/// Default location of the aggregate output artifact.
pub const DEFAULT_OUTPUT: &str = "all_interfaces.js";

/// Default recognized source suffix.
pub const DEFAULT_EXTENSION: &str = ".ts";

/// Doc tags used to classify completed blocks.
///
/// Matching is plain substring containment over the whole block text, so
/// `@class` also matches inside `@classdesc`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TagConfig {
    /// Marks a namespace block (default `@namespace`).
    pub namespace: String,
    /// Marks a class block (default `@class`).
    pub class: String,
    /// Marks a class block as abstract (default `@abstract`).
    pub abstract_marker: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            namespace: "@namespace".to_owned(),
            class: "@class".to_owned(),
            abstract_marker: "@abstract".to_owned(),
        }
    }
}

/// How long a pending namespace block and the "inside abstract class" flag live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum NamespaceScope {
    /// Class context is reset at the start of every source (default).
    #[default]
    PerSource,
    /// Class context carries over from one source to the next, so a namespace
    /// declared in one file can be attached to an abstract class in a later one.
    Run,
}

/// What to do when a source cannot be scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum FailurePolicy {
    /// Stop the whole run at the first failing source (default).
    #[default]
    Abort,
    /// Record the failure in the report and continue with the next source.
    Isolate,
}

/// Extraction config: selection rules and the output artifact.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ExtractConfig {
    /// Path of the aggregate output artifact. Truncated once per run.
    pub output: PathBuf,
    /// Tags used for classification.
    pub tags: TagConfig,
    /// Lifetime of the class context across sources.
    pub namespace_scope: NamespaceScope,
    /// Behavior on structural violations and read failures.
    pub failure_policy: FailurePolicy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            tags: TagConfig::default(),
            namespace_scope: NamespaceScope::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Filesystem source options.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct SourceConfig {
    /// Source arguments in processing order. May be empty.
    pub paths: Vec<PathBuf>,
    /// Recognized filename suffixes (default: `.ts`). Suffix match, so `.d.ts` qualifies.
    pub extensions: Vec<String>,
    /// Expand directory arguments into their matching files.
    /// When `false`, directories are skipped like any other non-matching argument.
    pub recursive: bool,
    /// Exclude patterns (glob format), applied during recursive expansion.
    pub exclude: Vec<String>,
    /// Maximum source size in bytes (default: 10 MB).
    pub max_file_size: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            extensions: vec![DEFAULT_EXTENSION.to_owned()],
            recursive: false,
            exclude: Vec::new(),
            max_file_size: 10_485_760,
        }
    }
}
