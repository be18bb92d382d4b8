use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use colored::Colorize;
use docscrape::{
    DEFAULT_EXTENSION, DEFAULT_OUTPUT, ExtractConfig, ExtractReport, FailurePolicy,
    NamespaceScope, SourceConfig, TagConfig, extract_fs, output,
};

use crate::logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Reset the pending namespace and class context for every source
    PerSource,
    /// Keep the pending namespace and class context across sources
    Run,
}

impl From<ScopeArg> for NamespaceScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::PerSource => Self::PerSource,
            ScopeArg::Run => Self::Run,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Collect the doc comments of abstract classes from TypeScript sources
#[derive(Debug, Parser)]
#[command(name = "docscrape", version, about, long_about = None)]
pub struct Cli {
    /// Source files, processed in the given order. Arguments without a
    /// recognized suffix are skipped.
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<PathBuf>,

    /// Aggregate output file, truncated at start
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Recognized source suffix (repeatable)
    #[arg(short = 'e', long = "extension", value_name = "EXT", action = ArgAction::Append, default_value = DEFAULT_EXTENSION)]
    pub extensions: Vec<String>,

    /// Expand directory arguments into the sources they contain
    #[arg(short, long)]
    pub recursive: bool,

    /// Glob of files to leave out of recursive expansion (repeatable)
    #[arg(long, value_name = "GLOB", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// How long a pending @namespace block stays attached
    #[arg(long, value_enum, default_value_t = ScopeArg::PerSource)]
    pub namespace_scope: ScopeArg,

    /// Report failing sources and continue instead of stopping at the first one
    #[arg(long)]
    pub keep_going: bool,

    /// Tag marking namespace blocks
    #[arg(long, value_name = "TAG", default_value = "@namespace")]
    pub namespace_tag: String,

    /// Tag marking class blocks
    #[arg(long, value_name = "TAG", default_value = "@class")]
    pub class_tag: String,

    /// Tag marking a class as abstract
    #[arg(long, value_name = "TAG", default_value = "@abstract")]
    pub abstract_tag: String,

    /// Summary format
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Do not print a summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    #[must_use]
    pub fn source_config(&self) -> SourceConfig {
        let mut config = SourceConfig::default();
        config.paths.clone_from(&self.sources);
        config.extensions.clone_from(&self.extensions);
        config.recursive = self.recursive;
        config.exclude.clone_from(&self.exclude);
        config
    }

    #[must_use]
    pub fn extract_config(&self) -> ExtractConfig {
        let mut tags = TagConfig::default();
        tags.namespace.clone_from(&self.namespace_tag);
        tags.class.clone_from(&self.class_tag);
        tags.abstract_marker.clone_from(&self.abstract_tag);

        let mut config = ExtractConfig::default();
        config.output.clone_from(&self.output);
        config.tags = tags;
        config.namespace_scope = self.namespace_scope.into();
        config.failure_policy = if self.keep_going {
            FailurePolicy::Isolate
        } else {
            FailurePolicy::Abort
        };
        config
    }
}

/// Parse process arguments, set up logging, and run the extraction.
///
/// # Errors
/// Returns an error if the run aborts or any source failed under `--keep-going`.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    execute(&cli, &mut std::io::stdout())
}

/// Run the extraction described by `cli`, writing the summary to `out`.
///
/// # Errors
/// Returns an error if the run aborts, the summary cannot be written, or any
/// source failed under `--keep-going`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let report = extract_fs(&cli.source_config(), &cli.extract_config())?;

    if !cli.quiet {
        match cli.format {
            OutputFormat::Json => output::write_json(&report, out)?,
            OutputFormat::Human => {
                output::write_human(&report, out)?;
                writeln!(out, "{}", status_line(&report))?;
            }
        }
    }

    if !report.ok {
        bail!(
            "{} of {} source(s) could not be processed",
            report.sources_failed,
            report.sources_attempted()
        );
    }
    Ok(())
}

fn status_line(report: &ExtractReport) -> String {
    if report.ok {
        format!(
            "\u{2713} {} block(s) from {} source(s) written to {}",
            report.blocks_emitted,
            report.sources_processed,
            report.output.display()
        )
        .green()
        .to_string()
    } else {
        format!("\u{2717} {} source(s) failed", report.sources_failed)
            .red()
            .to_string()
    }
}
