//! Shared output formatting for extraction reports.
//!
//! Provides JSON and plain-text formatters for `ExtractReport`.
//! Color/terminal formatting belongs to the CLI layer.

use std::io::Write;

use crate::report::ExtractReport;

/// Format an `ExtractReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ExtractReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format an `ExtractReport` as human-readable plain text to a writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ExtractReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer, "  Output:             {}", report.output.display())?;
    writeln!(writer, "  Sources processed:  {}", report.sources_processed)?;
    writeln!(writer, "  Arguments skipped:  {}", report.sources_skipped)?;
    writeln!(writer, "  Blocks emitted:     {}", report.blocks_emitted)?;

    if !report.failures.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "  Failed sources:     {}", report.sources_failed)?;
        for failure in &report.failures {
            writeln!(writer, "    {}", failure.format_human_readable())?;
        }
    }

    Ok(())
}
