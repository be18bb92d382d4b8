//! Documentation-block scanner.
//!
//! A line-oriented two-state machine that assembles `/** ... */` blocks.
//! Blocks never nest: a new block start while one is open, or any line that
//! is not a marker or `*` continuation inside an open block, is a
//! [`StructuralViolation`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::classify::ClassContext;
use crate::config::TagConfig;
use crate::error::{StructuralViolation, ViolationKind};

/// Start and end marker on the same line. Greedy, so the block runs to the
/// last `*/` on the line.
static SHORT_BLOCK: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"/\*\*.*\*/") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid short block regex: {err}"),
});

static BLOCK_START: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"/\*\*") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid block start regex: {err}"),
});

static BLOCK_END: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"\*/") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid block end regex: {err}"),
});

static CONTINUATION: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"^\s*\*") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid continuation regex: {err}"),
});

/// A completed documentation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    /// 1-based line number of the line holding the start marker.
    pub line: usize,
    /// Raw block text, from the start marker through the end marker.
    pub text: String,
}

/// What a single line looks like to the scanner, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineClass {
    /// Start and end marker on one line; holds the byte range of the block.
    ShortBlock(usize, usize),
    /// Start marker only; holds its byte offset.
    BlockStart(usize),
    /// End marker only; holds the byte offset just past it.
    BlockEnd(usize),
    Continuation,
    Other,
}

impl LineClass {
    fn of(line: &str) -> Self {
        if let Some(m) = SHORT_BLOCK.find(line) {
            Self::ShortBlock(m.start(), m.end())
        } else if let Some(m) = BLOCK_START.find(line) {
            Self::BlockStart(m.start())
        } else if let Some(m) = BLOCK_END.find(line) {
            Self::BlockEnd(m.end())
        } else if CONTINUATION.is_match(line) {
            Self::Continuation
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Default)]
enum ScannerState {
    #[default]
    Idle,
    AccumulatingBlock { start_line: usize, text: String },
}

/// Scanner state for one source. Create a fresh one per source.
#[derive(Debug, Default)]
pub struct Scanner {
    state: ScannerState,
    line_no: usize,
}

impl Scanner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a block is currently being accumulated.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ScannerState::AccumulatingBlock { .. })
    }

    /// Feed the next line, including its line terminator if it has one.
    /// Line terminators are kept verbatim; [`extract_blocks`] normalizes them
    /// before feeding.
    ///
    /// Returns the completed block when this line closes one.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralViolation`] when a block starts while another is
    /// open, or when a non-continuation line appears inside an open block.
    pub fn push_line(&mut self, line: &str) -> Result<Option<DocBlock>, StructuralViolation> {
        self.line_no += 1;
        let line_no = self.line_no;

        let (next, result) = match (LineClass::of(line), std::mem::take(&mut self.state)) {
            (
                LineClass::ShortBlock(..) | LineClass::BlockStart(_),
                open @ ScannerState::AccumulatingBlock { .. },
            ) => (
                open,
                Err(StructuralViolation::new(line_no, ViolationKind::NestedBlock, line)),
            ),
            // A closing line inside a block must still look like a continuation
            // (`*/`, ` * text */`); bare code before the marker is not comment text.
            (LineClass::BlockEnd(_), open @ ScannerState::AccumulatingBlock { .. })
                if !CONTINUATION.is_match(line) =>
            {
                (
                    open,
                    Err(StructuralViolation::new(line_no, ViolationKind::StrayLine, line)),
                )
            }
            (LineClass::Other, open @ ScannerState::AccumulatingBlock { .. }) => (
                open,
                Err(StructuralViolation::new(line_no, ViolationKind::StrayLine, line)),
            ),
            (LineClass::ShortBlock(start, end), ScannerState::Idle) => (
                ScannerState::Idle,
                Ok(Some(DocBlock {
                    line: line_no,
                    text: line[start..end].to_owned(),
                })),
            ),
            (LineClass::BlockStart(start), ScannerState::Idle) => (
                ScannerState::AccumulatingBlock {
                    start_line: line_no,
                    text: line[start..].to_owned(),
                },
                Ok(None),
            ),
            (LineClass::BlockEnd(end), ScannerState::AccumulatingBlock { start_line, mut text }) => {
                text.push_str(&line[..end]);
                (
                    ScannerState::Idle,
                    Ok(Some(DocBlock {
                        line: start_line,
                        text,
                    })),
                )
            }
            (LineClass::Continuation, ScannerState::AccumulatingBlock { start_line, mut text }) => {
                text.push_str(line);
                (
                    ScannerState::AccumulatingBlock { start_line, text },
                    Ok(None),
                )
            }
            (
                LineClass::BlockEnd(_) | LineClass::Continuation | LineClass::Other,
                ScannerState::Idle,
            ) => (ScannerState::Idle, Ok(None)),
        };

        self.state = next;
        result
    }

    /// End of input. Returns the unterminated block, if any, so the caller can
    /// report it; it is never classified.
    #[must_use]
    pub fn finish(self) -> Option<DocBlock> {
        match self.state {
            ScannerState::Idle => None,
            ScannerState::AccumulatingBlock { start_line, text } => Some(DocBlock {
                line: start_line,
                text,
            }),
        }
    }
}

/// Scan one source, classify each completed block against `context`, and
/// hand every selected block to `emit` as soon as it is selected.
///
/// Returns the number of blocks emitted. Blocks emitted before an error have
/// already been passed to `emit`.
///
/// # Errors
///
/// Returns the first [`StructuralViolation`] (converted into `E`), or the
/// first error returned by `emit`.
pub fn extract_blocks<F, E>(
    content: &str,
    tags: &TagConfig,
    context: &mut ClassContext,
    mut emit: F,
) -> Result<usize, E>
where
    F: FnMut(&DocBlock) -> Result<(), E>,
    E: From<StructuralViolation>,
{
    // Line endings are normalized to `\n` so the artifact never mixes
    // `\r\n` block interiors with `\n` separators.
    let normalized;
    let content = if content.contains('\r') {
        normalized = content.replace("\r\n", "\n").replace('\r', "\n");
        normalized.as_str()
    } else {
        content
    };

    let mut scanner = Scanner::new();
    let mut emitted = 0;

    for line in content.split_inclusive('\n') {
        let Some(block) = scanner.push_line(line)? else {
            continue;
        };
        for selected in context.accept(block, tags).into_blocks() {
            debug!(line = selected.line, "emitting block");
            emit(&selected)?;
            emitted += 1;
        }
    }

    if let Some(unterminated) = scanner.finish() {
        debug!(
            line = unterminated.line,
            "discarding block left open at end of input"
        );
    }

    Ok(emitted)
}
