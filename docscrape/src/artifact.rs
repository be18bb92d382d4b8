//! The aggregate output artifact.
//!
//! Truncated once when a run starts, then opened in append mode for each
//! source in turn. Every emitted block is written as its raw text followed by
//! a single newline.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::scanner::DocBlock;

/// Separator written after every emitted block.
pub const BLOCK_SEPARATOR: &str = "\n";

#[derive(Debug)]
pub struct Artifact {
    path: PathBuf,
}

impl Artifact {
    /// Truncate (or create) the artifact at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be created.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the artifact for one source. The file is closed when the returned
    /// writer is finished or dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened for appending.
    pub fn append_source(&self) -> std::io::Result<SourceWriter> {
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        Ok(SourceWriter {
            out: BufWriter::new(file),
            written: 0,
        })
    }
}

/// Append handle held for the duration of one source.
#[derive(Debug)]
pub struct SourceWriter {
    out: BufWriter<File>,
    written: usize,
}

impl SourceWriter {
    /// Append one block and its separator.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_block(&mut self, block: &DocBlock) -> std::io::Result<()> {
        self.out.write_all(block.text.as_bytes())?;
        self.out.write_all(BLOCK_SEPARATOR.as_bytes())?;
        self.written += 1;
        Ok(())
    }

    /// Flush and close, returning the number of blocks written.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    pub fn finish(mut self) -> std::io::Result<usize> {
        self.out.flush()?;
        Ok(self.written)
    }
}
