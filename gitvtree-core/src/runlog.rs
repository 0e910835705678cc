use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, Result};

/// Append-only record of every raw query block, labelled by section,
/// so a run can be inspected or replayed by hand.
pub struct RunLog<W = File> {
    writer: W,
    path: Option<PathBuf>,
}

impl RunLog<File> {
    /// Create (or truncate) the log file for a new run
    pub fn create(path: &Path) -> Result<Self> {
        let writer = File::create(path).map_err(|e| CoreError::io(path, e))?;
        Ok(Self {
            writer,
            path: Some(path.to_path_buf()),
        })
    }
}

impl<W: Write> RunLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, path: None }
    }

    /// Write `[section]` followed by the block
    pub fn append_section(&mut self, section: &str, block: &str) -> Result<()> {
        self.write_section(section, block).map_err(|e| self.error(e))
    }

    fn write_section(&mut self, section: &str, block: &str) -> io::Result<()> {
        writeln!(self.writer, "[{section}]")?;
        writeln!(self.writer, "{}", block.trim_end_matches(['\r', '\n']))?;
        self.writer.flush()
    }

    fn error(&self, source: io::Error) -> CoreError {
        CoreError::io(self.path.clone().unwrap_or_default(), source)
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
