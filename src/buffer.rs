use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A file split on `'\n'`.
///
/// Trailing empty segments are kept as lines of their own, so a file ending
/// in a newline (or several) renders back to exactly the same bytes. Line
/// numbers are 1-based and count those trailing segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBuffer {
    path: PathBuf,
    lines: Vec<String>,
}

impl FileBuffer {
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            lines: content.split('\n').map(str::to_string).collect(),
        }
    }

    /// Sources must be UTF-8; anything else is refused rather than rewritten lossily.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| with_path(e, path))?;
        let content = String::from_utf8(bytes).map_err(|e| Error::Encoding {
            path: path.to_path_buf(),
            reason: e.utf8_error().to_string(),
        })?;
        Ok(Self::parse(path, &content))
    }

    pub fn write(&self) -> Result<()> {
        std::fs::write(&self.path, self.render()).map_err(|e| with_path(e, &self.path))?;
        Ok(())
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, line: usize) -> Result<&str> {
        let idx = self.index(line)?;
        Ok(&self.lines[idx])
    }

    /// Overwrite one line. A `'\r'` ending on the old line survives the edit.
    pub fn replace(&mut self, line: usize, content: &str) -> Result<()> {
        let idx = self.index(line)?;
        let mut content = content.to_string();
        if self.lines[idx].ends_with('\r') && !content.ends_with('\r') {
            content.push('\r');
        }
        self.lines[idx] = content;
        Ok(())
    }

    pub fn remove(&mut self, line: usize) -> Result<String> {
        let idx = self.index(line)?;
        Ok(self.lines.remove(idx))
    }

    fn index(&self, line: usize) -> Result<usize> {
        if line == 0 || line > self.lines.len() {
            return Err(Error::LineOutOfRange {
                path: self.path.clone(),
                line,
                len: self.lines.len(),
            });
        }
        Ok(line - 1)
    }
}

pub(crate) fn with_path(err: io::Error, path: &Path) -> Error {
    Error::Io(io::Error::new(
        err.kind(),
        format!("{}: {err}", path.display()),
    ))
}
