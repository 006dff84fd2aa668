use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::buffer::{FileBuffer, with_path};
use crate::error::Result;

/// Overwrite line `line` of `path` with `content`. The line count is unchanged
/// unless `content` itself spans several lines.
pub fn replace_line(path: &Path, line: usize, content: &str) -> Result<()> {
    let mut buffer = FileBuffer::read(path)?;
    buffer.replace(line, content)?;
    buffer.write()?;
    debug!(path = %path.display(), line, "replaced line");
    Ok(())
}

/// Delete line `line` of `path`. Later lines of the same file move up by one.
pub fn remove_line(path: &Path, line: usize) -> Result<String> {
    let mut buffer = FileBuffer::read(path)?;
    let removed = buffer.remove(line)?;
    buffer.write()?;
    debug!(path = %path.display(), line, "removed line");
    Ok(removed)
}

/// Append `content` as a new last line of `path`, creating the file if needed.
pub fn append_line(path: &Path, content: &str) -> Result<()> {
    let needs_separator = match std::fs::read(path) {
        Ok(bytes) => bytes.last().is_some_and(|&b| b != b'\n'),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(with_path(e, path)),
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| with_path(e, path))?;

    let mut text = String::with_capacity(content.len() + 2);
    if needs_separator {
        text.push('\n');
    }
    text.push_str(content);
    text.push('\n');
    file.write_all(text.as_bytes())
        .map_err(|e| with_path(e, path))?;

    debug!(path = %path.display(), "appended line");
    Ok(())
}
