use std::path::Path;

use crate::buffer::FileBuffer;
use crate::error::Result;

/// The offending line plus the numbered lines around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    pub target_line: String,
    pub window: Vec<(usize, String)>,
}

impl ContextWindow {
    /// Rows formatted as `line     5:text`.
    pub fn rendered_lines(&self) -> Vec<String> {
        self.window
            .iter()
            .map(|(n, text)| format!("line {n:>5}:{text}"))
            .collect()
    }

    pub fn render(&self) -> String {
        self.rendered_lines().join("\n")
    }
}

/// Read `path` and collect line `line` with `radius` lines on either side,
/// clipped to the file.
pub fn extract(path: &Path, line: usize, radius: usize) -> Result<ContextWindow> {
    let buffer = FileBuffer::read(path)?;
    window_from(&buffer, line, radius)
}

pub fn window_from(buffer: &FileBuffer, line: usize, radius: usize) -> Result<ContextWindow> {
    let target_line = buffer.line(line)?.to_string();

    let start = line.saturating_sub(radius).max(1);
    let end = line.saturating_add(radius).min(buffer.len());
    let window = (start..=end)
        .map(|n| (n, buffer.lines()[n - 1].clone()))
        .collect();

    Ok(ContextWindow {
        target_line,
        window,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn license() -> FileBuffer {
        let text: Vec<String> = (1..=20).map(|n| format!("row {n}")).collect();
        FileBuffer::parse("LICENSE", &format!("{}\n", text.join("\n")))
    }

    #[test]
    fn test_single_line_window() {
        let ctx = window_from(&license(), 5, 0).unwrap();
        assert_eq!(ctx.target_line, "row 5");
        assert_eq!(ctx.rendered_lines(), vec!["line     5:row 5"]);
    }

    #[test]
    fn test_window_with_radius() {
        let ctx = window_from(&license(), 5, 1).unwrap();
        assert_eq!(
            ctx.rendered_lines(),
            vec!["line     4:row 4", "line     5:row 5", "line     6:row 6"]
        );
    }

    #[test]
    fn test_window_clips_to_file() {
        // 20 lines plus the empty segment after the final newline
        let ctx = window_from(&license(), 5, 100).unwrap();
        assert_eq!(ctx.window.len(), 21);
        assert_eq!(ctx.window.first().unwrap().0, 1);
        assert_eq!(ctx.window.last().unwrap(), &(21, String::new()));
    }

    #[test]
    fn test_window_size_matches_bounds() {
        let buf = license();
        for (line, radius) in [(1, 3), (10, 2), (21, 4), (3, 0)] {
            let ctx = window_from(&buf, line, radius).unwrap();
            let expected = (line + radius).min(buf.len()) - line.saturating_sub(radius).max(1) + 1;
            assert_eq!(ctx.window.len(), expected, "line {line} radius {radius}");
            assert!(ctx.window.windows(2).all(|w| w[1].0 == w[0].0 + 1));
        }
    }

    #[test]
    fn test_preserves_exact_whitespace() {
        let buf = FileBuffer::parse("a.rb", "def a\n    x  \nend");
        let ctx = window_from(&buf, 2, 0).unwrap();
        assert_eq!(ctx.target_line, "    x  ");
        assert_eq!(ctx.render(), "line     2:    x  ");
    }

    #[test]
    fn test_target_beyond_file_errors() {
        let buf = FileBuffer::parse("a.rb", "a\nb");
        assert!(window_from(&buf, 3, 0).is_err());
    }

    #[test]
    fn test_extract_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.rb");
        fs::write(&path, "one\ntwo\nthree").unwrap();
        let ctx = extract(&path, 2, 1).unwrap();
        assert_eq!(ctx.target_line, "two");
        assert_eq!(ctx.window.len(), 3);
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = extract(&dir.path().join("nope.rb"), 1, 0).unwrap_err();
        assert!(err.to_string().contains("nope.rb"));
    }
}
