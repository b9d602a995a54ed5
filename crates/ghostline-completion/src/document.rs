//! Read-only document access

/// Read-only view over an open editor document
///
/// The engine and analyzer only ever read; edits stay on the host's side.
/// Line indexes are zero-based and `line_at` returns `None` past the end, so
/// callers never need to bounds-check first.
pub trait Document: Send + Sync {
    /// Stable identity for the document (typically a file URI)
    fn uri(&self) -> &str;

    /// Language identifier for the document
    fn language_id(&self) -> &str;

    /// Number of lines in the document
    fn line_count(&self) -> usize;

    /// The text of one line, without its trailing newline
    fn line_at(&self, index: usize) -> Option<String>;
}

/// Owned in-memory document, line-addressed
///
/// Suitable for hosts that hold document text themselves and for tests.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    uri: String,
    language_id: String,
    lines: Vec<String>,
}

impl TextBuffer {
    /// Split `text` into lines and wrap it as a document
    pub fn new(uri: &str, language_id: &str, text: &str) -> Self {
        Self {
            uri: uri.to_string(),
            language_id: language_id.to_string(),
            lines: text.lines().map(|line| line.to_string()).collect(),
        }
    }

    /// Wrap pre-split lines as a document
    pub fn from_lines(uri: &str, language_id: &str, lines: Vec<String>) -> Self {
        Self {
            uri: uri.to_string(),
            language_id: language_id.to_string(),
            lines,
        }
    }
}

impl Document for TextBuffer {
    fn uri(&self) -> &str {
        &self.uri
    }

    fn language_id(&self) -> &str {
        &self.language_id
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_at(&self, index: usize) -> Option<String> {
        self.lines.get(index).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_buffer_splits_lines() {
        let buffer = TextBuffer::new("file:///a.py", "python", "def f():\n    pass\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line_at(0), Some("def f():".to_string()));
        assert_eq!(buffer.line_at(1), Some("    pass".to_string()));
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buffer = TextBuffer::new("file:///a.py", "python", "x = 1");
        assert_eq!(buffer.line_at(1), None);
        assert_eq!(buffer.line_at(100), None);
    }

    #[test]
    fn test_empty_document_has_no_lines() {
        let buffer = TextBuffer::new("file:///empty.py", "python", "");
        assert_eq!(buffer.line_count(), 0);
        assert_eq!(buffer.line_at(0), None);
    }
}
