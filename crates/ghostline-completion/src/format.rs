//! Suggestion text formatting

/// Re-indents a multi-line suggestion to the current line's indentation
///
/// The first line is returned as-is (the editor inserts it at the cursor
/// column); every following line gets `indentation` prepended so the block
/// lines up with the code being typed.
pub fn indent_continuation_lines(suggestion: &str, indentation: &str) -> String {
    if indentation.is_empty() || !suggestion.contains('\n') {
        return suggestion.to_string();
    }

    let mut lines = suggestion.split('\n');
    let mut formatted = String::with_capacity(suggestion.len() + indentation.len() * 4);
    if let Some(first) = lines.next() {
        formatted.push_str(first);
    }
    for line in lines {
        formatted.push('\n');
        formatted.push_str(indentation);
        formatted.push_str(line);
    }
    formatted
}
