use std::path::Path;

/// Extract filename from a file path
///
/// Returns the filename component of a path, or "Unknown" if it can't be extracted.
pub fn extract_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Find next occurrence of search string in text, starting at `start_pos`.
pub fn find_in_text(text: &str, search: &str, start_pos: usize) -> Option<usize> {
    if search.is_empty() || start_pos >= text.len() {
        return None;
    }
    text[start_pos..].find(search).map(|pos| start_pos + pos)
}

/// Convert a 1-based line number to a byte position in the text
///
/// Returns None if the line number is 0 or beyond the end of the text.
pub fn line_number_to_byte_position(text: &str, line: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    if line == 1 {
        return Some(0);
    }

    let mut current_line = 1;
    for (i, ch) in text.char_indices() {
        if ch == '\n' {
            current_line += 1;
            if current_line == line {
                return Some(i + 1);
            }
        }
    }
    None
}

/// Number of lines as an editor shows them: a trailing newline opens one more
/// (empty) line, and empty text is a single empty line.
pub fn line_count(text: &str) -> usize {
    text.matches('\n').count() + 1
}

/// Byte range of 1-based `line`, excluding its newline.
fn line_range(text: &str, line: usize) -> Option<(usize, usize)> {
    let start = line_number_to_byte_position(text, line)?;
    let end = text[start..].find('\n').map(|i| start + i).unwrap_or(text.len());
    Some((start, end))
}

/// Append `line` as a new last line.
pub fn append_line(text: &str, line: &str) -> String {
    let mut out = String::with_capacity(text.len() + line.len() + 1);
    out.push_str(text);
    if !text.is_empty() && !text.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out
}

/// Replace the contents of 1-based `line`. Returns None when out of range.
pub fn replace_line(text: &str, line: usize, replacement: &str) -> Option<String> {
    let (start, end) = line_range(text, line)?;
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..start]);
    out.push_str(replacement);
    out.push_str(&text[end..]);
    Some(out)
}

/// Remove 1-based `line` together with its newline. Returns None when out of range.
pub fn delete_line(text: &str, line: usize) -> Option<String> {
    let (start, end) = line_range(text, line)?;
    let mut out = String::with_capacity(text.len());
    if end < text.len() {
        // drop the line and the newline that ends it
        out.push_str(&text[..start]);
        out.push_str(&text[end + 1..]);
    } else if start > 0 {
        // last line: drop the newline that precedes it instead
        out.push_str(&text[..start - 1]);
    }
    Some(out)
}

/// Replace all occurrences of search string with replacement
///
/// Returns (new_text, count_of_replacements)
pub fn replace_all_in_text(text: &str, search: &str, replace: &str) -> (String, usize) {
    if search.is_empty() {
        return (text.to_string(), 0);
    }

    let mut result = text.to_string();
    let mut count = 0;
    let mut pos = 0;

    while let Some(found_pos) = find_in_text(&result, search, pos) {
        result.replace_range(found_pos..found_pos + search.len(), replace);
        pos = found_pos + replace.len();
        count += 1;
    }

    (result, count)
}
