use serde::Serialize;
use syntect::parsing::{ParseState, ScopeStack, SyntaxSet};

use super::style_map::{StyleClass, StyleMap};
use crate::app::infrastructure::error::{AppError, Result};

/// A run of text sharing one style class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    pub text: String,
    pub class: StyleClass,
}

impl StyledSpan {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            class: StyleClass::Plain,
        }
    }
}

/// Parse one line (which may end in `\n`) and split it into spans. The
/// trailing newline never appears in the output.
pub(super) fn spans_for_line(
    line: &str,
    parse_state: &mut ParseState,
    stack: &mut ScopeStack,
    syntax_set: &SyntaxSet,
    style_map: &StyleMap,
) -> Result<Vec<StyledSpan>> {
    let ops = parse_state
        .parse_line(line, syntax_set)
        .map_err(|e| AppError::Classify(e.to_string()))?;

    let mut spans: Vec<StyledSpan> = Vec::new();
    let mut push = |text: &str, class: StyleClass| {
        let text = text.trim_end_matches('\n');
        if text.is_empty() {
            return;
        }
        match spans.last_mut() {
            Some(prev) if prev.class == class => prev.text.push_str(text),
            _ => spans.push(StyledSpan {
                text: text.to_string(),
                class,
            }),
        }
    };

    let mut last_index = 0;
    for (index, op) in ops {
        if index > last_index {
            push(&line[last_index..index], style_map.class_for_stack(stack));
        }
        stack
            .apply(&op)
            .map_err(|e| AppError::Classify(format!("{:?}", e)))?;
        last_index = index;
    }
    if last_index < line.len() {
        push(&line[last_index..], style_map.class_for_stack(stack));
    }

    Ok(spans)
}

/// Iterator that yields lines including their line endings.
pub(super) struct LinesWithEndings<'a> {
    text: &'a str,
}

impl<'a> LinesWithEndings<'a> {
    pub(super) fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl<'a> Iterator for LinesWithEndings<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.text.is_empty() {
            return None;
        }
        let end = self.text.find('\n').map(|i| i + 1).unwrap_or(self.text.len());
        let line = &self.text[..end];
        self.text = &self.text[end..];
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_with_endings() {
        let lines: Vec<&str> = LinesWithEndings::new("a\nb\n\nc").collect();
        assert_eq!(lines, vec!["a\n", "b\n", "\n", "c"]);
        assert_eq!(LinesWithEndings::new("").count(), 0);
    }
}
