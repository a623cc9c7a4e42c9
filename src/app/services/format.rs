//! Indentation-based formatter for shell scripts.
//!
//! This is a line classifier, not a parser. Each trimmed line is looked at in
//! isolation (first token, last token, a same-line closer) and moves a single
//! indent counter up or down. Keywords inside strings or comments are treated
//! like any other token.

use std::sync::LazyLock;

use regex_lite::Regex;

pub const INDENT_WIDTH: usize = 4;

/// Tokens that close the current block before the line is emitted.
const CLOSERS: &[&str] = &["done", "fi", "esac", "}", "elif", "else"];

/// Trailing tokens that open a block after the line is emitted.
const TRAILING_OPENERS: &[&str] = &["then", "do", "{", "else", "elif"];

/// Leading keywords that open a block unless the statement closes itself.
const LEADING_OPENERS: &[&str] = &["if", "for", "while", "case", "function"];

/// `...; fi`, `...; done`, `...;; esac` at the very end of a line.
static SAME_LINE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";\s*(fi|done|esac)\s*;?$").expect("same-line closer pattern"));

/// How one line moves the indent counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineShape {
    pub dedent_before: bool,
    pub indent_after: bool,
}

/// Classify a trimmed, non-empty line.
pub fn line_shape(trimmed: &str) -> LineShape {
    let mut words = trimmed.split_whitespace();
    let first_word = words.next().unwrap_or("");
    let last_word = words.next_back().unwrap_or(first_word);
    let first = first_word.trim_end_matches(';');
    let last = last_word.trim_end_matches(';');

    let dedent_before = CLOSERS.contains(&first) || trimmed.starts_with('}');

    let closes_itself = SAME_LINE_CLOSE.is_match(trimmed);
    let indent_after = TRAILING_OPENERS.contains(&last)
        || trimmed.ends_with('{')
        || (LEADING_OPENERS.contains(&first) && !closes_itself);

    LineShape {
        dedent_before,
        indent_after,
    }
}

/// Re-indent `content`. Never fails; the output ends with a newline exactly
/// when the input does.
pub fn format_script(content: &str) -> String {
    let mut formatted = String::with_capacity(content.len());
    let mut level: usize = 0;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            formatted.push('\n');
            continue;
        }

        let shape = line_shape(trimmed);
        if shape.dedent_before {
            level = level.saturating_sub(1);
        }

        formatted.push_str(&" ".repeat(level * INDENT_WIDTH));
        formatted.push_str(trimmed);
        formatted.push('\n');

        if shape.indent_after {
            level += 1;
        }
    }

    if !content.ends_with('\n') && formatted.ends_with('\n') {
        formatted.pop();
    }

    formatted
}
