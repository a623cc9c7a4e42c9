//! Shell syntax classification for display.
//!
//! Highlighting is advisory: nothing here can fail from the caller's point of
//! view. A line syntect cannot handle comes back as a single plain span.

mod highlighter;
mod style_map;

use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};

use highlighter::{spans_for_line, LinesWithEndings};

pub use highlighter::StyledSpan;
pub use style_map::{StyleClass, StyleMap};

pub struct ShellClassifier {
    syntax_set: SyntaxSet,
    style_map: StyleMap,
}

impl ShellClassifier {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            style_map: StyleMap::new(),
        }
    }

    fn syntax(&self) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_extension("sh")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Classify a single line in isolation.
    pub fn classify(&self, line: &str) -> Vec<StyledSpan> {
        let mut parse_state = ParseState::new(self.syntax());
        let mut stack = ScopeStack::new();
        let input = format!("{}\n", line.trim_end_matches('\n'));
        match spans_for_line(&input, &mut parse_state, &mut stack, &self.syntax_set, &self.style_map) {
            Ok(spans) => spans,
            Err(e) => {
                log::debug!("Falling back to plain text for line: {}", e);
                fallback(line)
            }
        }
    }

    /// Classify a whole script, carrying parser state across lines so that
    /// multi-line strings and heredocs keep their class. One entry per line.
    pub fn classify_text(&self, text: &str) -> Vec<Vec<StyledSpan>> {
        let mut parse_state = ParseState::new(self.syntax());
        let mut stack = ScopeStack::new();
        let mut out = Vec::new();
        let mut failed = false;

        for line in LinesWithEndings::new(text) {
            if failed {
                out.push(fallback(line));
                continue;
            }
            match spans_for_line(line, &mut parse_state, &mut stack, &self.syntax_set, &self.style_map) {
                Ok(spans) => out.push(spans),
                Err(e) => {
                    // Parser state is unreliable after an error; stay plain for the rest.
                    log::debug!("Highlighting stopped at line {}: {}", out.len() + 1, e);
                    failed = true;
                    out.push(fallback(line));
                }
            }
        }
        out
    }
}

impl Default for ShellClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn fallback(line: &str) -> Vec<StyledSpan> {
    let line = line.trim_end_matches('\n');
    if line.is_empty() {
        Vec::new()
    } else {
        vec![StyledSpan::plain(line)]
    }
}
