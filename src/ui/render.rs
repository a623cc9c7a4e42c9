//! Text rendering for the shell front end.

use crate::app::domain::conflict::ConflictRecord;
use crate::app::domain::registry::RecentEntry;
use crate::app::domain::session::FileSession;
use crate::app::services::syntax::StyledSpan;
use crate::app::services::text_ops::line_count;

use super::theme::Palette;

/// "run.sh" or "run.sh [+]" when there are unsaved edits.
pub fn title(session: &FileSession) -> String {
    if session.is_dirty() {
        format!("{} [+]", session.display_name())
    } else {
        session.display_name().to_string()
    }
}

fn gutter_width(text: &str) -> usize {
    line_count(text).max(1).to_string().len()
}

/// The working copy with a line-number gutter.
pub fn listing(session: &FileSession, palette: &Palette) -> String {
    let text = session.working();
    let width = gutter_width(text);
    let mut out = format!("-- {} --\n", title(session));
    for (i, line) in text.lines().enumerate() {
        let number = format!("{:>width$} ", i + 1, width = width);
        out.push_str(&palette.dim(&number));
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Like [`listing`], but each line is painted from its classified spans.
pub fn highlighted(session: &FileSession, lines: &[Vec<StyledSpan>], palette: &Palette) -> String {
    let width = gutter_width(session.working());
    let mut out = format!("-- {} --\n", title(session));
    for (i, spans) in lines.iter().enumerate() {
        let number = format!("{:>width$} ", i + 1, width = width);
        out.push_str(&palette.dim(&number));
        for span in spans {
            out.push_str(&palette.paint(span.class, &span.text));
        }
        out.push('\n');
    }
    out
}

/// Newest first, current file marked with `*`.
pub fn recent_list(entries: &[RecentEntry], current: Option<&str>) -> String {
    if entries.is_empty() {
        return "No recent files".to_string();
    }
    entries
        .iter()
        .map(|entry| {
            let marker = if current == Some(entry.path.as_str()) { '*' } else { ' ' };
            format!("{} {:<20} {}", marker, entry.display_name, entry.path)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status(session: Option<&FileSession>, conflict: Option<&ConflictRecord>) -> String {
    let Some(session) = session else {
        return "No file open".to_string();
    };
    let mut out = format!(
        "{}: {} lines, {}",
        session.path(),
        line_count(session.working()),
        if session.is_dirty() { "modified" } else { "saved" }
    );
    if session.save_in_flight() {
        out.push_str(", saving");
    }
    if let Some(conflict) = conflict {
        out.push_str(&format!("\nconflict pending on {} (:keep or :reload)", conflict.path));
    }
    out
}

/// Shown when a file changed on disk under unsaved edits.
pub fn conflict_notice(record: &ConflictRecord, working: &str, palette: &Palette) -> String {
    let headline = format!(
        "{} changed on disk and you have unsaved edits. :keep keeps yours, :reload takes the disk version.",
        record.path
    );
    format!("{}\n{}", palette.warn(&headline), record.diff_against(working))
}
