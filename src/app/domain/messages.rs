use crate::app::infrastructure::error::{AppError, Result};

/// Everything the shell loop can ask the application to do.
/// Timer ticks and typed commands both arrive as one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // File
    Open(String),
    Select(String),
    Remove(String),
    ListRecent,
    Save,
    Quit,

    // Edit
    Append(String),
    SetLine(usize, String),
    DeleteLine(usize),
    Replace(String, String),
    Format,

    // View
    Print,
    Highlight,
    Status,
    SetTheme(String),
    Shell,

    // Reconciliation
    Tick,
    Check,
    FocusGained,
    FocusLost,
    KeepMine,
    ReloadTheirs,

    Help,
}

pub const HELP: &str = "\
:open PATH        open a script and make it current
:select PATH      switch to a known script
:remove PATH      forget a script (the file is kept)
:recent           list known scripts
:print            show the working copy with line numbers
:highlight        show the working copy with syntax colors
:append TEXT      add a line at the end
:set N TEXT       replace line N
:delete N         delete line N
:replace OLD NEW  replace every OLD with NEW
:format           re-indent the working copy
:save             write the working copy to disk
:check            compare with disk now
:focus / :blur    simulate the window gaining / losing focus
:keep             conflict: keep my edits
:reload           conflict: take the disk version
:theme NAME       switch color theme
:status           show the current file state
:shell            open a terminal in the script's directory
:quit             leave";

impl Message {
    /// Parse one line typed at the prompt.
    pub fn parse(input: &str) -> Result<Message> {
        let input = input.trim_end_matches(['\r', '\n']);
        let (command, rest) = match input.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (input, ""),
        };
        let arg = rest.trim();

        let message = match command {
            ":open" | ":o" => Message::Open(required(arg, "path")?),
            ":select" => Message::Select(required(arg, "path")?),
            ":remove" => Message::Remove(required(arg, "path")?),
            ":recent" | ":ls" => Message::ListRecent,
            ":save" | ":w" => Message::Save,
            ":quit" | ":q" => Message::Quit,
            // keep leading whitespace of the appended text
            ":append" | ":a" => Message::Append(rest.to_string()),
            ":set" => {
                let (n, text) = rest.trim_start().split_once(' ').unwrap_or((arg, ""));
                Message::SetLine(line_number(n)?, text.to_string())
            }
            ":delete" | ":d" => Message::DeleteLine(line_number(arg)?),
            ":replace" | ":s" => {
                let (from, to) = arg
                    .split_once(' ')
                    .ok_or_else(|| AppError::Command("usage: :replace OLD NEW".to_string()))?;
                Message::Replace(from.to_string(), to.trim_start().to_string())
            }
            ":format" | ":fmt" => Message::Format,
            ":print" | ":p" => Message::Print,
            ":highlight" | ":hl" => Message::Highlight,
            ":status" => Message::Status,
            ":shell" | ":sh" => Message::Shell,
            ":theme" => Message::SetTheme(required(arg, "theme name")?),
            ":check" => Message::Check,
            ":focus" => Message::FocusGained,
            ":blur" => Message::FocusLost,
            ":keep" => Message::KeepMine,
            ":reload" => Message::ReloadTheirs,
            ":help" | ":h" | "?" => Message::Help,
            "" => return Err(AppError::Command("empty command".to_string())),
            other => return Err(AppError::Command(format!("unknown command: {} (try :help)", other))),
        };
        Ok(message)
    }
}

fn required(arg: &str, what: &str) -> Result<String> {
    if arg.is_empty() {
        return Err(AppError::Command(format!("missing {}", what)));
    }
    Ok(arg.to_string())
}

fn line_number(arg: &str) -> Result<usize> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| AppError::Command(format!("not a line number: {:?}", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(Message::parse(":save").unwrap(), Message::Save);
        assert_eq!(Message::parse(":q\n").unwrap(), Message::Quit);
        assert_eq!(Message::parse(":focus").unwrap(), Message::FocusGained);
        assert_eq!(Message::parse(":keep").unwrap(), Message::KeepMine);
        assert_eq!(Message::parse(":shell").unwrap(), Message::Shell);
    }

    #[test]
    fn test_parse_path_argument() {
        assert_eq!(
            Message::parse(":open  /tmp/my script.sh ").unwrap(),
            Message::Open("/tmp/my script.sh".to_string())
        );
        assert!(Message::parse(":open").is_err());
    }

    #[test]
    fn test_parse_append_keeps_indentation() {
        assert_eq!(
            Message::parse(":append     echo hi").unwrap(),
            Message::Append("    echo hi".to_string())
        );
        assert_eq!(Message::parse(":append").unwrap(), Message::Append(String::new()));
    }

    #[test]
    fn test_parse_set_and_delete() {
        assert_eq!(
            Message::parse(":set 3 fi").unwrap(),
            Message::SetLine(3, "fi".to_string())
        );
        assert_eq!(Message::parse(":set 2").unwrap(), Message::SetLine(2, String::new()));
        assert_eq!(Message::parse(":delete 4").unwrap(), Message::DeleteLine(4));
        assert!(Message::parse(":delete 0").is_err());
        assert!(Message::parse(":delete x").is_err());
    }

    #[test]
    fn test_parse_replace() {
        assert_eq!(
            Message::parse(":replace foo bar baz").unwrap(),
            Message::Replace("foo".to_string(), "bar baz".to_string())
        );
        assert!(Message::parse(":replace foo").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = Message::parse(":frobnicate").unwrap_err();
        assert!(err.to_string().contains("unknown command"));
        assert!(Message::parse("").is_err());
    }
}
