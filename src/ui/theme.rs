use crate::app::domain::settings::ThemeMode;
use crate::app::services::syntax::StyleClass;

const RESET: &str = "\x1b[0m";

/// ANSI escape sequences for one theme. Plain text is left uncolored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub keyword: &'static str,
    pub function: &'static str,
    pub string: &'static str,
    pub comment: &'static str,
    pub variable: &'static str,
    pub constant: &'static str,
    pub gutter: &'static str,
    pub warning: &'static str,
}

impl Palette {
    pub fn for_theme(theme: ThemeMode) -> Self {
        match theme {
            ThemeMode::Light => Palette {
                keyword: "\x1b[38;2;0;0;255m",
                function: "\x1b[38;2;121;94;38m",
                string: "\x1b[38;2;163;21;21m",
                comment: "\x1b[38;2;0;128;0m",
                variable: "\x1b[38;2;0;16;128m",
                constant: "\x1b[38;2;9;134;88m",
                gutter: "\x1b[38;2;100;100;100m",
                warning: "\x1b[38;2;139;128;0m",
            },
            ThemeMode::Dark => Palette {
                keyword: "\x1b[38;2;86;156;214m",
                function: "\x1b[38;2;220;220;170m",
                string: "\x1b[38;2;206;145;120m",
                comment: "\x1b[38;2;106;153;85m",
                variable: "\x1b[38;2;156;220;254m",
                constant: "\x1b[38;2;181;206;168m",
                gutter: "\x1b[38;2;150;150;150m",
                warning: "\x1b[38;2;255;250;205m",
            },
            ThemeMode::Kali => Palette {
                keyword: "\x1b[38;2;38;139;210m",
                function: "\x1b[38;2;0;255;255m",
                string: "\x1b[38;2;133;153;0m",
                comment: "\x1b[38;2;88;110;117m",
                variable: "\x1b[38;2;203;75;22m",
                constant: "\x1b[38;2;211;54;130m",
                gutter: "\x1b[38;2;88;110;117m",
                warning: "\x1b[38;2;255;85;85m",
            },
            ThemeMode::BashLight => Palette {
                keyword: "\x1b[34m",
                function: "\x1b[36m",
                string: "\x1b[32m",
                comment: "\x1b[90m",
                variable: "\x1b[35m",
                constant: "\x1b[33m",
                gutter: "\x1b[90m",
                warning: "\x1b[31m",
            },
            ThemeMode::BashDark => Palette {
                keyword: "\x1b[94m",
                function: "\x1b[96m",
                string: "\x1b[92m",
                comment: "\x1b[37m",
                variable: "\x1b[95m",
                constant: "\x1b[93m",
                gutter: "\x1b[37m",
                warning: "\x1b[91m",
            },
        }
    }

    pub fn color(&self, class: StyleClass) -> Option<&'static str> {
        match class {
            StyleClass::Keyword => Some(self.keyword),
            StyleClass::Function => Some(self.function),
            StyleClass::String => Some(self.string),
            StyleClass::Comment => Some(self.comment),
            StyleClass::Variable => Some(self.variable),
            StyleClass::Constant => Some(self.constant),
            StyleClass::Plain => None,
        }
    }

    pub fn paint(&self, class: StyleClass, text: &str) -> String {
        match self.color(class) {
            Some(code) if !text.is_empty() => format!("{}{}{}", code, text, RESET),
            _ => text.to_string(),
        }
    }

    pub fn dim(&self, text: &str) -> String {
        format!("{}{}{}", self.gutter, text, RESET)
    }

    pub fn warn(&self, text: &str) -> String {
        format!("{}{}{}", self.warning, text, RESET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_colored() {
        let palette = Palette::for_theme(ThemeMode::Dark);
        assert_eq!(palette.paint(StyleClass::Plain, "echo"), "echo");
        assert_eq!(palette.paint(StyleClass::Keyword, ""), "");
    }

    #[test]
    fn test_paint_wraps_in_reset() {
        let palette = Palette::for_theme(ThemeMode::BashDark);
        let painted = palette.paint(StyleClass::Keyword, "if");
        assert!(painted.starts_with("\x1b[94m"));
        assert!(painted.ends_with(RESET));
        assert!(painted.contains("if"));
    }

    #[test]
    fn test_every_theme_colors_keywords() {
        for theme in ThemeMode::all() {
            let palette = Palette::for_theme(*theme);
            assert!(palette.color(StyleClass::Keyword).is_some(), "{:?}", theme);
        }
    }
}
