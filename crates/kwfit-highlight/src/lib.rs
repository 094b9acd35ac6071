//! Syntax highlighting and terminal colors for kwfit.
//!
//! Configuration and JSON records are highlighted with syntect. Status labels such as fit
//! statuses and priority tiers are painted with a small set of tones so every command
//! colors them the same way.

#![warn(missing_docs)]

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and JSON.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Active theme.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML content.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights content with the named syntax (extension or language name).
    ///
    /// Unknown syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut lines = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (success, matches).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (warnings, review).
    pub const YELLOW: &str = "\x1b[33m";
    /// Red text (errors, rejections).
    pub const RED: &str = "\x1b[31m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Semantic color of a status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// A favorable outcome.
    Good,
    /// Needs a human look.
    Caution,
    /// An unfavorable outcome.
    Bad,
    /// Carries no signal.
    Muted,
}

impl Tone {
    /// ANSI prefix for this tone.
    fn code(self) -> &'static str {
        match self {
            Self::Good => colors::GREEN,
            Self::Caution => colors::YELLOW,
            Self::Bad => colors::RED,
            Self::Muted => colors::DIM,
        }
    }
}

/// Paints text with a tone.
pub fn paint(text: &str, tone: Tone) -> String {
    format!("{}{}{}", tone.code(), text, colors::RESET)
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed.
pub fn dim(text: &str) -> String {
    paint(text, Tone::Muted)
}

/// Formats text as a success message.
pub fn success(text: &str) -> String {
    paint(text, Tone::Good)
}

/// Formats text as a warning.
pub fn warning(text: &str) -> String {
    paint(text, Tone::Caution)
}

/// Indents every line of `content` by three spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("   {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
