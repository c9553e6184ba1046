//! Receipt layout
//!
//! Turns caller text into [`FormattedLine`] values laid out for a
//! 42-column roll. Nothing here touches the device.

use receipt_printer::{pad_width, text_width, truncate_width};

/// Characters per line on the paper roll
pub const LINE_WIDTH: usize = 42;

/// How a formatted line is realized on paper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Bold,
    BoldUnderline,
    /// Full-width row of dashes
    Rule,
    /// List item, indented, `*` replaced by `-`
    Bullet,
    /// Full-width row of spaces, no newline
    Blank,
    /// Written verbatim, no newline
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub style: LineStyle,
    pub text: String,
}

impl FormattedLine {
    pub fn new(style: LineStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn blank() -> Self {
        Self::new(LineStyle::Blank, " ".repeat(LINE_WIDTH))
    }

    pub fn rule() -> Self {
        Self::new(LineStyle::Rule, "-".repeat(LINE_WIDTH))
    }

    /// Whether the line is followed by a newline when printed
    pub fn is_terminated(&self) -> bool {
        !matches!(self.style, LineStyle::Blank | LineStyle::Raw)
    }

    /// Text exactly as sent to the printer
    pub fn render(&self) -> String {
        if self.is_terminated() {
            format!("{}\n", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Split a document into source lines
///
/// Breaks on `\r\n` and every single-character line boundary in
/// [`is_line_break`]. A final terminator does not start another line; an
/// empty document is a single blank line.
pub fn source_lines(document: &str) -> Vec<&str> {
    if document.is_empty() {
        return vec![""];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = document.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&document[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            start += 1;
        }
    }

    if start < document.len() {
        lines.push(&document[start..]);
    }
    lines
}

/// Line boundaries: LF, CR, VT, FF, FS, GS, RS, NEL, LS and PS
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

type Rule = (fn(&str) -> bool, fn(&str) -> FormattedLine);

/// Markdown-lite rules, first match wins
///
/// `"## "` must be tested before `"# "`.
const DOCUMENT_RULES: [Rule; 6] = [
    (is_blank, blank_line),
    (is_heading2, heading2_line),
    (is_heading1, heading1_line),
    (is_rule, rule_line),
    (is_bullet, bullet_line),
    (any_line, plain_line),
];

fn is_blank(line: &str) -> bool {
    line.is_empty()
}

fn blank_line(_: &str) -> FormattedLine {
    FormattedLine::blank()
}

fn is_heading2(line: &str) -> bool {
    line.starts_with("## ")
}

fn heading2_line(line: &str) -> FormattedLine {
    FormattedLine::new(LineStyle::Bold, line.strip_prefix("## ").unwrap_or(line))
}

fn is_heading1(line: &str) -> bool {
    line.starts_with("# ")
}

fn heading1_line(line: &str) -> FormattedLine {
    FormattedLine::new(
        LineStyle::BoldUnderline,
        line.strip_prefix("# ").unwrap_or(line),
    )
}

fn is_rule(line: &str) -> bool {
    line.starts_with("---")
}

fn rule_line(_: &str) -> FormattedLine {
    FormattedLine::rule()
}

fn is_bullet(line: &str) -> bool {
    line.starts_with('*')
}

fn bullet_line(line: &str) -> FormattedLine {
    FormattedLine::new(LineStyle::Bullet, format!("    {}", line.replace('*', "-")))
}

fn any_line(_: &str) -> bool {
    true
}

fn plain_line(line: &str) -> FormattedLine {
    FormattedLine::new(LineStyle::Plain, line)
}

/// Format one Markdown-lite source line
pub fn format_document_line(line: &str) -> FormattedLine {
    DOCUMENT_RULES
        .iter()
        .find(|(matches, _)| matches(line))
        .map(|(_, build)| build(line))
        .unwrap_or_else(|| plain_line(line))
}

/// Format a Markdown-lite document
pub fn format_document(document: &str) -> Vec<FormattedLine> {
    source_lines(document)
        .into_iter()
        .map(format_document_line)
        .collect()
}

/// Format a document for fixed-width output
///
/// Each non-empty line yields two raw units: the line fitted to the roll,
/// then the original line again, untouched.
pub fn format_part(document: &str) -> Vec<FormattedLine> {
    let mut out = Vec::new();

    for line in source_lines(document) {
        if line.is_empty() {
            out.push(FormattedLine::blank());
            continue;
        }

        let fitted = if text_width(line) > LINE_WIDTH {
            format!("{}\n", truncate_width(line, LINE_WIDTH))
        } else {
            pad_width(line, LINE_WIDTH, false)
        };
        out.push(FormattedLine::new(LineStyle::Raw, fitted));
        out.push(FormattedLine::new(LineStyle::Raw, line));
    }

    out
}
