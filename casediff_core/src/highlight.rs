//! Style-tagged text and intra-line highlighting.
//!
//! Highlighting produces spans tagged with a [`Style`]; turning them into
//! terminal escapes happens only when a line is rendered, so widths are
//! always measured on the raw text.

use crate::equality::{equal_numeric, is_number};
use crate::words::Words;
use casediff_common::{CompareMethod, Options};

const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    /// Only present on the left side
    Removed,
    /// Only present on the right side
    Added,
    /// Characters that differ at the same position
    Changed,
    /// Numbers outside tolerance, or a number against a non-number
    Mismatched,
}

impl Style {
    pub fn ansi(&self) -> &'static str {
        match self {
            Style::Plain => "",
            Style::Removed => "\x1b[1;31m",
            Style::Added => "\x1b[1;32m",
            Style::Changed => "\x1b[1;34m",
            Style::Mismatched => "\x1b[1;33m",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// A line as a sequence of styled spans
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plain(text: &str) -> Self {
        Self::styled(text, Style::Plain)
    }

    pub fn styled(text: &str, style: Style) -> Self {
        let mut out = Self::new();
        out.push(text, style);
        out
    }

    /// Append text, merging with the previous span when the style matches.
    pub fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(Span {
                text: text.to_string(),
                style,
            }),
        }
    }

    pub fn extend(&mut self, other: StyledText) {
        for span in other.spans {
            self.push(&span.text, span.style);
        }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Display width in characters, ignoring styles
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }

    pub fn to_plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            if span.style == Style::Plain {
                out.push_str(&span.text);
            } else {
                out.push_str(span.style.ansi());
                out.push_str(&span.text);
                out.push_str(ANSI_RESET);
            }
        }
        out
    }

    pub fn render(&self, color: bool) -> String {
        if color {
            self.to_ansi()
        } else {
            self.to_plain()
        }
    }
}

/// Character-level highlighting: differing runs are `Changed`, surplus
/// characters on the longer side are `Removed` (left) or `Added` (right).
pub fn format_text(a: &str, b: &str) -> (StyledText, StyledText) {
    let (mut a_out, mut b_out) = (StyledText::new(), StyledText::new());
    let mut a_chars = a.char_indices();
    let mut b_chars = b.char_indices();
    let mut buf = [0u8; 4];

    loop {
        match (a_chars.next(), b_chars.next()) {
            (Some((_, x)), Some((_, y))) => {
                let style = if x == y { Style::Plain } else { Style::Changed };
                a_out.push(x.encode_utf8(&mut buf), style);
                b_out.push(y.encode_utf8(&mut buf), style);
            }
            (Some((i, _)), None) => {
                a_out.push(&a[i..], Style::Removed);
                break;
            }
            (None, Some((j, _))) => {
                b_out.push(&b[j..], Style::Added);
                break;
            }
            (None, None) => break,
        }
    }

    (a_out, b_out)
}

/// Word-level highlighting with a per-word strategy for mismatched pairs.
fn format_words<F>(a: &str, b: &str, mut word_diff: F) -> (StyledText, StyledText)
where
    F: FnMut(&str, &str) -> Option<(StyledText, StyledText)>,
{
    let (a_words, b_words) = (Words::split(a), Words::split(b));
    let (mut a_out, mut b_out) = (StyledText::new(), StyledText::new());

    for (x, y) in a_words.tokens().iter().zip(b_words.tokens()) {
        a_out.push(x.space, Style::Plain);
        b_out.push(y.space, Style::Plain);
        match word_diff(x.word, y.word) {
            None => {
                a_out.push(x.word, Style::Plain);
                b_out.push(y.word, Style::Plain);
            }
            Some((a_word, b_word)) => {
                a_out.extend(a_word);
                b_out.extend(b_word);
            }
        }
    }

    let common = a_words.len().min(b_words.len());
    for x in &a_words.tokens()[common..] {
        a_out.push(x.space, Style::Plain);
        a_out.push(x.word, Style::Removed);
    }
    for y in &b_words.tokens()[common..] {
        b_out.push(y.space, Style::Plain);
        b_out.push(y.word, Style::Added);
    }

    a_out.push(a_words.trailing(), Style::Plain);
    b_out.push(b_words.trailing(), Style::Plain);
    (a_out, b_out)
}

/// Token-level highlighting: unequal words get character highlighting,
/// whitespace is kept as-is.
pub fn format_token(a: &str, b: &str) -> (StyledText, StyledText) {
    format_words(a, b, |x, y| (x != y).then(|| format_text(x, y)))
}

/// Numeric highlighting: words within tolerance stay plain, unequal pairs
/// involving a number are marked `Mismatched`, others get character
/// highlighting.
pub fn format_numeric(a: &str, b: &str, epsilon: f64) -> (StyledText, StyledText) {
    format_words(a, b, |x, y| {
        if equal_numeric(x, y, epsilon) {
            None
        } else if is_number(x) || is_number(y) {
            Some((
                StyledText::styled(x, Style::Mismatched),
                StyledText::styled(y, Style::Mismatched),
            ))
        } else {
            Some(format_text(x, y))
        }
    })
}

/// Highlight a line pair according to the comparison method, or leave it
/// plain when color is off.
pub fn format_line_pair(a: &str, b: &str, options: &Options) -> (StyledText, StyledText) {
    if !options.color {
        return (StyledText::plain(a), StyledText::plain(b));
    }
    match options.method {
        CompareMethod::Exact => format_text(a, b),
        CompareMethod::Token => format_token(a, b),
        CompareMethod::Numeric => format_numeric(a, b, options.epsilon),
    }
}

/// A line with no counterpart on the other side
pub fn format_extra_line(line: &str, style: Style, options: &Options) -> StyledText {
    if options.color {
        StyledText::styled(line, style)
    } else {
        StyledText::plain(line)
    }
}
