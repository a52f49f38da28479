//! Whitespace-preserving word decomposition.
//!
//! A line splits into `(leading whitespace, word)` pairs plus a trailing
//! whitespace remainder, so the original text can be rebuilt exactly.

/// A word together with the whitespace run in front of it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordToken<'a> {
    pub space: &'a str,
    pub word: &'a str,
}

/// Decomposition of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Words<'a> {
    tokens: Vec<WordToken<'a>>,
    trailing: &'a str,
}

impl<'a> Words<'a> {
    pub fn split(line: &'a str) -> Self {
        let mut tokens = Vec::new();
        let mut space_start = 0;
        let mut word_start: Option<usize> = None;

        for (idx, ch) in line.char_indices() {
            match (ch.is_whitespace(), word_start) {
                (true, Some(start)) => {
                    tokens.push(WordToken {
                        space: &line[space_start..start],
                        word: &line[start..idx],
                    });
                    space_start = idx;
                    word_start = None;
                }
                (false, None) => word_start = Some(idx),
                _ => {}
            }
        }

        let trailing = match word_start {
            Some(start) => {
                tokens.push(WordToken {
                    space: &line[space_start..start],
                    word: &line[start..],
                });
                ""
            }
            None => &line[space_start..],
        };

        Self { tokens, trailing }
    }

    pub fn tokens(&self) -> &[WordToken<'a>] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whitespace after the last word (the whole line if it has no words)
    pub fn trailing(&self) -> &'a str {
        self.trailing
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().map(|t| t.word)
    }

    /// Rebuild the original line
    pub fn join(&self) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(token.space);
            out.push_str(token.word);
        }
        out.push_str(self.trailing);
        out
    }
}
