//! Text primitives shared by the selector and the summarizer.
//!
//! `PageText` is the immutable extracted text of a document. Everything else
//! in here derives new strings from it without mutating it.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    /// Whitespace runs that do not contain a line break
    static ref INLINE_WHITESPACE: Regex = Regex::new(r"[^\S\n]+").expect("valid regex");
    /// Two or more blank lines
    static ref BLANK_LINE_RUNS: Regex = Regex::new(r"\n{3,}").expect("valid regex");
    /// Paragraph boundary: a line break, optional whitespace, another line break
    static ref BLOCK_BOUNDARY: Regex = Regex::new(r"\n\s*\n").expect("valid regex");
}

/// Extracted textual content of a document, before summarisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageText(String);

impl PageText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, not bytes
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    /// A new `PageText` holding at most `max_chars` characters.
    pub fn truncated(&self, max_chars: usize) -> PageText {
        PageText(truncate_chars(&self.0, max_chars).to_string())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A trimmed sentence of page text with the metrics used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub words: usize,
    pub chars: usize,
}

impl<'a> Sentence<'a> {
    pub fn new(text: &'a str) -> Self {
        let text = text.trim();
        Self {
            text,
            words: word_count(text),
            chars: text.chars().count(),
        }
    }

    /// Whether the sentence already ends in `.`, `!` or `?`
    pub fn is_terminated(&self) -> bool {
        self.text.ends_with(is_terminal)
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Normalise extracted text.
///
/// Whitespace inside a line collapses to a single space, lines are trimmed,
/// runs of blank lines collapse to exactly one, and the result is trimmed.
pub fn clean_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let inline = INLINE_WHITESPACE.replace_all(&unified, " ");
    let lines: Vec<&str> = inline.lines().map(str::trim).collect();
    let joined = lines.join("\n");
    BLANK_LINE_RUNS
        .replace_all(&joined, "\n\n")
        .trim()
        .to_string()
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Split text into sentences on `.`, `!` and `?`.
///
/// Terminators stay attached to their sentence. A terminator only ends a
/// sentence when followed by whitespace or the end of input, so `3.5` and
/// `example.com` stay intact. A blank line also ends a sentence, so an
/// unpunctuated heading stays apart from the paragraph below it. Empty
/// fragments are dropped.
pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();
    for block in BLOCK_BOUNDARY.split(text) {
        split_block(block, &mut sentences);
    }
    sentences
}

fn split_block<'a>(block: &'a str, sentences: &mut Vec<Sentence<'a>>) {
    let mut start = 0;
    let mut chars = block.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !is_terminal(c) {
            continue;
        }
        let end = idx + c.len_utf8();
        match chars.peek() {
            Some(&(_, next)) if is_terminal(next) => continue,
            Some(&(_, next)) if !next.is_whitespace() => continue,
            _ => {}
        }
        push_sentence(sentences, &block[start..end]);
        start = end;
    }
    push_sentence(sentences, &block[start..]);
}

fn push_sentence<'a>(sentences: &mut Vec<Sentence<'a>>, fragment: &'a str) {
    let sentence = Sentence::new(fragment);
    if !sentence.text.is_empty() {
        sentences.push(sentence);
    }
}

/// Split text into blocks separated by blank lines, trimmed, empty ones dropped.
pub fn split_blocks(text: &str) -> Vec<&str> {
    BLOCK_BOUNDARY
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}
