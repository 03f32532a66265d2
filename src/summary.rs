//! Summary - the sole output artifact of the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label prefixed to a model-generated summary
pub const MODEL_LABEL: &str = "AI Summary:";
/// Label prefixed to a heuristic summary
pub const HEURISTIC_LABEL: &str = "Key Points:";
/// Label prefixed to the lenient overview
pub const OVERVIEW_LABEL: &str = "Content Overview:";

const HEURISTIC_FOOTER: &str = "(Extracted from the page text without an on-device model.)";
const OVERVIEW_FOOTER: &str = "(Opening of the page; no clear summary sentences were found.)";

/// Shown when the input is too short to summarise
pub const NOT_ENOUGH_CONTENT: &str =
    "Not enough content to summarize. Try a page with more text.";
/// Shown when every tier failed
pub const SUMMARY_FAILED: &str = "Sorry, we couldn't summarize this content.";

/// Which path produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// Generated by the language model
    Model,
    /// Strict sentence extraction
    Heuristic,
    /// Lenient fallback: opening block of the text
    Overview,
    /// Canned message
    Notice,
}

/// Human-readable summary text, never empty.
///
/// The provenance is visible to the reader through the label at the top of
/// the text; `kind` carries the same information for callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    kind: SummaryKind,
    text: String,
}

impl Summary {
    /// Wrap a model response. The caller guarantees `response` is not blank.
    pub(crate) fn model(response: &str) -> Self {
        Self {
            kind: SummaryKind::Model,
            text: format!("{MODEL_LABEL}\n\n{}", response.trim()),
        }
    }

    /// Join extracted sentences into the heuristic template.
    pub(crate) fn heuristic<S: AsRef<str>>(sentences: &[S]) -> Self {
        let joined = sentences
            .iter()
            .map(|sentence| terminated(sentence.as_ref()))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            kind: SummaryKind::Heuristic,
            text: format!("{HEURISTIC_LABEL}\n\n{joined}\n\n{HEURISTIC_FOOTER}"),
        }
    }

    pub(crate) fn overview(block: &str) -> Self {
        Self {
            kind: SummaryKind::Overview,
            text: format!("{OVERVIEW_LABEL}\n\n{}\n\n{OVERVIEW_FOOTER}", block.trim()),
        }
    }

    pub(crate) fn not_enough_content() -> Self {
        Self::notice(NOT_ENOUGH_CONTENT)
    }

    pub(crate) fn failed() -> Self {
        Self::notice(SUMMARY_FAILED)
    }

    fn notice(message: &str) -> Self {
        Self {
            kind: SummaryKind::Notice,
            text: message.to_string(),
        }
    }

    pub fn kind(&self) -> SummaryKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Whether a language model wrote this summary
    pub fn is_model_generated(&self) -> bool {
        self.kind == SummaryKind::Model
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Single-spaced sentence with terminal punctuation.
fn terminated(sentence: &str) -> String {
    let sentence = sentence.split_whitespace().collect::<Vec<_>>().join(" ");
    if sentence.ends_with(['.', '!', '?']) {
        sentence
    } else {
        format!("{sentence}.")
    }
}
