//! Deterministic summarisation used when no model is available or it fails.
//!
//! Tiers, in order: a guard for too-short input, strict sentence extraction,
//! and the lenient overview which always produces text.

use crate::config::SummarizerConfig;
use crate::rules::{self, Rule, RuleSet};
use crate::summary::Summary;
use crate::text::{split_blocks, split_sentences, truncate_chars};
use tracing::debug;

pub struct HeuristicExtractor {
    config: SummarizerConfig,
    sentence_rules: RuleSet,
}

impl HeuristicExtractor {
    pub fn new(config: SummarizerConfig) -> Self {
        let sentence_rules = sentence_rules(&config);
        Self {
            config,
            sentence_rules,
        }
    }

    /// Whether `text` is long enough to be worth summarising.
    pub fn has_enough_content(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.config.min_input_chars
    }

    pub fn summarize(&self, text: &str) -> Summary {
        if !self.has_enough_content(text) {
            return Summary::not_enough_content();
        }

        let sentences = self.key_sentences(text);
        if sentences.is_empty() {
            debug!("No sentence passed the filters, using overview");
            return self.overview(text);
        }
        Summary::heuristic(&sentences)
    }

    /// The first sentences that pass every rule, in their original order.
    pub fn key_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_sentences(text)
            .into_iter()
            .map(|sentence| sentence.text)
            .filter(|sentence| self.sentence_rules.accepts(sentence))
            .take(self.config.max_sentences)
            .collect()
    }

    /// Lenient fallback: never fails and is never empty.
    pub fn overview(&self, text: &str) -> Summary {
        let min = self.config.overview_min_block_chars;
        let max = self.config.overview_max_block_chars;

        let block = split_blocks(text).into_iter().find(|block| {
            let chars = block.chars().count();
            chars >= min && chars <= max
        });
        if let Some(block) = block {
            return Summary::overview(block);
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Summary::failed();
        }
        let preview = truncate_chars(trimmed, self.config.overview_preview_chars);
        if preview.len() < trimmed.len() {
            Summary::overview(&format!("{}...", preview.trim_end()))
        } else {
            Summary::overview(preview)
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.sentence_rules
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new(SummarizerConfig::default())
    }
}

fn sentence_rules(config: &SummarizerConfig) -> RuleSet {
    let lexicon = rules::SENTENCE_BOILERPLATE
        .iter()
        .map(|term| term.to_string())
        .chain(config.extra_boilerplate.iter().cloned());

    RuleSet::new()
        .with(Rule::shorter_than("too-short", config.min_sentence_chars))
        .with(Rule::longer_than("too-long", config.max_sentence_chars))
        .with(Rule::fewer_words_than("too-few-words", config.min_sentence_words))
        .with(Rule::more_words_than("too-many-words", config.max_sentence_words))
        .with(Rule::contains_any("boilerplate", lexicon))
}
