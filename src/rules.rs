//! Data-driven rejection rules for text fragments.
//!
//! A [`RuleSet`] is an ordered list of named predicates. Each predicate is a
//! pure function of a fragment and returns `true` when the fragment should be
//! rejected. The selector and the heuristic extractor build their filters out
//! of these, so thresholds and lexicons live here instead of in control flow.

use crate::text::word_count;
use std::fmt;

/// Phrases that mark a whole line of page text as site chrome.
pub const LINE_BOILERPLATE: &[&str] = &[
    "home",
    "about",
    "contact",
    "login",
    "sign up",
    "search",
    "menu",
    "navigation",
    "skip to content",
    "jump to navigation",
    "cookie policy",
    "privacy policy",
    "terms of service",
    "follow us",
    "share this",
    "related articles",
    "you may also like",
    "advertisement",
    "sponsored",
];

/// Terms that disqualify a sentence from a heuristic summary.
pub const SENTENCE_BOILERPLATE: &[&str] = &[
    "home",
    "subscribe",
    "newsletter",
    "advertisement",
    "cookie",
    "privacy",
    "terms of",
    "follow",
    "share",
    "sponsored",
    "sign up",
    "log in",
    "login",
    "click here",
    "read more",
    "all rights reserved",
    "skip to",
];

/// Class/id fragments that mark an element as navigation or other chrome.
pub const LANDMARK_PATTERNS: &[&str] = &[
    "nav",
    "menu",
    "header",
    "footer",
    "sidebar",
    "advertisement",
    "ad-",
];

/// Tags that are landmarks regardless of their attributes.
pub const LANDMARK_TAGS: &[&str] = &["nav", "header", "footer", "aside", "menu"];

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// A named rejection predicate.
pub struct Rule {
    name: &'static str,
    predicate: Predicate,
}

impl Rule {
    pub fn new<F>(name: &'static str, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Box::new(predicate),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this rule rejects the fragment
    pub fn rejects(&self, text: &str) -> bool {
        (self.predicate)(text)
    }

    pub fn shorter_than(name: &'static str, min_chars: usize) -> Self {
        Self::new(name, move |text| text.trim().chars().count() < min_chars)
    }

    pub fn longer_than(name: &'static str, max_chars: usize) -> Self {
        Self::new(name, move |text| text.trim().chars().count() > max_chars)
    }

    pub fn fewer_words_than(name: &'static str, min_words: usize) -> Self {
        Self::new(name, move |text| word_count(text) < min_words)
    }

    pub fn more_words_than(name: &'static str, max_words: usize) -> Self {
        Self::new(name, move |text| word_count(text) > max_words)
    }

    /// Rejects fragments containing any of `terms`, case-insensitively.
    pub fn contains_any<I, S>(name: &'static str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = lowercase_all(terms);
        Self::new(name, move |text| {
            let lower = text.to_lowercase();
            terms.iter().any(|term| lower.contains(term.as_str()))
        })
    }

    /// Rejects fragments made up of nothing but `phrases` and separators,
    /// e.g. `Home | About | Contact`.
    pub fn only_phrases<I, S>(name: &'static str, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases = lowercase_all(phrases);
        // Longest first so "sign up" is consumed before a shorter overlap.
        phrases.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));
        Self::new(name, move |text| {
            let mut rest = text.to_lowercase();
            for phrase in &phrases {
                rest = rest.replace(phrase.as_str(), " ");
            }
            !text.trim().is_empty() && !rest.chars().any(char::is_alphanumeric)
        })
    }

    /// Rejects fragments that open with one of the multi-word `phrases`,
    /// e.g. `Follow us on every network we could find`.
    pub fn starts_with_any<I, S>(name: &'static str, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let phrases = lowercase_all(phrases);
        Self::new(name, move |text| {
            let lower = text.trim_start().to_lowercase();
            phrases.iter().any(|phrase| lower.starts_with(phrase.as_str()))
        })
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

fn lowercase_all<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Ordered list of rejection rules. A fragment passes when no rule rejects it.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Name of the first rule rejecting `text`, in table order.
    pub fn first_rejection(&self, text: &str) -> Option<&'static str> {
        self.rules
            .iter()
            .find(|rule| rule.rejects(text))
            .map(Rule::name)
    }

    pub fn accepts(&self, text: &str) -> bool {
        self.first_rejection(text).is_none()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Whether a class or id attribute value looks like a landmark.
pub fn is_landmark_marker(value: &str) -> bool {
    let lower = value.to_lowercase();
    LANDMARK_PATTERNS
        .iter()
        .any(|pattern| lower.contains(pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_rules() {
        let short = Rule::shorter_than("short", 5);
        assert!(short.rejects("Hi."));
        assert!(!short.rejects("Hello there"));

        let long = Rule::longer_than("long", 5);
        assert!(long.rejects("Hello there"));
        assert!(!long.rejects("  Hi.  "));
    }

    #[test]
    fn test_word_rules() {
        assert!(Rule::fewer_words_than("few", 3).rejects("two words"));
        assert!(Rule::more_words_than("many", 2).rejects("one two three"));
        assert!(!Rule::more_words_than("many", 3).rejects("one two three"));
    }

    #[test]
    fn test_contains_any_is_case_insensitive() {
        let rule = Rule::contains_any("boilerplate", SENTENCE_BOILERPLATE);
        assert!(rule.rejects("SUBSCRIBE to our newsletter for updates."));
        assert!(rule.rejects("Please read our Cookie notice."));
        assert!(!rule.rejects("The river rose two metres overnight."));
    }

    #[test]
    fn test_only_phrases_catches_nav_bars() {
        let rule = Rule::only_phrases("nav-bar", LINE_BOILERPLATE);
        assert!(rule.rejects("Home | About | Contact | Privacy Policy"));
        assert!(rule.rejects("Sign up • Login"));
        assert!(!rule.rejects("Home prices rose sharply across the region"));
        assert!(!rule.rejects(""));
    }

    #[test]
    fn test_starts_with_any() {
        let rule = Rule::starts_with_any("lead-in", ["follow us", "share this"]);
        assert!(rule.rejects("  Follow us on every network we could find"));
        assert!(!rule.rejects("We follow us-centric rules"));
    }

    #[test]
    fn test_rule_set_reports_first_rejection_in_order() {
        let rules = RuleSet::new()
            .with(Rule::shorter_than("too-short", 10))
            .with(Rule::contains_any("boilerplate", ["home"]));

        assert_eq!(rules.first_rejection("Home."), Some("too-short"));
        assert_eq!(rules.first_rejection("Back to the home page"), Some("boilerplate"));
        assert_eq!(rules.first_rejection("A perfectly normal line"), None);
        assert!(rules.accepts("A perfectly normal line"));
        assert_eq!(rules.names(), vec!["too-short", "boilerplate"]);
    }

    #[test]
    fn test_empty_rule_set_accepts_everything() {
        let rules = RuleSet::new();
        assert!(rules.is_empty());
        assert!(rules.accepts(""));
    }

    #[test]
    fn test_landmark_marker() {
        assert!(is_landmark_marker("site-Navigation"));
        assert!(is_landmark_marker("ad-slot"));
        assert!(is_landmark_marker("left-sidebar"));
        assert!(!is_landmark_marker("article-body"));
    }
}
