//! Content selection: pick the main text of a parsed page.
//!
//! Uses scraper for HTML traversal. The document is only read, never
//! modified; navigation and other chrome is recognised by classifying
//! elements and skipping them during the walk.

use crate::config::SelectorConfig;
use crate::rules::{self, Rule, RuleSet};
use crate::text::{clean_text, word_count, PageText};
use lazy_static::lazy_static;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};

lazy_static! {
    static ref TITLE: Selector = Selector::parse("title").expect("valid selector");
    static ref H1: Selector = Selector::parse("h1").expect("valid selector");
    static ref BODY: Selector = Selector::parse("body").expect("valid selector");
    static ref TEXT_BEARING: Selector = Selector::parse(
        "p, h1, h2, h3, h4, h5, h6, li, blockquote, pre, dd, figcaption, td, div, section"
    )
    .expect("valid selector");
}

/// Subtrees that never contribute visible text
const HIDDEN_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "iframe", "object", "canvas",
];

/// Elements that start a new line of rendered text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "tr", "td", "th", "ul",
];

/// Where a candidate's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A main-content container matched by this selector
    MainContent { selector: String },
    /// Text-bearing elements outside landmarks, concatenated
    Aggregated { elements: usize },
    /// Body lines that survived the boilerplate filter
    FilteredBody,
}

/// A provisional text fragment considered during selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCandidate {
    pub text: String,
    pub provenance: Provenance,
    /// Character count of the cleaned text
    pub score: usize,
}

impl ContentCandidate {
    fn new(text: String, provenance: Provenance) -> Self {
        let score = text.chars().count();
        Self {
            text,
            provenance,
            score,
        }
    }
}

/// Chooses the main content of a document through an ordered cascade.
#[derive(Debug)]
pub struct ContentSelector {
    config: SelectorConfig,
    main_selectors: Vec<(String, Selector)>,
    line_rules: RuleSet,
}

impl Default for ContentSelector {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl ContentSelector {
    pub fn new(config: SelectorConfig) -> Self {
        let main_selectors = config
            .main_selectors
            .iter()
            .filter_map(|raw| match Selector::parse(raw) {
                Ok(selector) => Some((raw.clone(), selector)),
                Err(e) => {
                    warn!("Failed to parse selector '{}': {}", raw, e);
                    None
                }
            })
            .collect();
        let line_rules = line_rules(&config);

        Self {
            config,
            main_selectors,
            line_rules,
        }
    }

    /// Best-effort main text of the document. Possibly empty, never fails.
    pub fn select(&self, document: &Html) -> PageText {
        PageText::new(self.select_candidate(document).text)
    }

    /// The winning candidate, with its provenance.
    #[instrument(skip_all)]
    pub fn select_candidate(&self, document: &Html) -> ContentCandidate {
        let candidate = self
            .main_content(document)
            .or_else(|| self.aggregate_elements(document))
            .unwrap_or_else(|| self.filtered_body(document));

        debug!(
            "Selected {} chars via {:?}",
            candidate.score, candidate.provenance
        );
        candidate
    }

    /// Strategy 1: the first substantial main-content container.
    fn main_content(&self, document: &Html) -> Option<ContentCandidate> {
        for (raw, selector) in &self.main_selectors {
            for element in document.select(selector) {
                let text = clean_text(&visible_text(element, true));
                if self.is_substantial(&text) {
                    return Some(ContentCandidate::new(
                        text,
                        Provenance::MainContent {
                            selector: raw.clone(),
                        },
                    ));
                }
            }
        }
        None
    }

    /// Strategy 2: substantial text-bearing elements outside landmarks.
    fn aggregate_elements(&self, document: &Html) -> Option<ContentCandidate> {
        let mut accepted: Vec<ElementRef<'_>> = Vec::new();
        let mut parts = Vec::new();

        for element in document.select(&TEXT_BEARING) {
            if inside_accepted(element, &accepted) || in_landmark(element) {
                continue;
            }
            let text = clean_text(&visible_text(element, true));
            if self.is_substantial(&text) {
                accepted.push(element);
                parts.push(text);
            }
        }

        let elements = parts.len();
        let text = clean_text(&parts.join("\n\n"));
        if text.chars().count() > self.config.min_aggregate_chars {
            Some(ContentCandidate::new(text, Provenance::Aggregated { elements }))
        } else {
            debug!("Aggregation found only {} chars", text.chars().count());
            None
        }
    }

    /// Strategy 3: body lines that pass the boilerplate rules.
    fn filtered_body(&self, document: &Html) -> ContentCandidate {
        let cleaned = clean_text(&body_text(document));
        let lines: Vec<&str> = cleaned
            .lines()
            .filter(|line| self.line_rules.accepts(line))
            .collect();
        ContentCandidate::new(clean_text(&lines.join("\n\n")), Provenance::FilteredBody)
    }

    fn is_substantial(&self, text: &str) -> bool {
        text.chars().count() > self.config.min_candidate_chars
            && word_count(text) >= self.config.min_candidate_words
    }
}

/// Main text of `document` with the default settings.
pub fn select(document: &Html) -> PageText {
    ContentSelector::default().select(document)
}

fn line_rules(config: &SelectorConfig) -> RuleSet {
    let min_chars = config.min_line_chars;
    let min_symbolic = config.min_symbolic_line_chars;
    let lead_ins: Vec<&str> = rules::LINE_BOILERPLATE
        .iter()
        .copied()
        .filter(|phrase| phrase.contains(' '))
        .collect();

    RuleSet::new()
        .with(Rule::new("too-short", move |line| {
            let chars = line.chars().count();
            if line.chars().any(char::is_alphabetic) {
                chars < min_chars
            } else {
                chars < min_symbolic
            }
        }))
        .with(Rule::fewer_words_than("too-few-words", config.min_line_words))
        .with(Rule::only_phrases("nav-phrases", rules::LINE_BOILERPLATE))
        .with(Rule::starts_with_any("boilerplate-lead-in", lead_ins))
}

/// Raw visible text of the body, or of the whole document when there is none.
pub fn body_text(document: &Html) -> String {
    let root = document
        .select(&BODY)
        .next()
        .unwrap_or_else(|| document.root_element());
    visible_text(root, false)
}

/// Extract the page title from <title> or <h1>
pub fn extract_title(document: &Html) -> Option<String> {
    [&*TITLE, &*H1].into_iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
            .filter(|title| !title.is_empty())
    })
}

/// Rendered-ish text of an element: hidden subtrees dropped, block elements
/// on their own lines. With `skip_landmarks`, nested navigation and other
/// chrome is left out as well.
fn visible_text(element: ElementRef<'_>, skip_landmarks: bool) -> String {
    let mut walker = TextWalker {
        skip_landmarks,
        out: String::new(),
    };
    walker.walk(element, element.value().name() == "pre");
    walker.out
}

struct TextWalker {
    skip_landmarks: bool,
    out: String,
}

impl TextWalker {
    fn walk(&mut self, element: ElementRef<'_>, preformatted: bool) {
        for child in element.children() {
            match child.value() {
                // Source line breaks are plain whitespace outside <pre>.
                Node::Text(text) if preformatted => self.out.push_str(text),
                Node::Text(text) => self
                    .out
                    .extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c })),
                Node::Element(el) => {
                    let Some(child) = ElementRef::wrap(child) else {
                        continue;
                    };
                    let name = el.name();
                    if HIDDEN_TAGS.contains(&name) || (self.skip_landmarks && is_landmark(child)) {
                        continue;
                    }
                    if name == "br" {
                        self.out.push('\n');
                        continue;
                    }
                    let block = BLOCK_TAGS.contains(&name);
                    if block {
                        self.out.push('\n');
                    }
                    self.walk(child, preformatted || name == "pre");
                    if block {
                        self.out.push('\n');
                    }
                }
                _ => {}
            }
        }
    }
}

fn is_landmark(element: ElementRef<'_>) -> bool {
    let el = element.value();
    rules::LANDMARK_TAGS.contains(&el.name())
        || el.attr("role").is_some_and(|role| {
            matches!(role, "navigation" | "banner" | "contentinfo" | "complementary")
        })
        || el.id().is_some_and(rules::is_landmark_marker)
        || el.attr("class").is_some_and(rules::is_landmark_marker)
}

/// Whether the element or any ancestor below `<body>` is a landmark.
/// Page-wide classes on `<body>` and `<html>` (`has-sidebar`, `nav-open`)
/// say nothing about a single element.
fn in_landmark(element: ElementRef<'_>) -> bool {
    is_landmark(element)
        || element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .take_while(|ancestor| !matches!(ancestor.value().name(), "body" | "html"))
            .any(is_landmark)
}

/// Whether an ancestor of `element` was already taken whole
fn inside_accepted(element: ElementRef<'_>, accepted: &[ElementRef<'_>]) -> bool {
    element
        .ancestors()
        .any(|ancestor| accepted.iter().any(|taken| ancestor == **taken))
}
