//! Content selector tests
//!
//! These tests run whole documents through the selection cascade.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simplify::config::SelectorConfig;
use simplify::selector::{self, ContentSelector, Provenance};
use simplify::Html;

const ARTICLE: &str = "Engineers finished the new tidal barrier this spring after six years \
                       of work. The structure can close in under ten minutes when a storm \
                       surge is forecast, protecting nearly forty thousand homes upstream.";

#[test]
fn test_main_text_without_nav() {
    let html = format!(
        r#"<html>
        <head><title>Barrier opens</title></head>
        <body>
          <nav class="top-nav"><a href="/">Home</a> <a href="/about">About</a> <a>Contact</a></nav>
          <main>
            <h1>Barrier opens</h1>
            <p>{ARTICLE}</p>
          </main>
          <footer>Privacy Policy | Terms of Service</footer>
        </body></html>"#
    );
    let document = Html::parse_document(&html);
    let text = selector::select(&document);

    assert!(text.as_str().starts_with("Barrier opens"));
    assert!(text.as_str().contains("protecting nearly forty thousand homes upstream."));
    assert!(!text.as_str().contains("Contact"));
    assert!(!text.as_str().contains("Privacy"));
}

#[test]
fn test_nav_inside_main_is_skipped() {
    let html = format!(
        "<body><main><div class='breadcrumb-menu'>Home &gt; News &gt; Local</div>\
         <p>{ARTICLE}</p><aside>Related articles you may also like</aside></main></body>"
    );
    let text = selector::select(&Html::parse_document(&html));
    assert!(!text.as_str().contains("News"));
    assert!(!text.as_str().contains("Related"));
    assert!(text.as_str().contains("tidal barrier"));
}

#[test]
fn test_role_main_landmark() {
    let html = format!("<body><div role='main'><p>{ARTICLE}</p></div></body>");
    let candidate = ContentSelector::default().select_candidate(&Html::parse_document(&html));
    assert_eq!(
        candidate.provenance,
        Provenance::MainContent {
            selector: "[role='main']".to_string()
        }
    );
}

#[test]
fn test_paragraphs_are_joined_with_blank_lines() {
    let html = format!(
        "<body><div class='wrap'><section><p>{ARTICLE}</p></section></div>\
         <section><p>{ARTICLE}</p></section></body>"
    );
    let candidate = ContentSelector::default().select_candidate(&Html::parse_document(&html));
    assert_eq!(candidate.provenance, Provenance::Aggregated { elements: 2 });
    let blocks: Vec<&str> = candidate.text.split("\n\n").collect();
    assert_eq!(blocks.len(), 2);
    assert_eq!(candidate.score, candidate.text.chars().count());
}

#[test]
fn test_short_aggregate_falls_through_to_lines() {
    let config = SelectorConfig {
        min_aggregate_chars: 10_000,
        ..SelectorConfig::default()
    };
    let html = format!("<body><div><p>{ARTICLE}</p></div></body>");
    let candidate = ContentSelector::new(config).select_candidate(&Html::parse_document(&html));
    assert_eq!(candidate.provenance, Provenance::FilteredBody);
    assert!(candidate.text.contains("tidal barrier"));
}

#[test]
fn test_all_boilerplate_document_yields_empty_text() {
    let html = "<body><nav>Home</nav><div>Login</div><footer>Cookie policy</footer>\
                <span>Skip to content</span></body>";
    let text = selector::select(&Html::parse_document(html));
    assert_eq!(text.as_str(), "");
}

#[test]
fn test_fragment_without_body() {
    let document = Html::parse_fragment("<p>Just a fragment of text with a handful of words in it</p>");
    let text = selector::select(&document);
    assert_eq!(
        text.as_str(),
        "Just a fragment of text with a handful of words in it"
    );
}

#[test]
fn test_document_is_not_modified() {
    let html = format!("<body><nav>Home About</nav><main><p>{ARTICLE}</p></main></body>");
    let document = Html::parse_document(&html);
    let before = document.html();
    let first = selector::select(&document);
    let second = selector::select(&document);
    assert_eq!(first, second);
    assert_eq!(document.html(), before);
}

proptest! {
    #[test]
    fn prop_select_never_panics(body in ".{0,400}") {
        let document = Html::parse_document(&body);
        let _ = selector::select(&document);
    }

    #[test]
    fn prop_select_on_tags_never_panics(
        parts in prop::collection::vec(
            prop_oneof![
                Just("<nav>".to_string()),
                Just("</nav>".to_string()),
                Just("<main>".to_string()),
                Just("<p>".to_string()),
                Just("</p>".to_string()),
                Just("<div class='ad-slot'>".to_string()),
                Just("</div>".to_string()),
                "[a-zA-Z .!?]{0,60}",
            ],
            0..40,
        )
    ) {
        let document = Html::parse_document(&parts.concat());
        let text = selector::select(&document);
        prop_assert_eq!(text.as_str().trim(), text.as_str());
    }
}
