//! End-to-end pipeline tests: HTML in, summary or message out.

use async_trait::async_trait;
use simplify::agent::AgentError;
use simplify::config::Config;
use simplify::transport::{Message, RequestId};
use simplify::{
    Availability, Html, ModelCapability, Pipeline, Session, SessionConfig, SummaryKind,
};

const PAGE: &str = r#"<html>
<head><title>Harbour report</title><script>window.track = "nav footer";</script></head>
<body>
  <header class="masthead"><a>Home</a> <a>Subscribe</a></header>
  <nav><ul><li>Home</li><li>About</li><li>Sign up</li></ul></nav>
  <main>
    <p>The harbour authority reopened the eastern pier on Tuesday after repairs to the
       storm-damaged decking were completed ahead of schedule.</p>
    <p>Fishing crews said the reopening would let them land catches closer to the market
       and cut their fuel costs during the busy autumn season.</p>
    <p>Subscribe to our newsletter for updates.</p>
  </main>
  <footer>Privacy policy. Cookie policy. Follow us.</footer>
</body></html>"#;

struct StaticModel(&'static str);

struct StaticSession(&'static str);

#[async_trait]
impl ModelCapability for StaticModel {
    async fn availability(&self) -> Result<Availability, AgentError> {
        Ok(Availability::Available)
    }

    async fn create_session(&self, _: &SessionConfig) -> Result<Box<dyn Session>, AgentError> {
        Ok(Box::new(StaticSession(self.0)))
    }
}

#[async_trait]
impl Session for StaticSession {
    async fn prompt(&mut self, _text: &str) -> Result<String, AgentError> {
        Ok(self.0.to_string())
    }
}

#[tokio::test]
async fn test_page_to_heuristic_summary() {
    let pipeline = Pipeline::default();
    let document = Html::parse_document(PAGE);
    let (extraction, summary) = pipeline.summarize_page(&document, None).await;

    assert_eq!(extraction.title.as_deref(), Some("Harbour report"));
    assert!(!extraction.text.as_str().contains("Sign up"));
    assert!(!extraction.text.as_str().contains("track"));

    assert_eq!(summary.kind(), SummaryKind::Heuristic);
    let text = summary.as_str();
    assert!(text.contains("reopened the eastern pier on Tuesday"));
    assert!(text.contains("Fishing crews said"));
    assert!(!text.contains("newsletter"));
    assert!(!text.contains("Follow us"));
}

#[tokio::test]
async fn test_heading_stays_out_of_heuristic_summary() {
    let page = r#"<html><body><main>
        <h2>Barrier opens</h2>
        <p>Engineers finished the new tidal barrier this spring after six years of work.
           The structure protects four thousand houses from winter storm surges.</p>
    </main></body></html>"#;
    let pipeline = Pipeline::default();
    let (_, summary) = pipeline
        .summarize_page(&Html::parse_document(page), None)
        .await;

    assert_eq!(summary.kind(), SummaryKind::Heuristic);
    assert!(!summary.as_str().contains("Barrier opens"));
    assert!(summary.as_str().contains(
        "Engineers finished the new tidal barrier this spring after six years of work. \
         The structure protects four thousand houses from winter storm surges."
    ));
}

#[tokio::test]
async fn test_page_to_model_summary() {
    let pipeline = Pipeline::default();
    let model = StaticModel("The eastern pier is open again.");
    let document = Html::parse_document(PAGE);
    let (_, summary) = pipeline.summarize_page(&document, Some(&model)).await;

    assert_eq!(summary.kind(), SummaryKind::Model);
    assert!(summary.as_str().ends_with("The eastern pier is open again."));
}

#[tokio::test]
async fn test_payload_is_capped() {
    let mut config = Config::default();
    config.transport.max_payload_chars = 40;
    let pipeline = Pipeline::new(&config);

    let extraction = pipeline.extract(&Html::parse_document(PAGE));
    assert_eq!(extraction.text.char_count(), 40);
}

#[tokio::test]
async fn test_process_text_gets_display_result() {
    let pipeline = Pipeline::default();
    let message = Message::ProcessText {
        data: "Tiny".to_string(),
        request_id: Some(RequestId(3)),
    };

    let reply = pipeline.handle(message, None).await;
    match reply {
        Some(Message::DisplayResult { data, request_id }) => {
            assert!(!data.is_empty());
            assert_eq!(request_id, Some(RequestId(3)));
        }
        other => panic!("unexpected reply: {other:?}"),
    }
    assert!(pipeline.requests().is_current(RequestId(3)));
}

#[tokio::test]
async fn test_untagged_requests_get_fresh_ids() {
    let pipeline = Pipeline::default();
    let text = "The council voted to rebuild the bridge before winter arrives in the valley.";

    let first = pipeline
        .handle(Message::ProcessText { data: text.to_string(), request_id: None }, None)
        .await
        .and_then(|reply| reply.request_id())
        .unwrap();
    let second = pipeline
        .handle(Message::ProcessText { data: text.to_string(), request_id: None }, None)
        .await
        .and_then(|reply| reply.request_id())
        .unwrap();

    assert!(second > first);
    assert!(!pipeline.requests().is_current(first));
}

#[tokio::test]
async fn test_extract_content_gets_an_error_reply() {
    let pipeline = Pipeline::default();
    let reply = pipeline
        .handle(
            Message::ExtractContent {
                request_id: Some(RequestId(7)),
            },
            None,
        )
        .await;

    match reply {
        Some(Message::DisplayError { data, request_id }) => {
            assert!(data.contains("process_text"));
            assert_eq!(request_id, Some(RequestId(7)));
        }
        other => panic!("expected display_error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_display_messages_get_no_reply() {
    let pipeline = Pipeline::default();
    assert!(pipeline
        .handle(Message::display_error("x", None), None)
        .await
        .is_none());
    assert!(pipeline
        .handle(Message::display_result("x", None), None)
        .await
        .is_none());
}
