//! Selector → transport cap → summarizer, wired together.

use crate::agent::{CommandModel, ModelCapability, SessionConfig};
use crate::config::Config;
use crate::selector::{self, ContentSelector};
use crate::summarizer::Summarizer;
use crate::summary::Summary;
use crate::text::PageText;
use crate::transport::{self, Message, RequestTracker};
use scraper::Html;
use tracing::{debug, info, instrument, warn};

/// Page text as handed over by the selector
#[derive(Debug, Clone)]
pub struct Extraction {
    pub title: Option<String>,
    pub text: PageText,
}

/// Reply to an `extract_content` message, which carries no document
pub const EXTRACT_NEEDS_DOCUMENT: &str =
    "extract_content needs a document; send process_text with the page text";

pub struct Pipeline {
    selector: ContentSelector,
    summarizer: Summarizer,
    max_payload_chars: usize,
    requests: RequestTracker,
}

impl Pipeline {
    pub fn new(config: &Config) -> Self {
        let session = SessionConfig {
            system_prompt: config.model.system_prompt.clone(),
        };
        Self {
            selector: ContentSelector::new(config.selector.clone()),
            summarizer: Summarizer::new(config.summarizer.clone()).with_session_config(session),
            max_payload_chars: config.transport.max_payload_chars,
            requests: RequestTracker::new(),
        }
    }

    /// The model configured in `config`, if one is enabled
    pub fn model_from_config(config: &Config) -> Option<CommandModel> {
        (config.model.enabled && config.model.command.is_some())
            .then(|| CommandModel::from_config(&config.model))
    }

    /// Select the main text and cap it at the payload limit.
    #[instrument(skip_all)]
    pub fn extract(&self, document: &Html) -> Extraction {
        let selected = self.selector.select(document);
        let text = transport::truncate_payload(&selected, self.max_payload_chars);
        if text.char_count() < selected.char_count() {
            debug!(
                "Truncated page text from {} to {} chars",
                selected.char_count(),
                text.char_count()
            );
        }
        Extraction {
            title: selector::extract_title(document),
            text,
        }
    }

    pub async fn summarize_text(&self, text: &str, model: Option<&dyn ModelCapability>) -> Summary {
        self.summarizer.summarize(text, model).await
    }

    /// Full run over a parsed page.
    pub async fn summarize_page(
        &self,
        document: &Html,
        model: Option<&dyn ModelCapability>,
    ) -> (Extraction, Summary) {
        let extraction = self.extract(document);
        let summary = self.summarize_text(extraction.text.as_str(), model).await;
        info!(
            "Summarized {} chars into {:?} summary",
            extraction.text.char_count(),
            summary.kind()
        );
        (extraction, summary)
    }

    /// Answer one transport message.
    ///
    /// `process_text` gets its summary and `extract_content` an error, as
    /// there is no document to select from. Anything else gets no reply.
    pub async fn handle(
        &self,
        message: Message,
        model: Option<&dyn ModelCapability>,
    ) -> Option<Message> {
        match message {
            Message::ProcessText { data, request_id } => {
                let id = match request_id {
                    Some(id) => {
                        self.requests.observe(id);
                        id
                    }
                    None => self.requests.begin(),
                };
                let capped = transport::truncate_payload(&PageText::new(data), self.max_payload_chars);
                let summary = self.summarize_text(capped.as_str(), model).await;
                Some(Message::display_result(summary.into_string(), Some(id)))
            }
            Message::ExtractContent { request_id } => {
                warn!("extract_content received without a document");
                Some(Message::display_error(EXTRACT_NEEDS_DOCUMENT, request_id))
            }
            other => {
                debug!("Ignoring {:?}", other);
                None
            }
        }
    }

    pub fn requests(&self) -> &RequestTracker {
        &self.requests
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
