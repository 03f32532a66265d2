//! Summarizer: model first, heuristic tiers after.
//!
//! [`Summarizer::summarize`] never returns an error. Model trouble of any
//! kind is logged and the heuristic extractor takes over; a panic anywhere
//! ends in the canned failure message.

use crate::agent::{AgentError, ModelCapability, SessionConfig};
use crate::config::SummarizerConfig;
use crate::heuristic::HeuristicExtractor;
use crate::summary::Summary;
use crate::text::truncate_chars;
use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub struct Summarizer {
    config: SummarizerConfig,
    session: SessionConfig,
    heuristic: HeuristicExtractor,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new(SummarizerConfig::default())
    }
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self {
            heuristic: HeuristicExtractor::new(config.clone()),
            session: SessionConfig::default(),
            config,
        }
    }

    /// Use `session` when creating model sessions
    pub fn with_session_config(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Summarise `text`, using `model` when it is present and ready.
    ///
    /// A non-zero `model_timeout_secs` needs a Tokio runtime with the time
    /// driver enabled. Without one the model call fails and the heuristic
    /// answers.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn summarize(&self, text: &str, model: Option<&dyn ModelCapability>) -> Summary {
        if let Some(model) = model {
            if self.heuristic.has_enough_content(text) {
                match self.try_model(text, model).await {
                    Ok(Some(summary)) => return summary,
                    Ok(None) => debug!("Model not usable, using heuristic summary"),
                    Err(e) => warn!("Model summarization failed: {}, falling back", e),
                }
            }
        }
        self.summarize_heuristic(text)
    }

    /// Heuristic tiers only, with panics turned into the canned message.
    pub fn summarize_heuristic(&self, text: &str) -> Summary {
        panic::catch_unwind(AssertUnwindSafe(|| self.heuristic.summarize(text))).unwrap_or_else(
            |_| {
                warn!("Heuristic summarization panicked");
                panic::catch_unwind(AssertUnwindSafe(|| self.heuristic.overview(text)))
                    .unwrap_or_else(|_| Summary::failed())
            },
        )
    }

    /// `Ok(None)` when the model reports itself unusable.
    async fn try_model(
        &self,
        text: &str,
        model: &dyn ModelCapability,
    ) -> Result<Option<Summary>, AgentError> {
        let availability = match guard(model.availability()).await {
            Ok(availability) => availability,
            Err(e) => {
                debug!("Availability check failed: {}", e);
                return Ok(None);
            }
        };
        info!("Model availability: {:?}", availability);
        if !availability.is_usable() {
            return Ok(None);
        }

        let prompt = self.build_prompt(text);
        let call = async {
            let mut session = model.create_session(&self.session).await?;
            session.prompt(&prompt).await
        };

        // The timer is built inside the guard: it panics without a runtime.
        let secs = self.config.model_timeout_secs;
        let response = guard(async {
            if secs == 0 {
                return call.await;
            }
            tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| AgentError::Timeout(secs))?
        })
        .await?;

        if response.trim().is_empty() {
            return Err(AgentError::EmptyResponse);
        }
        Ok(Some(Summary::model(&response)))
    }

    fn build_prompt(&self, text: &str) -> String {
        let text = truncate_chars(text, self.config.model_input_chars);
        format!("{}\n\n{}", self.config.prompt_preamble, text)
    }
}

/// Run a capability future, turning a panic inside it into an error.
async fn guard<F, T>(future: F) -> Result<T, AgentError>
where
    F: std::future::Future<Output = Result<T, AgentError>>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or(Err(AgentError::Panicked))
}
