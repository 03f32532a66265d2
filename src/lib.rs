//! # Simplify
//!
//! Pulls the main text out of a web page and summarises it, with an
//! on-device language model when one is available and heuristic sentence
//! selection when it is not.
//!
//! ## Features
//!
//! - **Content selection**: main-content containers first, then aggregated
//!   text elements outside navigation, then line-filtered body text
//! - **Always an answer**: model → strict sentences → lenient overview → canned message
//! - **Injected model**: anything implementing [`ModelCapability`], e.g. a local llama.cpp CLI
//!
//! ```no_run
//! # async fn demo() {
//! use simplify::{Html, Pipeline};
//!
//! let document = Html::parse_document("<main><p>...</p></main>");
//! let pipeline = Pipeline::default();
//! let (_extraction, summary) = pipeline.summarize_page(&document, None).await;
//! println!("{summary}");
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod heuristic;
pub mod pipeline;
pub mod rules;
pub mod selector;
pub mod summarizer;
pub mod summary;
pub mod text;
pub mod transport;

pub use agent::{Availability, ModelCapability, Session, SessionConfig};
pub use config::Config;
pub use pipeline::Pipeline;
pub use scraper::Html;
pub use selector::ContentSelector;
pub use summarizer::Summarizer;
pub use summary::{Summary, SummaryKind};
pub use text::PageText;
pub use transport::Message;
