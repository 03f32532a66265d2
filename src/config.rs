//! Configuration loading and management for simplify.
//!
//! Loads settings from `simplify.toml` with environment variable overrides.
//! Every field has a default, so running without a config file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "simplify.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid value for {0}")]
    Invalid(String),
}

/// Content selector settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Main-content selectors, highest priority first
    pub main_selectors: Vec<String>,
    /// A candidate must be longer than this many characters
    pub min_candidate_chars: usize,
    /// ...and have at least this many words
    pub min_candidate_words: usize,
    /// Aggregated element text must be longer than this
    pub min_aggregate_chars: usize,
    /// Minimum characters for a kept body line
    pub min_line_chars: usize,
    /// Minimum characters for a kept body line without any letters
    pub min_symbolic_line_chars: usize,
    /// Minimum words for a kept body line
    pub min_line_words: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            main_selectors: [
                "main",
                "article",
                "[role='main']",
                "#content",
                "#main-content",
                ".main-content",
                ".content",
                ".post-content",
                ".entry-content",
                ".article-body",
                ".story-body",
                ".post",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            min_candidate_chars: 50,
            min_candidate_words: 10,
            min_aggregate_chars: 100,
            min_line_chars: 20,
            min_symbolic_line_chars: 25,
            min_line_words: 4,
        }
    }
}

/// Summarizer settings, for both the model and the heuristic tiers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Inputs shorter than this get the "not enough content" message
    pub min_input_chars: usize,
    pub min_sentence_chars: usize,
    pub max_sentence_chars: usize,
    pub min_sentence_words: usize,
    pub max_sentence_words: usize,
    /// How many sentences a heuristic summary keeps
    pub max_sentences: usize,
    /// Boilerplate terms added to the built-in lexicon
    pub extra_boilerplate: Vec<String>,
    pub overview_min_block_chars: usize,
    pub overview_max_block_chars: usize,
    /// Characters of raw text shown when no block qualifies
    pub overview_preview_chars: usize,
    /// Instruction placed in front of the page text in the model prompt
    pub prompt_preamble: String,
    /// Page text is cut to this many characters before prompting
    pub model_input_chars: usize,
    /// Bound on session creation plus prompt, 0 to wait forever
    pub model_timeout_secs: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            min_input_chars: 50,
            min_sentence_chars: 20,
            max_sentence_chars: 200,
            min_sentence_words: 5,
            max_sentence_words: 25,
            max_sentences: 5,
            extra_boilerplate: Vec::new(),
            overview_min_block_chars: 30,
            overview_max_block_chars: 500,
            overview_preview_chars: 300,
            prompt_preamble: "Summarize the following web page content in 3-5 short bullet \
                              points. Focus on the main ideas and ignore navigation, ads and \
                              other boilerplate."
                .to_string(),
            model_input_chars: 15_000,
            model_timeout_secs: 60,
        }
    }
}

/// Local on-device model, run as a child process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub enabled: bool,
    /// Program to run, e.g. a llama.cpp CLI; unset means no model
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Sent ahead of every prompt
    pub system_prompt: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
            args: Vec::new(),
            system_prompt: None,
        }
    }
}

/// Transport boundary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Page text is cut to this many characters before it reaches the summarizer
    pub max_payload_chars: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_payload_chars: 20_000,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub selector: SelectorConfig,
    pub summarizer: SummarizerConfig,
    pub model: ModelConfig,
    pub transport: TransportConfig,
}

impl Config {
    /// Load configuration from the default location, or defaults if there is none
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::parse_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::parse_file(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    fn parse_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(command) = std::env::var("SIMPLIFY_MODEL_COMMAND") {
            self.model.command = Some(command).filter(|c| !c.trim().is_empty());
        }
        if let Ok(secs) = std::env::var("SIMPLIFY_MODEL_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(secs) => self.summarizer.model_timeout_secs = secs,
                Err(_) => tracing::warn!("ignoring SIMPLIFY_MODEL_TIMEOUT_SECS={secs:?}"),
            }
        }
    }

    /// Reject settings the pipeline cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.summarizer;
        if s.min_sentence_chars > s.max_sentence_chars {
            return Err(ConfigError::Invalid("summarizer.min_sentence_chars".to_string()));
        }
        if s.min_sentence_words > s.max_sentence_words {
            return Err(ConfigError::Invalid("summarizer.min_sentence_words".to_string()));
        }
        if s.overview_min_block_chars > s.overview_max_block_chars {
            return Err(ConfigError::Invalid(
                "summarizer.overview_min_block_chars".to_string(),
            ));
        }
        if s.max_sentences == 0 {
            return Err(ConfigError::Invalid("summarizer.max_sentences".to_string()));
        }
        if s.overview_preview_chars == 0 {
            return Err(ConfigError::Invalid(
                "summarizer.overview_preview_chars".to_string(),
            ));
        }
        if self.transport.max_payload_chars == 0 {
            return Err(ConfigError::Invalid("transport.max_payload_chars".to_string()));
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("simplify")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }
}
