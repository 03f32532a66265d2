//! Language model capability consumed by the summarizer.
//!
//! The capability is passed in explicitly. [`CommandModel`] is the bundled
//! implementation: an on-device model run as a local program.

use crate::config::ModelConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("availability check failed: {0}")]
    AvailabilityFailed(String),
    #[error("failed to create session: {0}")]
    SessionFailed(String),
    #[error("prompt failed: {0}")]
    PromptFailed(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model did not answer within {0} seconds")]
    Timeout(u64),
    #[error("model panicked")]
    Panicked,
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Whether the model can be used now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    /// Usable once fetched; creating a session starts the download
    Downloadable,
    Downloading,
    Unavailable,
    Unsupported,
}

impl Availability {
    pub fn is_usable(self) -> bool {
        matches!(self, Availability::Available | Availability::Downloadable)
    }
}

/// Options for a new session
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub system_prompt: Option<String>,
}

/// A generative model the summarizer may use.
#[async_trait]
pub trait ModelCapability: Send + Sync {
    async fn availability(&self) -> Result<Availability, AgentError>;

    async fn create_session(&self, config: &SessionConfig)
        -> Result<Box<dyn Session>, AgentError>;
}

/// A stateful conversation with the model.
#[async_trait]
pub trait Session: Send {
    /// Submit one prompt and await one text reply
    async fn prompt(&mut self, text: &str) -> Result<String, AgentError>;
}

/// On-device model run as a child process.
///
/// Each prompt spawns `command args...`, writes the prompt to stdin and
/// reads the reply from stdout.
#[derive(Debug, Clone)]
pub struct CommandModel {
    command: Option<String>,
    args: Vec<String>,
    system_prompt: Option<String>,
}

impl CommandModel {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: Some(command.into()),
            args,
            system_prompt: None,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            command: config.command.clone().filter(|_| config.enabled),
            args: config.args.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }

    fn resolve(&self) -> Option<PathBuf> {
        self.command.as_deref().and_then(resolve_program)
    }
}

#[async_trait]
impl ModelCapability for CommandModel {
    async fn availability(&self) -> Result<Availability, AgentError> {
        if self.command.is_none() {
            return Ok(Availability::Unsupported);
        }
        Ok(match self.resolve() {
            Some(path) => {
                debug!("Model program found at {}", path.display());
                Availability::Available
            }
            None => Availability::Unavailable,
        })
    }

    async fn create_session(
        &self,
        config: &SessionConfig,
    ) -> Result<Box<dyn Session>, AgentError> {
        let program = self.resolve().ok_or_else(|| {
            AgentError::SessionFailed(format!(
                "model program not found: {}",
                self.command.as_deref().unwrap_or("<unset>")
            ))
        })?;
        info!("Starting model session with {}", program.display());

        Ok(Box::new(CommandSession {
            program,
            args: self.args.clone(),
            system_prompt: config
                .system_prompt
                .clone()
                .or_else(|| self.system_prompt.clone()),
        }))
    }
}

struct CommandSession {
    program: PathBuf,
    args: Vec<String>,
    system_prompt: Option<String>,
}

#[async_trait]
impl Session for CommandSession {
    async fn prompt(&mut self, text: &str) -> Result<String, AgentError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let input = match &self.system_prompt {
            Some(system) => format!("{system}\n\n{text}"),
            None => text.to_string(),
        };
        // Fed from a task so a chatty program cannot fill stdout while we write.
        // Dropping stdin at the end closes the pipe and the program sees EOF.
        let writer = child.stdin.take().map(|mut stdin| {
            tokio::spawn(async move { stdin.write_all(input.as_bytes()).await })
        });

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            if let Ok(Err(e)) = writer.await {
                // A program may exit without reading its input.
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AgentError::PromptFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let reply = strip_code_fence(&String::from_utf8_lossy(&output.stdout));
        if reply.is_empty() {
            return Err(AgentError::EmptyResponse);
        }
        Ok(reply)
    }
}

/// Find `program` as given, or on `PATH` when it is a bare name.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let path = Path::new(program);
    if path.components().count() > 1 || path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    let search = std::env::var_os("PATH")?;
    std::env::split_paths(&search)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// Strip a markdown code block wrapper from a model reply
pub fn strip_code_fence(text: &str) -> String {
    let trimmed = text.trim();

    // Remove ```lang ... ``` or ``` ... ```
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        if let Some(end_idx) = body.rfind("```") {
            return body[..end_idx].trim().to_string();
        }
    }

    trimmed.to_string()
}
