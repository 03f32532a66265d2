//! Simplify CLI - page text extraction and summarisation
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use simplify::transport::Message;
use simplify::{Config, ContentSelector, Html, ModelCapability, Pipeline};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "simplify")]
#[command(author, version, about = "Extract and summarise the main text of a web page", long_about = None)]
struct Cli {
    /// Config file (default: ./simplify.toml or ~/.config/simplify/simplify.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise an HTML page
    Summarise {
        /// HTML file, or - for stdin
        input: PathBuf,
        /// Show the selected page text instead of a summary
        #[arg(long)]
        raw: bool,
        /// Print the result as a display_result message
        #[arg(long)]
        json: bool,
        /// Never use the language model
        #[arg(long)]
        no_model: bool,
    },
    /// Show which text the content selector picks
    Extract {
        /// HTML file, or - for stdin
        input: PathBuf,
    },
    /// Answer JSON-lines messages on stdin
    Pipe {
        /// Never use the language model
        #[arg(long)]
        no_model: bool,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Summarise {
            input,
            raw,
            json,
            no_model,
        } => {
            let document = Html::parse_document(&read_input(&input)?);
            let pipeline = Pipeline::new(&config);

            if raw {
                let extraction = pipeline.extract(&document);
                let title = extraction.title.as_deref().unwrap_or("No title");
                println!("\n=== {} ===\n", title.bold());
                println!("{}", extraction.text);
                println!(
                    "\n--- Extracted {} characters ---",
                    extraction.text.char_count()
                );
                return Ok(());
            }

            let model = model_for(&config, no_model);
            let (extraction, summary) = pipeline
                .summarize_page(&document, model.as_ref().map(|m| m as &dyn ModelCapability))
                .await;

            if json {
                let message = Message::display_result(summary.into_string(), None);
                println!("{}", serde_json::to_string(&message)?);
            } else {
                if let Some(title) = extraction.title {
                    println!("=== {} ===\n", title.bold());
                }
                println!("{}", summary.to_string().cyan());
            }
        }
        Commands::Extract { input } => {
            let document = Html::parse_document(&read_input(&input)?);
            let candidate = ContentSelector::new(config.selector.clone()).select_candidate(&document);
            let title = simplify::selector::extract_title(&document);

            println!("{} {}", "Title:".bold(), title.as_deref().unwrap_or("-"));
            println!("{} {:?}", "Strategy:".bold(), candidate.provenance);
            println!("{} {} chars\n", "Length:".bold(), candidate.score);
            println!("{}", candidate.text);
        }
        Commands::Pipe { no_model } => {
            let pipeline = Pipeline::new(&config);
            let model = model_for(&config, no_model);
            run_pipe(&pipeline, model.as_ref().map(|m| m as &dyn ModelCapability)).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "simplify", &mut io::stdout());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn model_for(config: &Config, no_model: bool) -> Option<simplify::agent::CommandModel> {
    if no_model {
        return None;
    }
    Pipeline::model_from_config(config)
}

/// Read the HTML input from a file, or stdin for `-`
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .context("reading HTML from stdin")?;
        return Ok(html);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// One message per line in, one reply per line out.
async fn run_pipe(pipeline: &Pipeline, model: Option<&dyn ModelCapability>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Message>(&line) {
            Ok(message) => pipeline.handle(message, model).await,
            Err(e) => {
                tracing::warn!("Invalid message: {}", e);
                Some(Message::display_error(format!("invalid message: {e}"), None))
            }
        };
        if let Some(reply) = reply {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", serde_json::to_string(&reply)?)?;
            stdout.flush()?;
        }
    }

    Ok(())
}
