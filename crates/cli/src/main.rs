//! Get Notes CLI
//!
//! Main entry point for the getnote command-line tool.
//! Answers questions from a Get Notes knowledge base with cited notes.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, SearchCommand};
use getnote_core::config::{AppConfig, CliOverrides};
use getnote_core::logging::{self, LoggingOptions};
use getnote_core::AppResult;
use std::path::PathBuf;
use std::time::Instant;

/// Get Notes CLI - cited answers from your notes
#[derive(Parser, Debug)]
#[command(name = "getnote")]
#[command(about = "Answer questions from a Get Notes knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "GETNOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Knowledge base id
    #[arg(long, global = true)]
    kb_id: Option<String>,

    /// Log level or filter directive (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question and get a cited answer
    Ask(AskCommand),

    /// Show the notes retrieved for a question
    Search(SearchCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Values from .env never override the real environment
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config)?.with_overrides(CliOverrides {
        kb_id: cli.kb_id,
        provider: cli.provider,
        model: cli.model,
        log_level: cli.log_level,
        log_file: cli.log_file,
        log_json: cli.log_json,
        verbose: cli.verbose,
        no_color: cli.no_color,
    });

    logging::init_logging(&LoggingOptions::from(&config))?;

    tracing::info!("Get Notes CLI starting");
    tracing::debug!("Config file: {:?}", config.config_file);
    tracing::debug!("Provider: {}", config.llm.provider);
    tracing::debug!("Model: {}", config.llm.model);

    let started = Instant::now();

    // Generation settings are checked by the commands that generate
    config.validate_retrieval()?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Search(_) => "search",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Search(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!(
            "Command completed in {:.2}s",
            started.elapsed().as_secs_f64()
        ),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
