//! Ask command handler.
//!
//! Runs the full pipeline and prints a cited answer.

use clap::Args;
use getnote_core::{config::AppConfig, AppError, AppResult};
use getnote_knowledge::{GenerationResult, RagPipeline};

/// Message shown instead of backend details when generation fails.
const GENERATION_FAILED: &str =
    "Failed to generate an answer. Check the text-generation backend and try again.";

/// Ask a question and get a cited answer
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Maximum number of notes used as context (default: from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Minimum relevance score for a note to be used (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Also print the notes the answer was built from
    #[arg(long)]
    pub show_notes: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let config = super::with_threshold(config, self.threshold)?;
        config.validate_generation()?;
        let top_k = self.top_k.unwrap_or(config.top_k);
        let pipeline = RagPipeline::from_config(&config)?;

        let response = pipeline
            .ask(&self.question, top_k)
            .await
            .map_err(hide_generation_detail)?;

        if self.json {
            let output = if self.show_notes {
                serde_json::to_value(&response)?
            } else {
                serde_json::to_value(&response.result)?
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        print_answer(&response.result);

        if self.show_notes {
            println!();
            super::print_notes(&response.notes);
        }

        Ok(())
    }
}

/// Replace backend detail in generation failures with a generic message.
///
/// The detail is logged; the returned error is what the user sees, once.
fn hide_generation_detail(err: AppError) -> AppError {
    if err.is_generation() {
        tracing::error!("{}", err);
        AppError::Generation(GENERATION_FAILED.to_string())
    } else {
        err
    }
}

fn print_answer(result: &GenerationResult) {
    println!("Answer:");
    println!("{}", result.answer);

    if !result.has_relevant_notes {
        return;
    }

    println!();
    println!("References:");
    for reference in &result.references {
        println!(
            "- [{}] {} (relevance: {:.2})",
            reference.reference_id, reference.title, reference.relevance_score
        );
    }

    if result.cited_references().is_empty() {
        tracing::warn!("Answer does not cite any note");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failure_is_generic() {
        let err = hide_generation_detail(AppError::Generation(
            "Text generation failed: insufficient_quota".to_string(),
        ));

        match err {
            AppError::Generation(message) => {
                assert_eq!(message, GENERATION_FAILED);
                assert!(!message.contains("insufficient_quota"));
            }
            other => panic!("Expected generation error, got {:?}", other),
        }
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = hide_generation_detail(AppError::Config("KB id not set".to_string()));
        assert!(matches!(err, AppError::Config(message) if message == "KB id not set"));
    }
}
