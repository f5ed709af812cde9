//! Search command handler.
//!
//! Runs retrieval only and lists the notes that passed the relevance filter.

use clap::Args;
use getnote_core::{config::AppConfig, AppResult};
use getnote_knowledge::{FilteredNote, NoteRetriever, RetrievalOutcome};

/// Shown when the search endpoint fails; details go to the log only.
const SEARCH_UNAVAILABLE: &str = "Search is unavailable right now, try again later.";

/// Show the notes retrieved for a question
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// The question to search for
    pub question: String,

    /// Maximum number of notes to show (default: from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Minimum relevance score for a note to be shown (0.0-1.0)
    #[arg(long)]
    pub threshold: Option<f32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    /// Execute the search command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let config = super::with_threshold(config, self.threshold)?;
        let top_k = self.top_k.unwrap_or(config.top_k);
        let retriever = NoteRetriever::connect(&config)?;

        let (notes, notice) = split_outcome(retriever.retrieve_outcome(&self.question, top_k).await);
        if let Some(notice) = notice {
            eprintln!("{}", notice);
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&notes)?);
        } else {
            super::print_notes(&notes);
        }

        Ok(())
    }
}

/// Notes to print, plus a user-facing notice when the search failed.
fn split_outcome(outcome: RetrievalOutcome) -> (Vec<FilteredNote>, Option<&'static str>) {
    match outcome {
        RetrievalOutcome::Found(notes) => (notes, None),
        RetrievalOutcome::Empty => (Vec::new(), None),
        // Already logged with full detail by the retriever
        RetrievalOutcome::Failed(_) => (Vec::new(), Some(SEARCH_UNAVAILABLE)),
    }
}
