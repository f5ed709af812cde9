//! Command handlers for the Get Notes CLI.

pub mod ask;
pub mod search;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use search::SearchCommand;

use getnote_core::{config::AppConfig, AppResult};
use getnote_knowledge::FilteredNote;

/// Longest note snippet shown in the note list, in characters.
const SNIPPET_CHARS: usize = 200;

/// Copy of `config` with the threshold overridden, re-validated.
fn with_threshold(config: &AppConfig, threshold: Option<f32>) -> AppResult<AppConfig> {
    let mut config = config.clone();
    if let Some(threshold) = threshold {
        config.relevance_threshold = threshold;
        config.validate_retrieval()?;
    }
    Ok(config)
}

/// Cut `content` to `max_chars` characters, marking the cut with "...".
fn snippet(content: &str, max_chars: usize) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Print notes in retrieval order; the AI composite answer comes first.
fn print_notes(notes: &[FilteredNote]) {
    if notes.is_empty() {
        println!("Notes: (no relevant notes found)");
        return;
    }

    println!("Notes:");
    for (i, note) in notes.iter().enumerate() {
        let label = if note.is_ai_answer() { "AI answer" } else { "note" };
        println!(
            "{}. {} [{}] (relevance: {:.2})",
            i + 1,
            note.title,
            label,
            note.relevance_score
        );
        println!("   {}", snippet(&note.content, SNIPPET_CHARS));
    }
}
