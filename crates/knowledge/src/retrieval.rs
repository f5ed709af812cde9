//! Note retrieval: search, relevance filtering, cleaning.
//!
//! Retrieval never fails the caller. Search errors are logged and degrade
//! to "no notes found".

use crate::search::{GetNoteClient, NoteSearch};
use crate::types::{FilteredNote, Note, RetrievalOutcome};
use getnote_core::{AppConfig, AppResult};
use std::sync::Arc;

/// Minimum relevance score for a note to be kept.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.7;

/// Number of notes handed to the generator by default.
pub const DEFAULT_TOP_K: usize = 3;

/// Collapse every whitespace run, newlines included, to one space and trim.
pub fn clean_content(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Retrieves, filters and cleans notes for a query.
pub struct NoteRetriever {
    search: Arc<dyn NoteSearch>,
    threshold: f32,
}

impl NoteRetriever {
    /// Create a retriever with the default threshold.
    pub fn new(search: Arc<dyn NoteSearch>) -> Self {
        Self {
            search,
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }

    /// Create a retriever using the configured threshold.
    pub fn from_config(search: Arc<dyn NoteSearch>, config: &AppConfig) -> Self {
        Self::new(search).with_threshold(config.relevance_threshold)
    }

    /// Create a retriever backed by the Get Notes search endpoint.
    ///
    /// Needs only the search credentials; no generation backend is built.
    pub fn connect(config: &AppConfig) -> AppResult<Self> {
        let search: Arc<dyn NoteSearch> = Arc::new(GetNoteClient::from_config(config)?);
        Ok(Self::from_config(search, config))
    }

    /// Set the relevance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Retrieve notes, reporting whether nothing was found or the search broke.
    pub async fn retrieve_outcome(&self, query: &str, top_k: usize) -> RetrievalOutcome {
        if query.trim().is_empty() {
            tracing::warn!("Empty query, skipping search");
            return RetrievalOutcome::Empty;
        }

        tracing::info!("Retrieving notes (top_k: {}, threshold: {})", top_k, self.threshold);

        let notes = match self.search.search(query, top_k).await {
            Ok(notes) => notes,
            Err(e) => {
                tracing::error!("Note retrieval failed: {}", e);
                return RetrievalOutcome::Failed(e);
            }
        };

        let received = notes.len();
        let filtered = self.filter_notes(notes, top_k);

        tracing::info!(
            "Kept {} of {} notes after relevance filtering",
            filtered.len(),
            received
        );

        if filtered.is_empty() {
            RetrievalOutcome::Empty
        } else {
            RetrievalOutcome::Found(filtered)
        }
    }

    /// Retrieve notes; any failure yields an empty list.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Vec<FilteredNote> {
        self.retrieve_outcome(query, top_k).await.into_notes()
    }

    /// Apply the threshold, clean the survivors, then cap at `top_k`.
    ///
    /// AI composite answers are exempt from the threshold. Upstream order is
    /// preserved.
    pub fn filter_notes(&self, notes: Vec<Note>, top_k: usize) -> Vec<FilteredNote> {
        notes
            .into_iter()
            .filter(|note| {
                let keep = note.is_ai_answer() || note.relevance_score >= self.threshold;
                if !keep {
                    tracing::debug!(
                        "Dropping note {} (score {:.2} < {:.2})",
                        note.id,
                        note.relevance_score,
                        self.threshold
                    );
                }
                keep
            })
            .map(FilteredNote::admit)
            .take(top_k)
            .collect()
    }
}
