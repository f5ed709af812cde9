//! Note, reference and result types.
//!
//! Every value here lives for a single query and is discarded afterwards.

use getnote_core::AppError;
use serde::{Deserialize, Serialize};

/// Score given to notes the upstream did not grade, so they pass the filter.
pub const UNSCORED_RELEVANCE: f32 = 1.0;

/// Where a note came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteSource {
    /// Answer synthesized by the upstream knowledge base
    AiAnswer,
    /// Snippet of an original note
    RawSnippet,
}

/// A note normalized from the search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    /// Always present; empty when the upstream sent nothing usable
    pub content: String,
    /// In [0, 1]
    pub relevance_score: f32,
    pub source: NoteSource,
}

impl Note {
    /// Create a raw snippet note. The score is clamped to [0, 1].
    pub fn snippet(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        relevance_score: f32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            relevance_score: relevance_score.clamp(0.0, 1.0),
            source: NoteSource::RawSnippet,
        }
    }

    /// Create the note carrying the upstream's composite answer.
    pub fn ai_answer(content: impl Into<String>) -> Self {
        Self {
            id: "ai-answer".to_string(),
            title: "AI composite answer".to_string(),
            content: content.into(),
            relevance_score: UNSCORED_RELEVANCE,
            source: NoteSource::AiAnswer,
        }
    }

    pub fn is_ai_answer(&self) -> bool {
        self.source == NoteSource::AiAnswer
    }
}

/// A note that passed the relevance filter, with cleaned content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub relevance_score: f32,
    pub source: NoteSource,
}

impl FilteredNote {
    /// Admit a note, normalizing whitespace in its title and content.
    pub fn admit(note: Note) -> Self {
        Self {
            id: note.id,
            title: crate::retrieval::clean_content(&note.title),
            content: crate::retrieval::clean_content(&note.content),
            relevance_score: note.relevance_score,
            source: note.source,
        }
    }

    pub fn is_ai_answer(&self) -> bool {
        self.source == NoteSource::AiAnswer
    }
}

/// Citation target for one note in the assembled context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    pub title: String,
    pub relevance_score: f32,
    /// `note{n}`, 1-based, matching the `[note{n}]` marker
    pub reference_id: String,
}

/// Final answer handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub answer: String,
    pub references: Vec<Reference>,
    /// False iff no note survived retrieval
    pub has_relevant_notes: bool,
}

impl GenerationResult {
    /// References whose citation marker appears in the answer, in reference order.
    pub fn cited_references(&self) -> Vec<&Reference> {
        let cited = crate::context::extract_citations(&self.answer);
        self.references
            .iter()
            .enumerate()
            .filter(|(i, _)| cited.contains(&(i + 1)))
            .map(|(_, r)| r)
            .collect()
    }
}

/// Outcome of a retrieval, separating "nothing found" from "something broke".
#[derive(Debug)]
pub enum RetrievalOutcome {
    Found(Vec<FilteredNote>),
    Empty,
    Failed(AppError),
}

impl RetrievalOutcome {
    /// Notes for the generator; failures degrade to no notes.
    pub fn into_notes(self) -> Vec<FilteredNote> {
        match self {
            RetrievalOutcome::Found(notes) => notes,
            RetrievalOutcome::Empty | RetrievalOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RetrievalOutcome::Failed(_))
    }
}

/// A generation result together with the notes it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResponse {
    pub result: GenerationResult,
    pub notes: Vec<FilteredNote>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(n: usize) -> Reference {
        Reference {
            id: n.to_string(),
            title: format!("Note {}", n),
            relevance_score: 0.9,
            reference_id: format!("note{}", n),
        }
    }

    #[test]
    fn test_snippet_clamps_score() {
        assert_eq!(Note::snippet("1", "t", "c", 1.7).relevance_score, 1.0);
        assert_eq!(Note::snippet("1", "t", "c", -0.2).relevance_score, 0.0);
    }

    #[test]
    fn test_admit_cleans_content() {
        let note = FilteredNote::admit(Note::snippet("1", " Sleep\n", "  go to\n\nbed  ", 0.8));
        assert_eq!(note.title, "Sleep");
        assert_eq!(note.content, "go to bed");
        assert_eq!(note.relevance_score, 0.8);
    }

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_value(Note::ai_answer("text")).unwrap();
        assert_eq!(json["source"], "ai_answer");
    }

    #[test]
    fn test_cited_references() {
        let result = GenerationResult {
            answer: "Sleep early [note2]. Also see [note3][note2].".to_string(),
            references: vec![reference(1), reference(2), reference(3)],
            has_relevant_notes: true,
        };

        let cited: Vec<&str> = result
            .cited_references()
            .iter()
            .map(|r| r.reference_id.as_str())
            .collect();
        assert_eq!(cited, vec!["note2", "note3"]);
    }

    #[test]
    fn test_failed_outcome_degrades_to_empty() {
        let outcome = RetrievalOutcome::Failed(AppError::retrieval("timeout"));
        assert!(outcome.is_failed());
        assert!(outcome.into_notes().is_empty());
    }
}
