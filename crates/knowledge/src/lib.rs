//! Retrieval-augmented answering over a Get Notes knowledge base.
//!
//! A query flows through four stages:
//! 1. [`search`]: call the knowledge-base search endpoint and normalize the response
//! 2. [`retrieval`]: filter notes by relevance, clean them, cap the count
//! 3. [`context`]: number the notes into a prompt context with references
//! 4. [`generation`]: ask the text-generation backend for a cited answer
//!
//! [`RagPipeline`] runs them in order.

pub mod context;
pub mod generation;
pub mod pipeline;
pub mod retrieval;
pub mod search;
pub mod types;


// Re-export commonly used types
pub use context::{assemble, citation_marker, extract_citations, reference_label};
pub use generation::{AnswerGenerator, NO_RELEVANT_NOTES_ANSWER};
pub use pipeline::RagPipeline;
pub use retrieval::{clean_content, NoteRetriever, DEFAULT_RELEVANCE_THRESHOLD, DEFAULT_TOP_K};
pub use search::{GetNoteClient, NoteSearch, SearchResponse};
pub use types::{
    FilteredNote, GenerationResult, Note, NoteSource, PipelineResponse, Reference,
    RetrievalOutcome,
};
