//! Knowledge-base search.
//!
//! `GetNoteClient` calls the Get Notes search endpoint; `response` turns
//! whatever JSON shape comes back into `Note`s.

pub mod client;
pub mod response;

pub use client::GetNoteClient;
pub use response::SearchResponse;

use crate::types::Note;
use getnote_core::AppResult;

/// A source of notes for a query.
///
/// Implementations return `AppError::Retrieval` for every failure.
#[async_trait::async_trait]
pub trait NoteSearch: Send + Sync {
    async fn search(&self, query: &str, top_k: usize) -> AppResult<Vec<Note>>;
}
