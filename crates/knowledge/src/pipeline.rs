//! Query pipeline: retrieve notes, then generate a cited answer.

use crate::generation::AnswerGenerator;
use crate::retrieval::NoteRetriever;
use crate::search::{GetNoteClient, NoteSearch};
use crate::types::{GenerationResult, PipelineResponse, RetrievalOutcome};
use getnote_core::{AppConfig, AppResult};
use getnote_llm::LlmClient;
use std::sync::Arc;
use tracing::Instrument;

/// Wires the retriever and the generator together.
///
/// Stages run strictly in sequence for each query. Retrieval failures
/// degrade to a "no relevant notes" answer; generation failures propagate.
pub struct RagPipeline {
    retriever: NoteRetriever,
    generator: AnswerGenerator,
}

impl RagPipeline {
    pub fn new(retriever: NoteRetriever, generator: AnswerGenerator) -> Self {
        Self {
            retriever,
            generator,
        }
    }

    /// Build the full pipeline from configuration.
    ///
    /// Missing credentials fail here, before any query runs.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let search: Arc<dyn NoteSearch> = Arc::new(GetNoteClient::from_config(config)?);
        let llm: Arc<dyn LlmClient> = getnote_llm::create_client(&config.llm)?;
        Self::from_parts(search, llm, config)
    }

    /// Build the pipeline around existing search and generation backends.
    pub fn from_parts(
        search: Arc<dyn NoteSearch>,
        llm: Arc<dyn LlmClient>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        Ok(Self::new(
            NoteRetriever::from_config(search, config),
            AnswerGenerator::from_config(llm, config)?,
        ))
    }

    /// Answer `query` from the top `top_k` relevant notes.
    pub async fn retrieve_and_generate(&self, query: &str, top_k: usize) -> AppResult<GenerationResult> {
        Ok(self.ask(query, top_k).await?.result)
    }

    /// Answer `query`, also returning the notes the answer was built from.
    pub async fn ask(&self, query: &str, top_k: usize) -> AppResult<PipelineResponse> {
        let span = tracing::info_span!("query", top_k);
        async move {
            tracing::info!("Processing query: {}", query);

            let notes = self.retriever.retrieve(query, top_k).await;
            let result = self.generator.generate(query, &notes).await?;

            tracing::info!(
                "Query complete (notes: {}, has_relevant_notes: {})",
                notes.len(),
                result.has_relevant_notes
            );

            Ok(PipelineResponse { result, notes })
        }
        .instrument(span)
        .await
    }

    /// Retrieve notes only, without generating an answer.
    pub async fn search(&self, query: &str, top_k: usize) -> RetrievalOutcome {
        self.retriever
            .retrieve_outcome(query, top_k)
            .instrument(tracing::info_span!("search", top_k))
            .await
    }
}
