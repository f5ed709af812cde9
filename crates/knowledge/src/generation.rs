//! Answer generation from retrieved notes.

use crate::context::assemble;
use crate::types::{FilteredNote, GenerationResult};
use getnote_core::{AppConfig, AppError, AppResult};
use getnote_llm::{LlmClient, LlmRequest};
use getnote_prompt::{build_prompt, load_prompt_or_default, PromptDefinition, ANSWER_PROMPT_ID};
use std::collections::HashMap;
use std::sync::Arc;

/// Answer returned when no note survived retrieval.
pub const NO_RELEVANT_NOTES_ANSWER: &str = "Sorry, no notes related to your question were found. \
Try rephrasing the question or adding more keywords.";

/// Default sampling temperature; low for factual answers.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Generates cited answers with a text-generation backend.
pub struct AnswerGenerator {
    llm: Arc<dyn LlmClient>,
    prompt: PromptDefinition,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl AnswerGenerator {
    /// Create a generator using the built-in answer prompt.
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            prompt: getnote_prompt::default_answer_prompt(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }

    /// Create a generator from configuration, loading a prompt override if present.
    pub fn from_config(llm: Arc<dyn LlmClient>, config: &AppConfig) -> AppResult<Self> {
        let prompt = load_prompt_or_default(config.prompts_dir.as_deref(), ANSWER_PROMPT_ID)?;

        let mut generator = Self::new(llm, config.llm.model.clone())
            .with_prompt(prompt)
            .with_temperature(config.llm.temperature);
        if let Some(max_tokens) = config.llm.max_tokens {
            generator = generator.with_max_tokens(max_tokens);
        }

        Ok(generator)
    }

    pub fn with_prompt(mut self, prompt: PromptDefinition) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Generate an answer for `query` grounded in `notes`.
    ///
    /// With no notes the backend is not called and a fixed answer is
    /// returned. Any backend failure is an [`AppError::Generation`].
    pub async fn generate(&self, query: &str, notes: &[FilteredNote]) -> AppResult<GenerationResult> {
        if notes.is_empty() {
            tracing::info!("No relevant notes, skipping generation");
            return Ok(GenerationResult {
                answer: NO_RELEVANT_NOTES_ANSWER.to_string(),
                references: Vec::new(),
                has_relevant_notes: false,
            });
        }

        tracing::info!(
            "Generating answer from {} notes (provider: {}, model: {})",
            notes.len(),
            self.llm.provider_name(),
            self.model
        );

        let (context, references) = assemble(notes);
        let request = self.build_request(query, context)?;

        let response = self.llm.complete(&request).await.map_err(|e| {
            tracing::error!("Answer generation failed: {}", e);
            AppError::Generation(format!("Text generation failed: {}", e))
        })?;

        let answer = response.content.trim();
        if answer.is_empty() {
            tracing::error!("Backend returned an empty completion");
            return Err(AppError::Generation(
                "Text generation returned an empty answer".to_string(),
            ));
        }

        tracing::debug!(
            "Completion usage: {} prompt + {} completion tokens",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(GenerationResult {
            answer: answer.to_string(),
            references,
            has_relevant_notes: true,
        })
    }

    fn build_request(&self, query: &str, context: String) -> AppResult<LlmRequest> {
        let mut variables = HashMap::new();
        variables.insert("query".to_string(), query.to_string());
        variables.insert("context".to_string(), context);

        let built = build_prompt(&self.prompt, variables)
            .map_err(|e| AppError::Generation(format!("Failed to build answer prompt: {}", e)))?;

        let mut request =
            LlmRequest::new(built.user, self.model.clone()).with_temperature(self.temperature);
        if let Some(system) = built.system {
            request = request.with_system(system);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        Ok(request)
    }
}
