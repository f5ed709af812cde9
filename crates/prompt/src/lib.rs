//! Prompt system for the Get Notes RAG service.
//!
//! This crate provides structured prompt management with:
//! - YAML-based prompt definitions
//! - A built-in citation-enforcing answer prompt
//! - Handlebars template rendering

pub mod builder;
pub mod defaults;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::build_prompt;
pub use defaults::{default_answer_prompt, ANSWER_PROMPT_ID};
pub use loader::{load_prompt, load_prompt_or_default};
pub use types::{BuiltPrompt, BuiltPromptMetadata, PromptBehavior, PromptDefinition};
