//! LLM integration crate for the Get Notes RAG service.
//!
//! This crate provides a provider-agnostic abstraction for text generation.
//! The answer generator only sees the `LlmClient` trait.
//!
//! # Providers
//! - **OpenAI**: any OpenAI-compatible chat completion endpoint (default)
//! - **Ollama**: local LLM runtime
//!
//! # Example
//! ```no_run
//! use getnote_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new(Duration::from_secs(60))?;
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
