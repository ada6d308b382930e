//! OpenAI-compatible generation backend.
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol:
//!
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM
//! - LM Studio
//! - OpenRouter
//!
//! # Example
//!
//! ```rust,no_run
//! use lexicon_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use lexicon_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: None,
//!         gen_model: "llama3.1:8b".to_string(),
//!         timeout_seconds: 120,
//!         temperature: Some(0.25),
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!     let reply = backend.generate("Say hello").await.unwrap();
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_OPENAI_URL, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_lexicon_error, OpenAIErrorCode};
pub use types::*;
