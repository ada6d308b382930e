//! # lexicon-inference
//!
//! Text generation backends used to enrich vocabulary entries.
//!
//! This crate provides:
//! - Ollama implementation (default)
//! - OpenAI-compatible implementation (feature `openai`)
//! - Deterministic mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable Ollama backend
//! - `openai` (default): Enable OpenAI-compatible backend
//! - `mock`: Enable [`mock::MockGenerationBackend`]
//!
//! # Example
//!
//! ```rust,no_run
//! use lexicon_inference::OllamaBackend;
//! use lexicon_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env();
//!     let reply = backend.generate("Say hello").await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use lexicon_core::*;

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

#[cfg(feature = "openai")]
pub use openai::{OpenAIBackend, OpenAIConfig};
