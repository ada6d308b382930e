//! Core traits for lexicon abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// VOCABULARY REPOSITORY TRAITS
// =============================================================================

/// Store gateway for vocabulary entries.
///
/// Implementations never retry internally; a failed call is surfaced to the
/// caller as-is.
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// Distinct non-null group labels currently stored, sorted.
    async fn list_group_names(&self) -> Result<Vec<String>>;

    /// Insert one entry.
    ///
    /// Returns [`InsertOutcome::Duplicate`] when `word` already exists; any
    /// other failure is an error.
    async fn insert(&self, req: CreateEntryRequest) -> Result<InsertOutcome>;

    /// Fetch an entry by its exact word.
    async fn fetch(&self, word: &str) -> Result<Option<VocabularyEntry>>;

    /// Delete an entry by its exact word, returning the removed row.
    async fn delete(&self, word: &str) -> Result<Option<VocabularyEntry>>;

    /// One page of entries ordered by id, plus the total count.
    async fn list(&self, offset: i64, limit: i64) -> Result<EntryPage>;

    /// Entries with `start <= id <= end`, ordered by id.
    async fn list_by_id_range(&self, start: i64, end: i64) -> Result<Vec<VocabularyEntry>>;

    /// Up to `count` entries in random order (all of them if fewer exist).
    async fn sample_random(&self, count: i64) -> Result<Vec<VocabularyEntry>>;

    /// Every entry ordered by id.
    async fn list_all(&self) -> Result<Vec<VocabularyEntry>>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation (LLM).
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
