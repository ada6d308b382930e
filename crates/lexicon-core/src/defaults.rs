//! Centralized default constants for lexicon.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates should reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// BULK INGEST
// =============================================================================

/// Number of words processed per call when a bulk request runs in chunking mode.
pub const BULK_CHUNK_SIZE: usize = 50;

/// Words per group label the enrichment prompt asks for (inclusive range).
pub const GROUP_LABEL_MIN_WORDS: usize = 2;
pub const GROUP_LABEL_MAX_WORDS: usize = 4;

/// Target example sentence length in words (inclusive range).
pub const SENTENCE_MIN_WORDS: usize = 10;
pub const SENTENCE_MAX_WORDS: usize = 20;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for the vocabulary listing.
pub const PAGE_LIMIT: i64 = 50;

/// Largest page size a caller may request.
pub const PAGE_LIMIT_MAX: i64 = 100;

/// Default random sample size.
pub const RANDOM_SAMPLE_SIZE: i64 = 10;

/// Largest random sample a caller may request.
pub const RANDOM_SAMPLE_MAX: i64 = 100;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// CORS preflight cache duration in seconds.
pub const CORS_MAX_AGE_SECS: u64 = 3600;

/// Maximum accepted request body (bulk batches can be large).
pub const MAX_BODY_SIZE_BYTES: usize = 16 * 1024 * 1024;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model (Ollama).
pub const GEN_MODEL: &str = "llama3.1:8b";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Sampling temperature for the taxonomy call.
pub const GEN_TEMPERATURE: f32 = 0.25;
