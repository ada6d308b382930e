//! # lexicon-ingest
//!
//! Bulk vocabulary ingest engine.
//!
//! A batch flows through three stages:
//! - [`TaxonomyAssigner`] asks the generation backend for a group label and
//!   example sentence per word, reusing labels already in storage, and falls
//!   back to an empty assignment on any failure.
//! - [`MergeProcessor`] inserts words one at a time and sorts each into
//!   added, skipped (duplicate) or errors.
//! - [`BatchController`] trims and validates input, loads the label
//!   snapshot, runs both stages, and optionally restricts a call to one chunk
//!   of the batch.

pub mod batch;
pub mod merge;
pub mod taxonomy;

pub use batch::{normalize_batch, validate_batch, BatchController};
pub use merge::MergeProcessor;
pub use taxonomy::{ExistingLabelSet, TaxonomyAssigner};
