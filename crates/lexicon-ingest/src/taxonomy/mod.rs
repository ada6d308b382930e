//! Taxonomy assignment: one generation call per batch that labels every word
//! with a group name and example sentence.

mod parse;
mod prompt;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use lexicon_core::{GenerationBackend, NewWordRequest, TaxonomyAssignment};

pub use parse::{parse_assignment, strip_code_fence};
pub use prompt::build_prompt;

/// Snapshot of distinct group labels already in storage.
pub type ExistingLabelSet = BTreeSet<String>;

/// Assigns group labels and sentences to a batch of new words.
#[derive(Clone)]
pub struct TaxonomyAssigner {
    backend: Arc<dyn GenerationBackend>,
}

impl TaxonomyAssigner {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Model name of the underlying backend.
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Build an assignment for `words`.
    ///
    /// Never fails: a failed call or an unusable reply maps every word to an
    /// empty assignment. An empty batch returns an empty assignment without
    /// calling the backend.
    pub async fn assign(
        &self,
        words: &[NewWordRequest],
        existing: &ExistingLabelSet,
    ) -> TaxonomyAssignment {
        if words.is_empty() {
            return TaxonomyAssignment::new();
        }

        let start = Instant::now();
        let prompt = build_prompt(words, existing);
        debug!(
            subsystem = "ingest",
            component = "taxonomy",
            word_count = words.len(),
            existing_groups = existing.len(),
            prompt_len = prompt.len(),
            "Requesting taxonomy assignment"
        );

        let reply = match self.backend.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    subsystem = "ingest",
                    component = "taxonomy",
                    model = self.backend.model_name(),
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Enrichment unavailable, storing batch without taxonomy"
                );
                return TaxonomyAssignment::fallback(words);
            }
        };

        match parse_assignment(&reply, words) {
            Ok(assignment) => {
                info!(
                    subsystem = "ingest",
                    component = "taxonomy",
                    word_count = words.len(),
                    enriched = assignment.is_enriched(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Taxonomy assignment complete"
                );
                assignment
            }
            Err(e) => {
                warn!(
                    subsystem = "ingest",
                    component = "taxonomy",
                    model = self.backend.model_name(),
                    error = %e,
                    reply_len = reply.len(),
                    "Unusable enrichment reply, storing batch without taxonomy"
                );
                TaxonomyAssignment::fallback(words)
            }
        }
    }
}
