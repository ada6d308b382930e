//! Per-word insertion with independent outcome classification.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use lexicon_core::{
    BatchOutcome, CreateEntryRequest, InsertOutcome, NewWordRequest, TaxonomyAssignment,
    VocabularyRepository, WordError,
};

/// Inserts a batch one word at a time, in submission order.
///
/// Each word lands in exactly one of `added`, `skipped` or `errors`. Nothing
/// is retried and one word's failure never stops the rest.
#[derive(Clone)]
pub struct MergeProcessor {
    repo: Arc<dyn VocabularyRepository>,
}

impl MergeProcessor {
    pub fn new(repo: Arc<dyn VocabularyRepository>) -> Self {
        Self { repo }
    }

    pub async fn merge(
        &self,
        words: &[NewWordRequest],
        assignment: &TaxonomyAssignment,
    ) -> BatchOutcome {
        let start = Instant::now();
        let mut outcome = BatchOutcome::default();

        for word in words {
            let req = CreateEntryRequest::from_word(word, assignment.get(&word.word));
            match self.repo.insert(req).await {
                Ok(InsertOutcome::Inserted(entry)) => {
                    debug!(
                        subsystem = "ingest",
                        component = "merge",
                        word = %entry.word,
                        id = entry.id,
                        "Word added"
                    );
                    outcome.added.push(entry);
                }
                Ok(InsertOutcome::Duplicate) => {
                    debug!(
                        subsystem = "ingest",
                        component = "merge",
                        word = %word.word,
                        "Word skipped as duplicate"
                    );
                    outcome.skipped.push(word.word.clone());
                }
                Err(e) => {
                    warn!(
                        subsystem = "ingest",
                        component = "merge",
                        word = %word.word,
                        error = %e,
                        "Word insert failed"
                    );
                    outcome.errors.push(WordError {
                        word: word.word.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            subsystem = "ingest",
            component = "merge",
            added = outcome.added.len(),
            skipped = outcome.skipped.len(),
            errors = outcome.errors.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Merge complete"
        );
        outcome
    }
}
