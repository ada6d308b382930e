//! Batch orchestration: validation, label snapshot, assignment, merge and
//! optional chunking.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument, warn};

use lexicon_core::defaults::BULK_CHUNK_SIZE;
use lexicon_core::{
    BatchSummary, ChunkCursor, CreateEntryRequest, Error, GenerationBackend, InsertOutcome,
    NewWordRequest, Result, VocabularyEntry, VocabularyRepository,
};

use crate::merge::MergeProcessor;
use crate::taxonomy::{ExistingLabelSet, TaxonomyAssigner};

/// Reject an empty batch or any item with a blank word or meaning.
pub fn validate_batch(words: &[NewWordRequest]) -> Result<()> {
    if words.is_empty() {
        return Err(Error::InvalidInput(
            "words must be a non-empty array".to_string(),
        ));
    }
    for (i, w) in words.iter().enumerate() {
        if w.word.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Word at index {} has empty word",
                i
            )));
        }
        if w.meaning.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Word at index {} has empty meaning",
                i
            )));
        }
    }
    Ok(())
}

/// Trim surrounding whitespace from every word, meaning and synonym.
///
/// Blank synonyms are dropped. Words are stored, prompted and looked up in
/// their trimmed form.
pub fn normalize_batch(words: &[NewWordRequest]) -> Vec<NewWordRequest> {
    words.iter().map(normalize_word).collect()
}

fn normalize_word(word: &NewWordRequest) -> NewWordRequest {
    NewWordRequest {
        word: word.word.trim().to_string(),
        meaning: word.meaning.trim().to_string(),
        synonyms: word.synonyms.as_ref().map(|list| {
            list.iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }),
    }
}

/// Runs a bulk ingest request end to end.
#[derive(Clone)]
pub struct BatchController {
    repo: Arc<dyn VocabularyRepository>,
    assigner: TaxonomyAssigner,
    merger: MergeProcessor,
    chunk_size: usize,
}

impl BatchController {
    pub fn new(repo: Arc<dyn VocabularyRepository>, backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            assigner: TaxonomyAssigner::new(backend),
            merger: MergeProcessor::new(repo.clone()),
            repo,
            chunk_size: BULK_CHUNK_SIZE,
        }
    }

    /// Set the number of words processed per call in chunking mode (min 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Model name of the generation backend.
    pub fn model_name(&self) -> &str {
        self.assigner.model_name()
    }

    /// Ingest `words`.
    ///
    /// Without `offset` the whole batch is processed. With `offset` only
    /// `words[offset..offset + chunk_size]` is processed and the summary
    /// carries a resume cursor.
    #[instrument(skip(self, words), fields(subsystem = "ingest", component = "batch", op = "ingest", total_words = words.len()))]
    pub async fn ingest(
        &self,
        words: &[NewWordRequest],
        offset: Option<usize>,
    ) -> Result<BatchSummary> {
        let words = normalize_batch(words);
        validate_batch(&words)?;
        let start = Instant::now();

        let (slice, cursor) = match offset {
            None => (&words[..], None),
            Some(offset) if offset >= words.len() => {
                return Err(Error::InvalidInput(format!(
                    "offset {} is out of range for {} words",
                    offset,
                    words.len()
                )));
            }
            Some(offset) => {
                let end = offset.saturating_add(self.chunk_size).min(words.len());
                let has_more = end < words.len();
                let cursor = ChunkCursor {
                    has_more,
                    next_offset: has_more.then_some(end),
                    total_words: words.len(),
                };
                (&words[offset..end], Some(cursor))
            }
        };

        let existing = self.load_existing_groups().await;
        let assignment = self.assigner.assign(slice, &existing).await;
        let outcome = self.merger.merge(slice, &assignment).await;

        let summary = BatchSummary::new(slice.len(), assignment.is_enriched(), outcome, cursor);
        info!(
            total_sent = summary.total_sent,
            added = summary.added_count,
            skipped = summary.skipped_count,
            errors = summary.error_count,
            ai_processing_used = summary.ai_processing_used,
            duration_ms = start.elapsed().as_millis() as u64,
            "Bulk ingest complete"
        );
        Ok(summary)
    }

    /// Create a single entry through the same enrichment path.
    ///
    /// Unlike a batch, a duplicate is reported as [`Error::Duplicate`] and a
    /// store failure is returned as-is.
    #[instrument(skip(self, word), fields(subsystem = "ingest", component = "batch", op = "create_one", word = %word.word))]
    pub async fn create_one(&self, word: NewWordRequest) -> Result<VocabularyEntry> {
        let word = normalize_word(&word);
        validate_batch(std::slice::from_ref(&word))?;

        let existing = self.load_existing_groups().await;
        let assignment = self
            .assigner
            .assign(std::slice::from_ref(&word), &existing)
            .await;

        let req = CreateEntryRequest::from_word(&word, assignment.get(&word.word));
        match self.repo.insert(req).await? {
            InsertOutcome::Inserted(entry) => Ok(entry),
            InsertOutcome::Duplicate => Err(Error::Duplicate(word.word)),
        }
    }

    /// Snapshot of stored labels; an empty set when the read fails.
    async fn load_existing_groups(&self) -> ExistingLabelSet {
        match self.repo.list_group_names().await {
            Ok(names) => names.into_iter().collect(),
            Err(e) => {
                warn!(
                    subsystem = "ingest",
                    component = "batch",
                    error = %e,
                    "Failed to load existing group labels, continuing with none"
                );
                ExistingLabelSet::new()
            }
        }
    }
}
