//! In-memory vocabulary repository for tests.
//!
//! Mirrors the Postgres repository's semantics (unique words, ascending ids,
//! ungrouped rows excluded from label listing) and lets tests inject store
//! failures for individual words or whole operations.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;

use lexicon_core::{
    CreateEntryRequest, EntryPage, Error, InsertOutcome, Result, VocabularyEntry,
    VocabularyRepository,
};

#[derive(Default)]
struct State {
    entries: Vec<VocabularyEntry>,
    next_id: i64,
    insert_calls: usize,
}

#[derive(Default, Clone)]
struct Failures {
    insert_words: HashSet<String>,
    group_names: bool,
    reads: bool,
}

/// Vocabulary store held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryVocabularyRepository {
    state: Arc<Mutex<State>>,
    failures: Arc<Failures>,
}

impl InMemoryVocabularyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert of `word` fail with a database-style error.
    pub fn fail_insert_for(mut self, word: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.failures)
            .insert_words
            .insert(word.into());
        self
    }

    /// Make `list_group_names` fail.
    pub fn fail_group_listing(mut self) -> Self {
        Arc::make_mut(&mut self.failures).group_names = true;
        self
    }

    /// Make every read operation (list, fetch, range, sample) fail.
    pub fn fail_reads(mut self) -> Self {
        Arc::make_mut(&mut self.failures).reads = true;
        self
    }

    /// Store an entry directly, bypassing failure injection.
    pub fn seed(&self, req: CreateEntryRequest) -> VocabularyEntry {
        let mut state = self.state.lock().unwrap();
        Self::push(&mut state, req)
    }

    /// Snapshot of every stored entry ordered by id.
    pub fn entries(&self) -> Vec<VocabularyEntry> {
        self.state.lock().unwrap().entries.clone()
    }

    /// Number of insert attempts seen, including duplicates and failures.
    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }

    fn push(state: &mut State, req: CreateEntryRequest) -> VocabularyEntry {
        state.next_id += 1;
        let entry = VocabularyEntry {
            id: state.next_id,
            word: req.word,
            meaning: req.meaning,
            synonyms: req.synonyms,
            group_name: req.group_name,
            sentence: req.sentence,
            created_at_utc: Utc::now(),
        };
        state.entries.push(entry.clone());
        entry
    }

    fn check_reads(&self) -> Result<()> {
        if self.failures.reads {
            return Err(Error::Internal("Simulated read failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VocabularyRepository for InMemoryVocabularyRepository {
    async fn list_group_names(&self) -> Result<Vec<String>> {
        if self.failures.group_names {
            return Err(Error::Internal("Simulated label read failure".to_string()));
        }
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = state
            .entries
            .iter()
            .filter_map(|e| e.group_name.clone())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    async fn insert(&self, req: CreateEntryRequest) -> Result<InsertOutcome> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;

        if self.failures.insert_words.contains(&req.word) {
            return Err(Error::Internal(format!(
                "Simulated insert failure for {}",
                req.word
            )));
        }
        if state.entries.iter().any(|e| e.word == req.word) {
            return Ok(InsertOutcome::Duplicate);
        }
        Ok(InsertOutcome::Inserted(Self::push(&mut state, req)))
    }

    async fn fetch(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state.entries.iter().find(|e| e.word == word).cloned())
    }

    async fn delete(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let mut state = self.state.lock().unwrap();
        let position = state.entries.iter().position(|e| e.word == word);
        Ok(position.map(|i| state.entries.remove(i)))
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<EntryPage> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let entries = state
            .entries
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(EntryPage {
            entries,
            total: state.entries.len() as i64,
        })
    }

    async fn list_by_id_range(&self, start: i64, end: i64) -> Result<Vec<VocabularyEntry>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        Ok(state
            .entries
            .iter()
            .filter(|e| e.id >= start && e.id <= end)
            .cloned()
            .collect())
    }

    async fn sample_random(&self, count: i64) -> Result<Vec<VocabularyEntry>> {
        self.check_reads()?;
        let state = self.state.lock().unwrap();
        let mut rng = rand::thread_rng();
        Ok(state
            .entries
            .choose_multiple(&mut rng, count.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<VocabularyEntry>> {
        self.check_reads()?;
        Ok(self.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(word: &str, group: Option<&str>) -> CreateEntryRequest {
        CreateEntryRequest {
            word: word.to_string(),
            meaning: format!("meaning of {word}"),
            synonyms: vec![],
            group_name: group.map(str::to_string),
            sentence: None,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_word() {
        let repo = InMemoryVocabularyRepository::new();
        assert!(matches!(
            repo.insert(req("joy", None)).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
        assert_eq!(
            repo.insert(req("joy", None)).await.unwrap(),
            InsertOutcome::Duplicate
        );
        assert_eq!(repo.entries().len(), 1);
        assert_eq!(repo.insert_calls(), 2);
    }

    #[tokio::test]
    async fn test_word_identity_is_case_sensitive() {
        let repo = InMemoryVocabularyRepository::new();
        repo.insert(req("Joy", None)).await.unwrap();
        assert!(matches!(
            repo.insert(req("joy", None)).await.unwrap(),
            InsertOutcome::Inserted(_)
        ));
    }

    #[tokio::test]
    async fn test_group_names_are_distinct_sorted_and_skip_null() {
        let repo = InMemoryVocabularyRepository::new();
        repo.seed(req("b", Some("Weather")));
        repo.seed(req("a", Some("Emotions")));
        repo.seed(req("c", Some("Weather")));
        repo.seed(req("d", None));

        assert_eq!(
            repo.list_group_names().await.unwrap(),
            vec!["Emotions".to_string(), "Weather".to_string()]
        );
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let repo = InMemoryVocabularyRepository::new()
            .fail_insert_for("bad")
            .fail_group_listing();

        assert!(repo.insert(req("bad", None)).await.is_err());
        assert!(repo.insert(req("good", None)).await.is_ok());
        assert!(repo.list_group_names().await.is_err());
    }

    #[tokio::test]
    async fn test_range_and_sample() {
        let repo = InMemoryVocabularyRepository::new();
        for w in ["a", "b", "c", "d"] {
            repo.seed(req(w, None));
        }

        let range = repo.list_by_id_range(2, 3).await.unwrap();
        assert_eq!(
            range.iter().map(|e| e.word.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        assert_eq!(repo.sample_random(10).await.unwrap().len(), 4);
        assert_eq!(repo.sample_random(2).await.unwrap().len(), 2);
    }
}
