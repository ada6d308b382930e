//! Core data models for lexicon.
//!
//! These types are shared across all lexicon crates and represent the
//! vocabulary domain: persisted entries, incoming word requests, the
//! per-batch taxonomy assignment, and the outcome of a bulk ingest.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// VOCABULARY ENTRIES
// =============================================================================

/// A persisted vocabulary entry.
///
/// `word` is the identity key: it is unique and case-sensitive, and
/// uniqueness is enforced by the store rather than checked up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub synonyms: Vec<String>,
    /// Free-text taxonomy label, absent when enrichment was unavailable.
    pub group_name: Option<String>,
    /// Generated example usage sentence.
    pub sentence: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at_utc: DateTime<Utc>,
}

/// A word submitted by a client for ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWordRequest {
    pub word: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
}

impl NewWordRequest {
    pub fn new(word: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            meaning: meaning.into(),
            synonyms: None,
        }
    }

    pub fn with_synonyms(mut self, synonyms: Vec<String>) -> Self {
        self.synonyms = Some(synonyms);
        self
    }
}

/// Row to insert into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntryRequest {
    pub word: String,
    pub meaning: String,
    pub synonyms: Vec<String>,
    pub group_name: Option<String>,
    pub sentence: Option<String>,
}

impl CreateEntryRequest {
    /// Combine a submitted word with whatever enrichment it was assigned.
    pub fn from_word(word: &NewWordRequest, assignment: GroupAssignment) -> Self {
        Self {
            word: word.word.clone(),
            meaning: word.meaning.clone(),
            synonyms: word.synonyms.clone().unwrap_or_default(),
            group_name: assignment.group_name,
            sentence: assignment.sentence,
        }
    }
}

/// Result of a single insert attempt.
///
/// A unique-constraint violation is an expected outcome and is reported as
/// [`InsertOutcome::Duplicate`]; every other failure is an `Err`.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(VocabularyEntry),
    Duplicate,
}

/// One page of entries plus the total row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryPage {
    pub entries: Vec<VocabularyEntry>,
    pub total: i64,
}

// =============================================================================
// GROUPING VIEW
// =============================================================================

/// Entries sharing one taxonomy label. `group_name` is `None` for entries
/// that were stored without enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryGroup {
    pub group_name: Option<String>,
    pub count: usize,
    pub entries: Vec<VocabularyEntry>,
}

impl EntryGroup {
    /// Partition entries by label: labelled groups in alphabetical order,
    /// ungrouped entries last. Entry order within a group is preserved.
    pub fn partition(entries: Vec<VocabularyEntry>) -> Vec<EntryGroup> {
        let mut labelled: BTreeMap<String, Vec<VocabularyEntry>> = BTreeMap::new();
        let mut ungrouped = Vec::new();

        for entry in entries {
            match entry.group_name.clone() {
                Some(name) => labelled.entry(name).or_default().push(entry),
                None => ungrouped.push(entry),
            }
        }

        let mut groups: Vec<EntryGroup> = labelled
            .into_iter()
            .map(|(name, entries)| EntryGroup {
                group_name: Some(name),
                count: entries.len(),
                entries,
            })
            .collect();

        if !ungrouped.is_empty() {
            groups.push(EntryGroup {
                group_name: None,
                count: ungrouped.len(),
                entries: ungrouped,
            });
        }
        groups
    }
}

// =============================================================================
// TAXONOMY ASSIGNMENT
// =============================================================================

/// Enrichment for one word. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupAssignment {
    pub group_name: Option<String>,
    pub sentence: Option<String>,
}

impl GroupAssignment {
    pub fn is_empty(&self) -> bool {
        self.group_name.is_none() && self.sentence.is_none()
    }
}

/// Per-batch mapping from word to its enrichment.
///
/// Lookups never fail: a word the map does not mention resolves to an empty
/// assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonomyAssignment {
    assignments: HashMap<String, GroupAssignment>,
}

impl TaxonomyAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every requested word to an empty assignment.
    pub fn fallback(words: &[NewWordRequest]) -> Self {
        let assignments = words
            .iter()
            .map(|w| (w.word.clone(), GroupAssignment::default()))
            .collect();
        Self { assignments }
    }

    pub fn insert(&mut self, word: impl Into<String>, assignment: GroupAssignment) {
        self.assignments.insert(word.into(), assignment);
    }

    /// Assignment for `word`, empty when the word is not mapped.
    pub fn get(&self, word: &str) -> GroupAssignment {
        self.assignments.get(word).cloned().unwrap_or_default()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.assignments.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// True when at least one word received a label or a sentence.
    pub fn is_enriched(&self) -> bool {
        self.assignments.values().any(|a| !a.is_empty())
    }
}

// =============================================================================
// BATCH OUTCOME
// =============================================================================

/// A word whose insertion failed for a reason other than a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordError {
    pub word: String,
    pub error: String,
}

/// Per-outcome lists for a processed batch, in submission order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub added: Vec<VocabularyEntry>,
    pub skipped: Vec<String>,
    pub errors: Vec<WordError>,
}

impl BatchOutcome {
    /// Number of words that reached a terminal outcome.
    pub fn processed(&self) -> usize {
        self.added.len() + self.skipped.len() + self.errors.len()
    }
}

/// Resume cursor returned when a bulk request runs in chunking mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkCursor {
    pub has_more: bool,
    pub next_offset: Option<usize>,
    /// Length of the whole submitted batch, not just this chunk.
    pub total_words: usize,
}

/// Response body of a bulk ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub added_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub total_sent: usize,
    pub ai_processing_used: bool,
    pub results: BatchOutcome,
    #[serde(flatten)]
    pub cursor: Option<ChunkCursor>,
}

impl BatchSummary {
    pub fn new(
        total_sent: usize,
        ai_processing_used: bool,
        results: BatchOutcome,
        cursor: Option<ChunkCursor>,
    ) -> Self {
        Self {
            added_count: results.added.len(),
            skipped_count: results.skipped.len(),
            error_count: results.errors.len(),
            total_sent,
            ai_processing_used,
            results,
            cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, word: &str, group: Option<&str>) -> VocabularyEntry {
        VocabularyEntry {
            id,
            word: word.to_string(),
            meaning: format!("meaning of {}", word),
            synonyms: vec![],
            group_name: group.map(str::to_string),
            sentence: None,
            created_at_utc: Utc::now(),
        }
    }

    #[test]
    fn test_new_word_request_synonyms_default_to_none() {
        let req: NewWordRequest =
            serde_json::from_str(r#"{"word":"elated","meaning":"very happy"}"#).unwrap();
        assert_eq!(req.synonyms, None);

        let create = CreateEntryRequest::from_word(&req, GroupAssignment::default());
        assert!(create.synonyms.is_empty());
        assert_eq!(create.group_name, None);
    }

    #[test]
    fn test_vocabulary_entry_serializes_camel_case() {
        let json = serde_json::to_value(entry(1, "elated", Some("feeling happy"))).unwrap();
        assert_eq!(json["groupName"], "feeling happy");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("group_name").is_none());
    }

    #[test]
    fn test_assignment_lookup_miss_is_empty() {
        let mut assignment = TaxonomyAssignment::new();
        assignment.insert(
            "elated",
            GroupAssignment {
                group_name: Some("feeling happy".to_string()),
                sentence: None,
            },
        );

        assert_eq!(assignment.get("unknown"), GroupAssignment::default());
        assert_eq!(
            assignment.get("elated").group_name.as_deref(),
            Some("feeling happy")
        );
        assert!(assignment.is_enriched());
    }

    #[test]
    fn test_fallback_covers_every_word_and_is_not_enriched() {
        let words = vec![
            NewWordRequest::new("a", "first"),
            NewWordRequest::new("b", "second"),
        ];
        let assignment = TaxonomyAssignment::fallback(&words);
        assert_eq!(assignment.len(), 2);
        assert!(assignment.contains("a"));
        assert!(!assignment.is_enriched());
    }

    #[test]
    fn test_partition_orders_groups_and_puts_ungrouped_last() {
        let groups = EntryGroup::partition(vec![
            entry(1, "glum", None),
            entry(2, "joyful", Some("feeling happy")),
            entry(3, "brisk", Some("fast movement")),
            entry(4, "elated", Some("feeling happy")),
        ]);

        let names: Vec<Option<&str>> = groups.iter().map(|g| g.group_name.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("fast movement"), Some("feeling happy"), None]
        );
        assert_eq!(groups[1].count, 2);
        assert_eq!(groups[1].entries[0].word, "joyful");
        assert_eq!(groups[2].entries[0].word, "glum");
    }

    #[test]
    fn test_batch_summary_counts_follow_results() {
        let outcome = BatchOutcome {
            added: vec![entry(1, "a", None)],
            skipped: vec!["b".to_string()],
            errors: vec![WordError {
                word: "c".to_string(),
                error: "boom".to_string(),
            }],
        };
        let summary = BatchSummary::new(3, false, outcome, None);
        assert_eq!(summary.added_count, 1);
        assert_eq!(summary.skipped_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.results.processed(), summary.total_sent);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["aiProcessingUsed"], false);
        assert!(json.get("hasMore").is_none());
    }

    #[test]
    fn test_batch_summary_flattens_cursor() {
        let cursor = ChunkCursor {
            has_more: false,
            next_offset: None,
            total_words: 120,
        };
        let summary = BatchSummary::new(20, true, BatchOutcome::default(), Some(cursor));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["hasMore"], false);
        assert!(json["nextOffset"].is_null());
        assert_eq!(json["totalWords"], 120);
    }
}
