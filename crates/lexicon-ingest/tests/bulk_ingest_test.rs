//! End-to-end tests of the bulk ingest engine against the in-memory store and
//! mock generation backend.

use std::sync::Arc;

use lexicon_core::{GroupAssignment, NewWordRequest};
use lexicon_db::InMemoryVocabularyRepository;
use lexicon_inference::mock::MockGenerationBackend;
use lexicon_ingest::BatchController;

fn batch(words: &[(&str, &str)]) -> Vec<NewWordRequest> {
    words
        .iter()
        .map(|(w, m)| NewWordRequest::new(*w, *m))
        .collect()
}

fn numbered(n: usize) -> Vec<NewWordRequest> {
    (0..n)
        .map(|i| NewWordRequest::new(format!("term{:03}", i), format!("definition {}", i)))
        .collect()
}

fn controller(
    repo: &InMemoryVocabularyRepository,
    backend: &MockGenerationBackend,
) -> BatchController {
    BatchController::new(Arc::new(repo.clone()), Arc::new(backend.clone()))
}

const ENRICHED_REPLY: &str = r#"```json
[
  {"word": "elated", "groupName": "feeling happy", "sentence": "She was elated to hear that her closest friend was moving back to town."},
  {"word": "gleeful", "groupName": "feeling happy", "sentence": "The gleeful puppy bounced around the yard chasing every leaf that fell."},
  {"word": "drizzle", "groupName": "Light Rain", "sentence": "A cold drizzle settled over the harbor just as the fishing boats returned."}
]
```"#;

#[tokio::test]
async fn test_counts_always_sum_to_total_sent() {
    let repo = InMemoryVocabularyRepository::new().fail_insert_for("drizzle");
    repo.seed(lexicon_core::CreateEntryRequest::from_word(
        &NewWordRequest::new("gleeful", "full of glee"),
        GroupAssignment::default(),
    ));
    let backend = MockGenerationBackend::new().with_fixed_response(ENRICHED_REPLY);

    let summary = controller(&repo, &backend)
        .ingest(
            &batch(&[
                ("elated", "very happy"),
                ("gleeful", "full of glee"),
                ("drizzle", "light rain"),
            ]),
            None,
        )
        .await
        .unwrap();

    assert_eq!(summary.total_sent, 3);
    assert_eq!(
        summary.added_count + summary.skipped_count + summary.error_count,
        summary.total_sent
    );
    assert_eq!(summary.added_count, 1);
    assert_eq!(summary.skipped_count, 1);
    assert_eq!(summary.error_count, 1);
}

#[tokio::test]
async fn test_resubmitting_a_batch_skips_everything() {
    let repo = InMemoryVocabularyRepository::new();
    let backend = MockGenerationBackend::new().with_fixed_response(ENRICHED_REPLY);
    let controller = controller(&repo, &backend);
    let words = batch(&[
        ("elated", "very happy"),
        ("gleeful", "full of glee"),
        ("drizzle", "light rain"),
    ]);

    let first = controller.ingest(&words, None).await.unwrap();
    let stored_after_first = repo.entries();
    let second = controller.ingest(&words, None).await.unwrap();

    assert_eq!(first.added_count, 3);
    assert_eq!(second.added_count, 0);
    assert_eq!(second.skipped_count, second.total_sent);
    assert_eq!(repo.entries(), stored_after_first);
}

#[tokio::test]
async fn test_enrichment_failure_stores_plain_entries() {
    let repo = InMemoryVocabularyRepository::new();
    let backend = MockGenerationBackend::failing();

    let summary = controller(&repo, &backend)
        .ingest(&batch(&[("elated", "very happy"), ("drizzle", "light rain")]), None)
        .await
        .unwrap();

    assert!(!summary.ai_processing_used);
    assert_eq!(summary.added_count, 2);
    for entry in &summary.results.added {
        assert_eq!(entry.group_name, None);
        assert_eq!(entry.sentence, None);
    }
}

#[tokio::test]
async fn test_existing_label_offered_and_written_verbatim() {
    let repo = InMemoryVocabularyRepository::new();
    repo.seed(lexicon_core::CreateEntryRequest::from_word(
        &NewWordRequest::new("cheerful", "noticeably happy"),
        GroupAssignment {
            group_name: Some("feeling happy".to_string()),
            sentence: None,
        },
    ));
    let backend = MockGenerationBackend::new().with_fixed_response(ENRICHED_REPLY);

    let summary = controller(&repo, &backend)
        .ingest(&batch(&[("elated", "very happy")]), None)
        .await
        .unwrap();

    let prompt = &backend.prompts()[0];
    assert!(prompt.contains("feeling happy"));
    assert!(prompt.contains("elated: very happy"));

    assert!(summary.ai_processing_used);
    let added = &summary.results.added[0];
    assert_eq!(added.group_name.as_deref(), Some("feeling happy"));
    assert!(added.sentence.as_deref().unwrap_or("").contains("elated"));
}

#[tokio::test]
async fn test_second_word_failure_is_isolated() {
    let repo = InMemoryVocabularyRepository::new().fail_insert_for("w2");
    let backend = MockGenerationBackend::new();

    let summary = controller(&repo, &backend)
        .ingest(&batch(&[("w1", "one"), ("w2", "two"), ("w3", "three")]), None)
        .await
        .unwrap();

    let added: Vec<&str> = summary
        .results
        .added
        .iter()
        .map(|e| e.word.as_str())
        .collect();
    assert_eq!(added, vec!["w1", "w3"]);
    assert_eq!(summary.results.errors.len(), 1);
    assert_eq!(summary.results.errors[0].word, "w2");
    assert!(!summary.results.errors[0].error.is_empty());
}

#[tokio::test]
async fn test_prose_reply_falls_back_entirely() {
    let repo = InMemoryVocabularyRepository::new();
    let backend = MockGenerationBackend::new().with_fixed_response(
        "Here you go! 'elated' fits best under feeling happy, and drizzle is weather.",
    );

    let summary = controller(&repo, &backend)
        .ingest(&batch(&[("elated", "very happy"), ("drizzle", "light rain")]), None)
        .await
        .unwrap();

    assert!(!summary.ai_processing_used);
    assert!(summary
        .results
        .added
        .iter()
        .all(|e| e.group_name.is_none() && e.sentence.is_none()));
}

#[tokio::test]
async fn test_chunked_batch_processes_every_word_once() {
    let repo = InMemoryVocabularyRepository::new();
    let backend = MockGenerationBackend::new();
    let controller = controller(&repo, &backend);
    let words = numbered(120);

    let mut offset = Some(0);
    let mut has_more = Vec::new();
    let mut next_offsets = Vec::new();
    let mut total_added = 0;

    while let Some(current) = offset {
        let summary = controller.ingest(&words, Some(current)).await.unwrap();
        let cursor = summary.cursor.clone().expect("chunk mode emits a cursor");
        assert_eq!(cursor.total_words, 120);

        total_added += summary.added_count;
        has_more.push(cursor.has_more);
        next_offsets.push(cursor.next_offset);
        offset = cursor.next_offset;
    }

    assert_eq!(has_more, vec![true, true, false]);
    assert_eq!(next_offsets, vec![Some(50), Some(100), None]);
    assert_eq!(total_added, 120);
    assert_eq!(repo.insert_calls(), 120);
    assert_eq!(backend.generate_call_count(), 3);

    let stored: Vec<String> = repo.entries().into_iter().map(|e| e.word).collect();
    let expected: Vec<String> = words.into_iter().map(|w| w.word).collect();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn test_labels_from_earlier_chunk_visible_to_later_chunk() {
    let repo = InMemoryVocabularyRepository::new();
    let backend = MockGenerationBackend::new().with_response_mapping(
        "term000",
        r#"[{"word": "term000", "groupName": "First Chunk Label"}]"#,
    );
    let controller = controller(&repo, &backend).with_chunk_size(1);
    let words = numbered(2);

    controller.ingest(&words, Some(0)).await.unwrap();
    controller.ingest(&words, Some(1)).await.unwrap();

    let prompts = backend.prompts();
    assert!(!prompts[0].contains("First Chunk Label"));
    assert!(prompts[1].contains("- First Chunk Label"));
}
