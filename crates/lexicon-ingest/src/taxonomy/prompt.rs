//! Enrichment prompt construction.

use std::fmt::Write;

use lexicon_core::defaults::{
    GROUP_LABEL_MAX_WORDS, GROUP_LABEL_MIN_WORDS, SENTENCE_MAX_WORDS, SENTENCE_MIN_WORDS,
};
use lexicon_core::NewWordRequest;

use super::ExistingLabelSet;

/// Build the single prompt sent to the generation backend for one batch.
///
/// Existing labels are listed verbatim so the model can reuse them exactly.
pub fn build_prompt(words: &[NewWordRequest], existing: &ExistingLabelSet) -> String {
    let existing_list = if existing.is_empty() {
        "(none yet)".to_string()
    } else {
        existing
            .iter()
            .map(|label| format!("- {}", label))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut word_list = String::new();
    for (i, w) in words.iter().enumerate() {
        // Writing to a String cannot fail.
        let _ = writeln!(word_list, "{}. {}: {}", i + 1, w.word, w.meaning);
    }

    format!(
        r#"You are a lexicographer organizing a vocabulary list into semantic groups.

Existing groups:
{existing_list}

New words (word: meaning):
{word_list}
Rules:
1. If an existing group's scope matches a new word's meaning, reuse that group name exactly as written above.
2. Otherwise create a new group name: short, human-readable, {GROUP_LABEL_MIN_WORDS}-{GROUP_LABEL_MAX_WORDS} words.
3. New words with identical or near-identical meanings must receive the same group name.
4. For every word write one natural example sentence of {SENTENCE_MIN_WORDS}-{SENTENCE_MAX_WORDS} words that uses the word exactly as given.

Output ONLY a JSON array (no markdown, no explanation), one object per new word:
[{{"word": "the word", "groupName": "group name", "sentence": "example sentence"}}]"#
    )
}
