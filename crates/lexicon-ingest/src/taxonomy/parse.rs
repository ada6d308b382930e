//! Parsing of the generation backend's reply into a taxonomy assignment.

use std::collections::HashSet;

use serde::Deserialize;

use lexicon_core::{GroupAssignment, NewWordRequest, Result, TaxonomyAssignment};

/// One element of the reply array.
#[derive(Debug, Deserialize)]
struct AssignmentRecord {
    word: String,
    #[serde(rename = "groupName", default)]
    group_name: Option<String>,
    #[serde(default)]
    sentence: Option<String>,
}

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
///
/// Only the backticks and an alphabetic info string are dropped; the payload
/// may start on the fence line.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    trimmed
        .trim_start_matches('`')
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_end()
        .trim_end_matches('`')
        .trim()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a reply into an assignment covering every word in `words`.
///
/// The reply must be a JSON array of records, each with a string `word`.
/// Anything else is an error and the caller applies the total fallback.
/// Records for words outside the batch are ignored and the first record for a
/// word wins.
pub fn parse_assignment(raw: &str, words: &[NewWordRequest]) -> Result<TaxonomyAssignment> {
    let records: Vec<AssignmentRecord> = serde_json::from_str(strip_code_fence(raw))?;

    let requested: HashSet<&str> = words.iter().map(|w| w.word.as_str()).collect();
    let mut seen: HashSet<String> = HashSet::new();
    let mut assignment = TaxonomyAssignment::fallback(words);

    for record in records {
        if !requested.contains(record.word.as_str()) || !seen.insert(record.word.clone()) {
            continue;
        }
        assignment.insert(
            record.word,
            GroupAssignment {
                group_name: present(record.group_name),
                sentence: present(record.sentence),
            },
        );
    }

    Ok(assignment)
}
