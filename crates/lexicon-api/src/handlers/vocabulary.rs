//! Vocabulary HTTP handlers.
//!
//! Bulk and single-entry ingest go through the enrichment engine; the read
//! views (listing, groups, random sample, id range) query the store directly.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use lexicon_core::defaults::{PAGE_LIMIT, PAGE_LIMIT_MAX, RANDOM_SAMPLE_MAX, RANDOM_SAMPLE_SIZE};
use lexicon_core::{BatchSummary, EntryGroup, NewWordRequest, VocabularyEntry};

use crate::response::ListResponse;
use crate::{ApiError, AppState};

/// Request body for bulk ingest.
#[derive(Debug, Deserialize)]
pub struct BulkIngestRequest {
    pub words: Vec<NewWordRequest>,
    /// Start of the chunk to process; absent processes the whole batch.
    #[serde(default)]
    pub offset: Option<usize>,
}

/// Query parameters for the paginated listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Query parameters for the random sample.
#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    pub count: Option<i64>,
}

/// Query parameters for the id range view.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: i64,
    pub end: i64,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// Ingest a batch of words.
///
/// # Returns
/// - 201 Created with the batch summary (even when every word failed)
/// - 400 Bad Request on malformed input or an out-of-range offset
pub async fn bulk_ingest(
    State(state): State<AppState>,
    payload: Result<Json<BulkIngestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BatchSummary>), ApiError> {
    let body = json_body(payload)?;
    let summary = state.ingest.ingest(&body.words, body.offset).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Create a single entry through the enrichment path.
///
/// # Returns
/// - 201 Created with the stored entry
/// - 400 Bad Request on blank word or meaning
/// - 409 Conflict if the word already exists
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<NewWordRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VocabularyEntry>), ApiError> {
    let word = json_body(payload)?;
    let entry = state.ingest.create_one(word).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// List entries ordered by id, one page at a time.
pub async fn list_entries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse<VocabularyEntry>>, ApiError> {
    let query = query_params(query)?;
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    let limit = query.limit.unwrap_or(PAGE_LIMIT);
    if limit < 1 {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }
    let limit = limit.min(PAGE_LIMIT_MAX);
    let offset = (page - 1).saturating_mul(limit);

    let result = state.repo.list(offset, limit).await?;
    Ok(Json(ListResponse::new(
        result.entries,
        result.total,
        page,
        limit,
        offset,
    )))
}

/// Look up one entry by its exact word.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<VocabularyEntry>, ApiError> {
    let entry = state.repo.fetch(&word).await?;
    let entry = entry.ok_or(lexicon_core::Error::WordNotFound(word))?;
    Ok(Json(entry))
}

/// Delete one entry by its exact word, returning the removed entry.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(word): Path<String>,
) -> Result<Json<VocabularyEntry>, ApiError> {
    let entry = state.repo.delete(&word).await?;
    let entry = entry.ok_or(lexicon_core::Error::WordNotFound(word))?;
    tracing::info!(word = %entry.word, id = entry.id, "Vocabulary entry deleted");
    Ok(Json(entry))
}

/// Random sample of entries.
pub async fn random_entries(
    State(state): State<AppState>,
    query: Result<Query<RandomQuery>, QueryRejection>,
) -> Result<Json<Vec<VocabularyEntry>>, ApiError> {
    let count = query_params(query)?.count.unwrap_or(RANDOM_SAMPLE_SIZE);
    if count < 1 {
        return Err(ApiError::BadRequest("count must be at least 1".to_string()));
    }
    let entries = state
        .repo
        .sample_random(count.min(RANDOM_SAMPLE_MAX))
        .await?;
    Ok(Json(entries))
}

/// All entries partitioned by group label, ungrouped last.
pub async fn grouped_entries(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryGroup>>, ApiError> {
    let entries = state.repo.list_all().await?;
    Ok(Json(EntryGroup::partition(entries)))
}

/// Entries with `start <= id <= end`.
pub async fn range_entries(
    State(state): State<AppState>,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<Vec<VocabularyEntry>>, ApiError> {
    let RangeQuery { start, end } = query_params(query)?;
    if start > end {
        return Err(ApiError::BadRequest(format!(
            "start ({}) must not exceed end ({})",
            start, end
        )));
    }
    let entries = state.repo.list_by_id_range(start, end).await?;
    Ok(Json(entries))
}
