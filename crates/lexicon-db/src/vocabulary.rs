//! Vocabulary repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};

use lexicon_core::{
    CreateEntryRequest, EntryPage, Error, InsertOutcome, Result, VocabularyEntry,
    VocabularyRepository,
};

const ENTRY_COLUMNS: &str =
    "id, word, meaning, synonyms, group_name, sentence, created_at_utc";

/// PostgreSQL implementation of VocabularyRepository.
#[derive(Clone)]
pub struct PgVocabularyRepository {
    pool: Pool<Postgres>,
}

impl PgVocabularyRepository {
    /// Create a new PgVocabularyRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// True when the error is a violation of the `word` uniqueness constraint.
fn is_duplicate_word(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl VocabularyRepository for PgVocabularyRepository {
    #[instrument(skip(self), fields(subsystem = "database", component = "vocabulary", op = "list_group_names"))]
    async fn list_group_names(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT DISTINCT group_name FROM vocabulary
             WHERE group_name IS NOT NULL
             ORDER BY group_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(|row| row.get("group_name")).collect())
    }

    #[instrument(skip(self, req), fields(subsystem = "database", component = "vocabulary", op = "insert", word = %req.word))]
    async fn insert(&self, req: CreateEntryRequest) -> Result<InsertOutcome> {
        let start = Instant::now();
        let query = format!(
            "INSERT INTO vocabulary (word, meaning, synonyms, group_name, sentence)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ENTRY_COLUMNS}"
        );

        let result = sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(&req.word)
            .bind(&req.meaning)
            .bind(&req.synonyms)
            .bind(&req.group_name)
            .bind(&req.sentence)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(entry) => {
                debug!(
                    id = entry.id,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Vocabulary entry inserted"
                );
                Ok(InsertOutcome::Inserted(entry))
            }
            Err(e) if is_duplicate_word(&e) => {
                debug!("Word already stored");
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(Error::Database(e)),
        }
    }

    async fn fetch(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM vocabulary WHERE word = $1");
        sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(word)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    #[instrument(skip(self), fields(subsystem = "database", component = "vocabulary", op = "delete"))]
    async fn delete(&self, word: &str) -> Result<Option<VocabularyEntry>> {
        let query = format!("DELETE FROM vocabulary WHERE word = $1 RETURNING {ENTRY_COLUMNS}");
        sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(word)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<EntryPage> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vocabulary")
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM vocabulary ORDER BY id LIMIT $1 OFFSET $2"
        );
        let entries = sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(EntryPage { entries, total })
    }

    async fn list_by_id_range(&self, start: i64, end: i64) -> Result<Vec<VocabularyEntry>> {
        let query = format!(
            "SELECT {ENTRY_COLUMNS} FROM vocabulary
             WHERE id BETWEEN $1 AND $2
             ORDER BY id"
        );
        sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn sample_random(&self, count: i64) -> Result<Vec<VocabularyEntry>> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM vocabulary ORDER BY random() LIMIT $1");
        sqlx::query_as::<_, VocabularyEntry>(&query)
            .bind(count)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }

    async fn list_all(&self) -> Result<Vec<VocabularyEntry>> {
        let query = format!("SELECT {ENTRY_COLUMNS} FROM vocabulary ORDER BY id");
        sqlx::query_as::<_, VocabularyEntry>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)
    }
}
