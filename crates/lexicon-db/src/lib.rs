//! # lexicon-db
//!
//! PostgreSQL storage layer for lexicon.
//!
//! This crate provides:
//! - Connection pool management
//! - The vocabulary repository (unique-word inserts, paging, id ranges,
//!   random samples, distinct group labels)
//! - An in-memory repository for tests (feature `mock`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use lexicon_db::{CreateEntryRequest, Database, InsertOutcome, VocabularyRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/lexicon").await?;
//!
//!     let outcome = db.vocabulary.insert(CreateEntryRequest {
//!         word: "serendipity".to_string(),
//!         meaning: "a happy accident".to_string(),
//!         synonyms: vec!["fluke".to_string()],
//!         group_name: Some("Fortune and Chance".to_string()),
//!         sentence: None,
//!     }).await?;
//!
//!     if let InsertOutcome::Inserted(entry) = outcome {
//!         println!("Stored entry {}", entry.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod pool;
pub mod vocabulary;

#[cfg(any(test, feature = "mock"))]
pub mod memory;

// Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use lexicon_core::*;

pub use pool::{
    create_pool, create_pool_with_config, log_pool_metrics, pool_config_from_env, PoolConfig,
};
pub use vocabulary::PgVocabularyRepository;

#[cfg(any(test, feature = "mock"))]
pub use memory::InMemoryVocabularyRepository;

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Vocabulary entry repository.
    pub vocabulary: PgVocabularyRepository,
}

impl Database {
    /// Create a new Database instance from an existing pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            vocabulary: PgVocabularyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
