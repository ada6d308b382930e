//! Server configuration read from the environment.

use std::str::FromStr;

use lexicon_core::defaults;
use lexicon_core::{Error, Result};

/// Which generation backend enriches new words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBackendKind {
    Ollama,
    OpenAI,
}

impl FromStr for InferenceBackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            other => Err(Error::Config(format!(
                "Unknown inference backend '{}', expected 'ollama' or 'openai'",
                other
            ))),
        }
    }
}

/// Top-level server settings.
///
/// | Variable | Default |
/// |---|---|
/// | `DATABASE_URL` | `postgres://localhost/lexicon` |
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `3000` |
/// | `ALLOWED_ORIGINS` | `http://localhost:3000` |
/// | `LEXICON_BULK_CHUNK_SIZE` | `50` |
/// | `LEXICON_INFERENCE_BACKEND` | `ollama` |
/// | `LEXICON_RUN_MIGRATIONS` | `true` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub allowed_origins: String,
    pub bulk_chunk_size: usize,
    pub inference_backend: InferenceBackendKind,
    pub run_migrations: bool,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let inference_backend = match lookup("LEXICON_INFERENCE_BACKEND") {
            Some(v) => v.parse()?,
            None => InferenceBackendKind::Ollama,
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "postgres://localhost/lexicon".to_string()),
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::SERVER_PORT),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string()),
            bulk_chunk_size: lookup("LEXICON_BULK_CHUNK_SIZE")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults::BULK_CHUNK_SIZE),
            inference_backend,
            run_migrations: lookup("LEXICON_RUN_MIGRATIONS")
                .map(|v| !matches!(v.as_str(), "false" | "0"))
                .unwrap_or(true),
        })
    }
}

/// Origins allowed when `ALLOWED_ORIGINS` is unset or blank.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";
