//! # lexicon-api
//!
//! HTTP surface for the lexicon vocabulary service. The binary in `main.rs`
//! wires configuration, storage and the generation backend into [`app`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use lexicon_core::defaults::{CORS_MAX_AGE_SECS, MAX_BODY_SIZE_BYTES};
use lexicon_core::{GenerationBackend, VocabularyRepository};
use lexicon_ingest::BatchController;

pub use config::{InferenceBackendKind, ServerConfig, DEFAULT_ALLOWED_ORIGINS};
pub use error::ApiError;
pub use response::{ListResponse, PaginationMeta};

use handlers::vocabulary;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn VocabularyRepository>,
    pub ingest: BatchController,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn VocabularyRepository>,
        backend: Arc<dyn GenerationBackend>,
        chunk_size: usize,
    ) -> Self {
        Self {
            ingest: BatchController::new(repo.clone(), backend).with_chunk_size(chunk_size),
            repo,
        }
    }
}

/// Request ID generator producing time-ordered UUIDv7 values.
#[derive(Clone, Copy)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Parse a comma-separated origin list; blank input yields the defaults.
pub fn parse_allowed_origins(raw: &str) -> Vec<HeaderValue> {
    let source = if raw.trim().is_empty() {
        DEFAULT_ALLOWED_ORIGINS
    } else {
        raw
    };

    source
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

/// Routes only, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/vocabulary",
            get(vocabulary::list_entries).post(vocabulary::create_entry),
        )
        .route("/vocabulary/bulk", post(vocabulary::bulk_ingest))
        .route("/vocabulary/random", get(vocabulary::random_entries))
        .route("/vocabulary/groups", get(vocabulary::grouped_entries))
        .route("/vocabulary/range", get(vocabulary::range_entries))
        .route(
            "/vocabulary/:word",
            get(vocabulary::get_entry).delete(vocabulary::delete_entry),
        )
        .with_state(state)
}

/// Full application: routes plus tracing, request IDs, CORS and body limit.
pub fn app(state: AppState, allowed_origins: Vec<HeaderValue>) -> Router {
    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(CORS_MAX_AGE_SECS)),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE_BYTES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://words.example.com, http://localhost:5173 ,");
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0].to_str().unwrap(), "https://words.example.com");
        assert_eq!(origins[1].to_str().unwrap(), "http://localhost:5173");
    }

    #[test]
    fn test_blank_origins_use_default() {
        let origins = parse_allowed_origins("  ");
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0].to_str().unwrap(), DEFAULT_ALLOWED_ORIGINS);
    }

    #[test]
    fn test_invalid_origin_is_dropped() {
        let origins = parse_allowed_origins("https://ok.example.com,bad\norigin");
        assert_eq!(origins.len(), 1);
    }
}
