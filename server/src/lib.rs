use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tinysearch::{DocumentId, DocumentStore, Engine, TinysearchError};
use tower_http::cors::{Any, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocumentId,
    pub score: f64,
    pub title: String,
}

pub struct AppState<S> {
    pub engine: Arc<Engine<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self { engine: Arc::clone(&self.engine) }
    }
}

type HandlerError = (StatusCode, String);

pub fn build_app<S>(engine: Engine<S>) -> Router
where
    S: DocumentStore + Send + Sync + 'static,
{
    let app_state = AppState { engine: Arc::new(engine) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler::<S>))
        .route("/doc/:doc_id", get(doc_handler::<S>))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, HandlerError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);
    let engine = Arc::clone(&state.engine);
    let query = params.q.clone();

    // term files are read with blocking IO
    let results = tokio::task::spawn_blocking(move || engine.search(&query, k))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(internal_error)?;

    let hits = results
        .hits
        .into_iter()
        .map(|r| SearchHit { doc_id: r.doc_id, score: r.score, title: r.title })
        .collect();
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        query: params.q,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: results.total_hits,
        results: hits,
    }))
}

pub async fn doc_handler<S>(
    State(state): State<AppState<S>>,
    Path(doc_id): Path<DocumentId>,
) -> Result<Json<serde_json::Value>, HandlerError>
where
    S: DocumentStore + Send + Sync + 'static,
{
    match state.engine.fetch_title(doc_id) {
        Ok(title) => Ok(Json(serde_json::json!({ "doc_id": doc_id, "title": title }))),
        Err(TinysearchError::DocumentNotFound(_)) => Err((StatusCode::NOT_FOUND, "not found".into())),
        Err(e) => Err(internal_error(e)),
    }
}

fn internal_error(err: TinysearchError) -> HandlerError {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
