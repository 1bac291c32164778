use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use engine::persist::{load_index, IndexPaths};
use engine::query::{execute, RankingMode, SearchResults, DEFAULT_TOP_K};
use engine::SharedIndex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, AllowOrigin, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_K }
fn default_mode() -> String { "bm25".to_string() }

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f32,
}

/// Boolean mode carries an unranked id set; ranked modes carry scored hits.
#[derive(Serialize)]
#[serde(untagged)]
pub enum ResponseResults {
    Matches(Vec<String>),
    Ranked(Vec<SearchHit>),
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: ResponseResults,
}

#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SharedIndex>,
    pub index_dir: PathBuf,
    pub admin_token: Option<String>,
}

pub fn build_app(index_dir: String) -> Result<Router> {
    // Load the initial snapshot at startup; reloads swap it atomically.
    let paths = IndexPaths::new(&index_dir);
    let index = load_index(&paths)?;
    tracing::info!(num_docs = index.num_docs(), num_terms = index.num_terms(), "index loaded");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState {
        index: Arc::new(SharedIndex::new(index)),
        index_dir: PathBuf::from(&index_dir),
        admin_token,
    };

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

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/index/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let mode: RankingMode = params
        .mode
        .parse()
        .map_err(|e: engine::QueryError| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let start = std::time::Instant::now();
    let snapshot = state.index.load();
    let k = params.k.clamp(1, 100);
    let results = match execute(&snapshot, &params.q, mode, k) {
        SearchResults::Matches(ids) => ResponseResults::Matches(ids),
        SearchResults::Ranked(hits) => ResponseResults::Ranked(
            hits.into_iter()
                .map(|h| SearchHit { doc_id: h.doc_id, score: round4(h.score) })
                .collect(),
        ),
    };
    let total_hits = match &results {
        ResponseResults::Matches(ids) => ids.len(),
        ResponseResults::Ranked(hits) => hits.len(),
    };

    Ok(Json(SearchResponse {
        query: params.q,
        mode: mode.to_string(),
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    }))
}

/// Swap in a freshly loaded snapshot; in-flight queries finish on the old one.
async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let index = load_index(&IndexPaths::new(&state.index_dir))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let num_docs = index.num_docs();
    state.index.swap(index);
    tracing::info!(num_docs, "index snapshot reloaded");
    Ok(Json(serde_json::json!({ "reloaded": true, "num_docs": num_docs })))
}

/// Display contract: scores carry 4 decimal digits.
fn round4(score: f32) -> f32 {
    (score * 10_000.0).round() / 10_000.0
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
