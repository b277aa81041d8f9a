//! HTTP JSON server.
//!
//! Exposes recommendations and pairwise similarity over a small JSON API.
//! The rating snapshot is loaded once at startup and shared read-only
//! across handlers; restart the server to pick up a new import.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/recommend` | Top-N similar items for `{"item_id", "top_n"?, "explain"?}` |
//! | `POST` | `/similarity` | Correlation and support for `{"a", "b"}` |
//! | `GET`  | `/items/{id}` | Catalog entry for one item |
//! | `GET`  | `/health` | Health check (returns version and snapshot size) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "item id must be positive, got 0" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front-ends
//! can call the API directly.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};

use itemrec_core::models::{Item, ItemId, Recommendation};
use itemrec_core::query::{parse_item_id, RecommendQuery};
use itemrec_core::store::memory::InMemoryStore;
use itemrec_core::store::{Catalog, RatingStore};
use itemrec_core::RecError;

use crate::config::Config;
use crate::recommend::recommend_from_store;
use crate::similarity::{similarity_from_store, SimilarityResponse};
use crate::source;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    /// Immutable snapshot loaded at startup.
    store: Arc<InMemoryStore>,
}

/// Starts the HTTP server.
///
/// Loads the configured data source, binds to `[server].bind`, and serves
/// until the process is terminated. This is the entry point used by
/// `rec serve`.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = source::load_store(config).await?;
    serve_store(config, Arc::new(store)).await
}

/// Serve an already-loaded snapshot on `[server].bind`.
pub async fn serve_store(config: &Config, store: Arc<InMemoryStore>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let app = router(Arc::new(config.clone()), store);

    println!("rec server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router without binding, for embedding in another server.
pub fn router(config: Arc<Config>, store: Arc<InMemoryStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/recommend", post(handle_recommend))
        .route("/similarity", post(handle_similarity))
        .route("/items/{id}", get(handle_item))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(AppState { config, store })
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<RecError> for AppError {
    fn from(err: RecError) -> Self {
        match err {
            RecError::InvalidInput(_) => bad_request(err.to_string()),
            RecError::NotFound(_) => not_found(err.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        bad_request(rejection.body_text())
    }
}

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Item ids arrive as JSON numbers or numeric strings.
fn item_id_from_json(value: &Value) -> Result<ItemId, RecError> {
    match value {
        Value::Number(n) => parse_item_id(&n.to_string()),
        Value::String(s) => parse_item_id(s),
        other => Err(RecError::InvalidInput(format!(
            "item id must be an integer, got {}",
            other
        ))),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    version: String,
    ratings: usize,
    items: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ratings: state.store.rating_count(),
        items: state.store.item_count(),
    })
}

// ============ POST /recommend ============

#[derive(Deserialize)]
struct RecommendRequest {
    item_id: Value,
    top_n: Option<usize>,
    #[serde(default)]
    explain: bool,
}

#[derive(Serialize)]
struct RecommendResponse {
    item_id: ItemId,
    results: Vec<Recommendation>,
}

async fn handle_recommend(
    State(state): State<AppState>,
    body: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, AppError> {
    let Json(req) = body?;
    let item_id = item_id_from_json(&req.item_id)?;
    let query = RecommendQuery::new(item_id)
        .with_top_n(req.top_n.unwrap_or(state.config.recommend.default_top_n))
        .with_explain(req.explain);

    let store = state.store.clone();
    // Each query rescans the snapshot; keep it off the async workers.
    let results = tokio::task::spawn_blocking(move || recommend_from_store(&store, &query))
        .await
        .map_err(|e| AppError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal".to_string(),
            message: e.to_string(),
        })?;

    debug!(item_id, returned = results.len(), "served recommendation");
    Ok(Json(RecommendResponse { item_id, results }))
}

// ============ POST /similarity ============

#[derive(Deserialize)]
struct SimilarityRequest {
    a: Value,
    b: Value,
}

async fn handle_similarity(
    State(state): State<AppState>,
    body: Result<Json<SimilarityRequest>, JsonRejection>,
) -> Result<Json<SimilarityResponse>, AppError> {
    let Json(req) = body?;
    let a = item_id_from_json(&req.a)?;
    let b = item_id_from_json(&req.b)?;
    Ok(Json(similarity_from_store(&state.store, a, b)))
}

// ============ GET /items/{id} ============

#[derive(Serialize)]
struct ItemResponse {
    #[serde(flatten)]
    item: Item,
    raters: usize,
}

async fn handle_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ItemResponse>, AppError> {
    let item_id = parse_item_id(&raw_id)?;
    let item = state
        .store
        .item(item_id)
        .cloned()
        .ok_or(RecError::NotFound(item_id))?;
    info!(item_id, "served catalog entry");
    Ok(Json(ItemResponse {
        item,
        raters: state.store.raters_of(item_id),
    }))
}
