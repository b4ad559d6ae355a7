use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use rulescout_core::types::{GameEntry, RulesAnswer};
use rulescout_core::Error;
use rulescout_engine::{DocumentSource, IngestReport, QueryOptions};

use crate::sources;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/games", get(games))
        .route("/api/chat", post(chat))
        .route("/api/ingest", post(ingest))
        .with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

fn default_true() -> bool {
    true
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    games: usize,
    chunks: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        games: state.engine.list_games().len(),
        chunks: state.engine.indexed_chunks(),
    })
}

#[derive(Serialize)]
struct GamesResponse {
    games: Vec<GameEntry>,
}

async fn games(State(state): State<Arc<AppState>>) -> Json<GamesResponse> {
    Json(GamesResponse { games: state.engine.list_games() })
}

#[derive(Deserialize)]
struct ChatRequest {
    query: String,
    #[serde(default)]
    game_filter: Vec<String>,
    #[serde(default = "default_true")]
    strict: bool,
    #[serde(default = "default_true")]
    allow_interpretation: bool,
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<RulesAnswer>, ApiError> {
    let options = QueryOptions {
        game_filter: request.game_filter,
        strict: request.strict,
        allow_interpretation: request.allow_interpretation,
    };
    match state.engine.retrieve_and_answer(&request.query, &options).await {
        Ok(answer) => Ok(Json(answer)),
        Err(e @ Error::InvalidInput(_)) => {
            Err(error_response(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => Err(error_response(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

#[derive(Deserialize)]
struct IngestRequest {
    urls: Vec<String>,
    #[serde(default = "default_true")]
    reset: bool,
}

#[derive(Serialize)]
struct IngestResponse {
    report: IngestReport,
    /// URLs refused by the allow-list or that failed to fetch.
    rejected: Vec<RejectedUrl>,
}

#[derive(Serialize)]
struct RejectedUrl {
    url: String,
    reason: String,
}

async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, ApiError> {
    if request.urls.is_empty() {
        return Err(error_response(StatusCode::BAD_REQUEST, "at least one url is required"));
    }

    let mut documents = Vec::new();
    let mut rejected = Vec::new();
    for url in request.urls {
        if !sources::host_allowed(&url, &state.ingest.allowlist) {
            tracing::warn!(%url, "url refused by publisher allow-list");
            rejected.push(RejectedUrl {
                url,
                reason: "host not on the publisher allow-list".to_string(),
            });
            continue;
        }
        match sources::fetch_pdf(&state.http, &url, state.ingest.min_pdf_bytes).await {
            Ok(bytes) => {
                let (game_id, title) = sources::identity_from_url(&url);
                documents.push(DocumentSource { game_id, title, bytes });
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "fetch failed");
                rejected.push(RejectedUrl { url, reason: e.to_string() });
            }
        }
    }

    let report = state.engine.run_ingest(documents, request.reset).await;
    Ok(Json(IngestResponse { report, rejected }))
}
