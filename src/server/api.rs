use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::data::{Player, RosterError};
use crate::index::{IndexStats, QueryError, RosterStore};

const DEFAULT_TOP_LIMIT: usize = 5;
const DEFAULT_TOP_MIN_RATING: u32 = 2700;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Query(QueryError),
    Reload(RosterError),
    Internal(String),
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        Self::Query(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        Self::Reload(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "error", message),
            Self::Query(QueryError::PlayerNotFound(_)) => {
                (StatusCode::NOT_FOUND, "error", "Player not found".to_string())
            }
            Self::Query(QueryError::IndexNotReady) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "warming_up",
                "Player index is still loading".to_string(),
            ),
            Self::Reload(err @ RosterError::ReloadInProgress) => {
                (StatusCode::CONFLICT, "error", err.to_string())
            }
            Self::Reload(err) => (StatusCode::INTERNAL_SERVER_ERROR, "error", err.to_string()),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, "error", message),
        };
        (code, Json(ErrorResponse { status, message })).into_response()
    }
}

pub async fn route_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            status: "error",
            message: "Route not found".to_string(),
        }),
    )
        .into_response()
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub index: Option<IndexStats>,
}

pub async fn health(State(store): State<Arc<RosterStore>>) -> Json<HealthResponse> {
    let index = store.snapshot().ok().map(|snapshot| snapshot.stats.clone());
    Json(HealthResponse {
        status: if index.is_some() { "ok" } else { "warming_up" },
        service: "fide-lookup-api",
        version: env!("CARGO_PKG_VERSION"),
        index,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub async fn search_players(
    State(store): State<Arc<RosterStore>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let Query(params) = params?;
    let snapshot = store.snapshot()?;
    let results: Vec<Player> = snapshot
        .index
        .search(&params.q)
        .into_iter()
        .cloned()
        .collect();
    tracing::debug!(query = %params.q, results = results.len(), "search");
    Ok(Json(results))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<usize>,
    pub min_rating: Option<u32>,
}

pub async fn top_players(
    State(store): State<Arc<RosterStore>>,
    params: Result<Query<TopParams>, QueryRejection>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let Query(params) = params?;
    let snapshot = store.snapshot()?;
    let results = snapshot
        .index
        .top_rated(
            params.limit.unwrap_or(DEFAULT_TOP_LIMIT),
            params.min_rating.unwrap_or(DEFAULT_TOP_MIN_RATING),
        )
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(results))
}

pub async fn get_player(
    State(store): State<Arc<RosterStore>>,
    Path(id): Path<String>,
) -> Result<Json<Player>, ApiError> {
    let snapshot = store.snapshot()?;
    let player = snapshot.index.get(&id)?.clone();
    Ok(Json(player))
}

/// Rebuild the index from the roster file. Parsing runs on the blocking pool
/// so request handling is never stalled by it.
pub async fn reload(State(store): State<Arc<RosterStore>>) -> Result<Json<IndexStats>, ApiError> {
    let snapshot = tokio::task::spawn_blocking(move || store.reload())
        .await
        .map_err(|err| ApiError::Internal(format!("reload task failed: {err}")))??;
    Ok(Json(snapshot.stats.clone()))
}
