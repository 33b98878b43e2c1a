use axum::{
    extract::{Query, State},
    http::{header::LOCATION, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{AuthInfo, RequestId},
    models::SearchResponse,
    services::{playback, search, settings},
};

use super::AppState;

/// Query string as ordered pairs. Repeated keys are allowed; the first
/// occurrence wins.
type QueryPairs = Vec<(String, String)>;

fn first_param<'a>(params: &'a QueryPairs, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Search the media server for playable videos
pub async fn search(
    auth: AuthInfo,
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<QueryPairs>,
) -> AppResult<Json<SearchResponse>> {
    let config = settings::resolve_xiaoya_config(state.config_provider.as_ref()).await?;
    let client = state.client_factory.client_for(&config);

    // Kept as text: a non-numeric page falls back to 1 instead of failing
    let page = search::parse_page(first_param(&params, "page"));
    let keyword = first_param(&params, "keyword");
    let response = search::search_videos(client.as_ref(), keyword, page).await?;

    tracing::info!(
        request_id = %request_id,
        username = %auth.username,
        page = response.page,
        videos = response.videos.len(),
        total = response.total,
        "Search completed"
    );

    Ok(Json(response))
}

/// Redirect to the playable URL of a file
pub async fn playback(
    auth: AuthInfo,
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<QueryPairs>,
) -> AppResult<Response> {
    let config = settings::resolve_xiaoya_config(state.config_provider.as_ref()).await?;
    let client = state.client_factory.client_for(&config);

    let url = playback::resolve_playback(client.as_ref(), first_param(&params, "path")).await?;
    let location = HeaderValue::from_str(&url)
        .map_err(|e| AppError::Internal(format!("invalid play URL: {}", e)))?;

    tracing::info!(
        request_id = %request_id,
        username = %auth.username,
        "Redirecting to play URL"
    );

    Ok((StatusCode::FOUND, [(LOCATION, location)]).into_response())
}
