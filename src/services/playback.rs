use crate::{
    error::{AppError, AppResult},
    services::providers::MediaClient,
};

/// Resolve the playable URL for a file in the remote index. The URL is
/// returned as the media server gave it.
pub async fn resolve_playback(client: &dyn MediaClient, path: Option<&str>) -> AppResult<String> {
    let path = path
        .filter(|p| !p.is_empty())
        .ok_or(AppError::MissingParameter("Missing parameter: path"))?;

    client.resolve_play_url(path).await
}
