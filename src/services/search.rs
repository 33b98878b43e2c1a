use crate::{
    error::{AppError, AppResult},
    models::{SearchItem, SearchResponse, VideoEntry},
    services::providers::MediaClient,
};

/// Results requested from the media server per page
pub const PAGE_SIZE: u32 = 50;

const VIDEO_EXTENSIONS: [&str; 9] = [
    ".mp4", ".mkv", ".avi", ".m3u8", ".flv", ".ts", ".mov", ".wmv", ".webm",
];

/// Parse the `page` query value. A leading integer is honoured (`"3abc"` is
/// page 3); anything else, including values below 1, falls back to page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 1;
    };

    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 1;
    }

    match digits[..end].parse::<u32>() {
        Ok(0) => 1,
        Ok(page) => page,
        // More digits than fit in a u32
        Err(_) => u32::MAX,
    }
}

pub fn is_video(item: &SearchItem) -> bool {
    if item.is_dir {
        return false;
    }
    let name = item.name.to_lowercase();
    VIDEO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Keep playable files, in remote order. The remote index reports full paths
/// in `name`, so it doubles as the path.
pub fn filter_videos(items: Vec<SearchItem>) -> Vec<VideoEntry> {
    items
        .into_iter()
        .filter(is_video)
        .map(|item| VideoEntry {
            path: item.name.clone(),
            name: item.name,
        })
        .collect()
}

/// Search the media server and keep only video files
pub async fn search_videos(
    client: &dyn MediaClient,
    keyword: Option<&str>,
    page: u32,
) -> AppResult<SearchResponse> {
    let keyword = keyword
        .filter(|k| !k.is_empty())
        .ok_or(AppError::MissingParameter("Missing search keyword"))?;

    let result = client.search(keyword, page, PAGE_SIZE).await?;
    let videos = filter_videos(result.content);

    Ok(SearchResponse {
        videos,
        total: result.total,
        page,
    })
}
