use serde::{Deserialize, Serialize};

pub mod settings;

pub use settings::{RuntimeConfig, XiaoyaConfig};

// ============================================================================
// AList API Types
// ============================================================================

/// Envelope wrapping every AList API response
#[derive(Debug, Clone, Deserialize)]
pub struct AlistResponse<T> {
    pub code: i64,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlistLoginData {
    pub token: String,
}

/// Single hit from `/api/fs/search`
///
/// Only `name` and `is_dir` drive the gateway's behaviour; the rest is kept
/// for logging and debugging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchItem {
    #[serde(default)]
    pub parent: String,
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub size: u64,
    #[serde(default, rename = "type")]
    pub kind: i64,
}

impl SearchItem {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            parent: String::new(),
            name: name.into(),
            is_dir: false,
            size: 0,
            kind: 0,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            is_dir: true,
            ..Self::file(name)
        }
    }
}

/// One page of remote search results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: Vec<SearchItem>,
    #[serde(default)]
    pub total: u64,
}

/// `/api/fs/get` payload; AList returns many more fields than these
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlistObject {
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub sign: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SearchItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SearchItem>>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Gateway Response Types
// ============================================================================

/// Playable file returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoEntry {
    pub name: String,
    pub path: String,
}

/// Body of a successful `/search` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub videos: Vec<VideoEntry>,
    /// Unfiltered remote total, not `videos.len()`
    pub total: u64,
    pub page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_tolerates_null_content() {
        let body = r#"{"code":200,"message":"success","data":{"content":null,"total":0}}"#;
        let parsed: AlistResponse<SearchPage> = serde_json::from_str(body).unwrap();
        let page = parsed.data.unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_search_item_from_alist_json() {
        let body = r#"{
            "parent": "/电影/科幻",
            "name": "The Matrix (1999).mkv",
            "is_dir": false,
            "size": 2147483648,
            "type": 2
        }"#;
        let item: SearchItem = serde_json::from_str(body).unwrap();
        assert_eq!(item.parent, "/电影/科幻");
        assert_eq!(item.name, "The Matrix (1999).mkv");
        assert!(!item.is_dir);
        assert_eq!(item.kind, 2);
    }
}
