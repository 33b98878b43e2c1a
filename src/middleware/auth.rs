use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
};
use serde::Deserialize;

use crate::error::AppError;

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth";

/// Identity carried by the `auth` cookie
///
/// The cookie value is URL-encoded JSON written by the login flow. Signature
/// and timestamp are carried along but not verified here.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuthInfo {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Parse the session cookie. Returns `None` when the cookie is absent,
/// malformed, or names no user.
pub fn extract_auth_info(headers: &HeaderMap) -> Option<AuthInfo> {
    let raw = find_cookie(headers, AUTH_COOKIE)?;
    let decoded = urlencoding::decode(raw).ok()?;
    let info: AuthInfo = serde_json::from_str(&decoded).ok()?;

    if info.username.is_empty() {
        return None;
    }
    Some(info)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthInfo
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_auth_info(&parts.headers).ok_or(AppError::Unauthorized)
    }
}
