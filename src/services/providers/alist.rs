//! AList v3 client used to talk to a Xiaoya media server
//!
//! API Flow:
//! 1. Auth: a configured token is sent as-is; otherwise `/api/auth/login`
//!    exchanges username/password for a token that is kept for later calls
//! 2. Search: `/api/fs/search` → paged hits across the whole index
//! 3. Play: `/api/fs/get` → `raw_url` of the file, or a `/d/` link on the
//!    server itself when the storage does not expose one

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client as HttpClient, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{AlistLoginData, AlistObject, AlistResponse, SearchPage, XiaoyaConfig},
    services::providers::{MediaClient, MediaClientFactory},
};

const LOGIN_PATH: &str = "/api/auth/login";
const SEARCH_PATH: &str = "/api/fs/search";
const GET_PATH: &str = "/api/fs/get";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// AList reports success as `code: 200` inside the body
const CODE_OK: i64 = 200;
const CODE_UNAUTHORIZED: i64 = 401;

pub struct AlistClient {
    http_client: HttpClient,
    server_url: String,
    username: Option<String>,
    password: Option<String>,
    token: Option<String>,
    /// Token obtained through `/api/auth/login`
    session_token: RwLock<Option<String>>,
}

impl AlistClient {
    pub fn new(
        http_client: HttpClient,
        server_url: &str,
        username: Option<String>,
        password: Option<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
            username: username.filter(|u| !u.is_empty()),
            password,
            token: token.filter(|t| !t.is_empty()),
            session_token: RwLock::new(None),
        }
    }

    pub fn from_config(http_client: HttpClient, config: &XiaoyaConfig) -> Self {
        Self::new(
            http_client,
            &config.server_url,
            config.username.clone(),
            config.password.clone(),
            config.token.clone(),
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_url, path)
    }

    fn uses_login(&self) -> bool {
        self.token.is_none() && self.username.is_some()
    }

    /// Value for the `Authorization` header, logging in first if needed.
    /// `None` means anonymous (guest) access.
    async fn authorization(&self) -> AppResult<Option<String>> {
        if let Some(token) = &self.token {
            return Ok(Some(token.clone()));
        }

        let Some(username) = &self.username else {
            return Ok(None);
        };

        if let Some(token) = self.session_token.read().await.clone() {
            return Ok(Some(token));
        }

        let mut session = self.session_token.write().await;
        // Another request may have logged in while we waited for the lock
        if let Some(token) = session.clone() {
            return Ok(Some(token));
        }

        let token = self.login(username).await?;
        *session = Some(token.clone());
        Ok(Some(token))
    }

    async fn login(&self, username: &str) -> AppResult<String> {
        let body = json!({
            "username": username,
            "password": self.password.as_deref().unwrap_or_default(),
        });

        let response = self
            .http_client
            .post(self.endpoint(LOGIN_PATH))
            .json(&body)
            .send()
            .await?;

        let envelope = Self::read_envelope::<AlistLoginData>(response).await?;
        let data = Self::into_data(envelope)?;

        tracing::info!(
            server = %self.server_url,
            username = %username,
            "Logged in to media server"
        );

        Ok(data.token)
    }

    /// POST a JSON body and unwrap the AList envelope. A rejected login token
    /// is dropped and the call retried once with a fresh one.
    async fn post<T: DeserializeOwned>(&self, path: &str, body: &Value) -> AppResult<T> {
        let mut retried = false;

        loop {
            let mut request = self.http_client.post(self.endpoint(path)).json(body);
            if let Some(token) = self.authorization().await? {
                request = request.header(AUTHORIZATION, token);
            }

            let envelope = Self::read_envelope::<T>(request.send().await?).await?;

            if envelope.code == CODE_UNAUTHORIZED && self.uses_login() && !retried {
                tracing::info!(server = %self.server_url, "Session token rejected, logging in again");
                *self.session_token.write().await = None;
                retried = true;
                continue;
            }

            return Self::into_data(envelope);
        }
    }

    async fn read_envelope<T: DeserializeOwned>(response: Response) -> AppResult<AlistResponse<T>> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Media server returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn into_data<T>(envelope: AlistResponse<T>) -> AppResult<T> {
        if envelope.code != CODE_OK {
            let message = if envelope.message.is_empty() {
                format!("Media server returned code {}", envelope.code)
            } else {
                envelope.message
            };
            return Err(AppError::Provider(message));
        }

        envelope
            .data
            .ok_or_else(|| AppError::Provider("Media server returned no data".to_string()))
    }

    /// Download link served by AList itself, used when the storage gives no
    /// direct URL
    fn download_url(&self, path: &str, sign: &str) -> String {
        let encoded = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let mut url = format!("{}/d/{}", self.server_url, encoded);
        if !sign.is_empty() {
            url.push_str("?sign=");
            url.push_str(&urlencoding::encode(sign));
        }
        url
    }
}

#[async_trait::async_trait]
impl MediaClient for AlistClient {
    async fn resolve_play_url(&self, path: &str) -> AppResult<String> {
        let object: AlistObject = self
            .post(GET_PATH, &json!({ "path": path, "password": "" }))
            .await?;

        let url = if object.raw_url.is_empty() {
            self.download_url(path, &object.sign)
        } else {
            object.raw_url
        };

        tracing::info!(path = %path, "Play URL resolved");

        Ok(url)
    }

    async fn search(&self, keyword: &str, page: u32, per_page: u32) -> AppResult<SearchPage> {
        let body = json!({
            "parent": "/",
            "keywords": keyword,
            "scope": 0,
            "page": page,
            "per_page": per_page,
            "password": "",
        });

        let result: SearchPage = self.post(SEARCH_PATH, &body).await?;

        tracing::info!(
            keyword = %keyword,
            page = page,
            results = result.content.len(),
            total = result.total,
            "Media search completed"
        );

        Ok(result)
    }
}

/// Hands out [`AlistClient`]s, reusing the last one while the configuration
/// is unchanged so its login token survives across requests
pub struct AlistClientFactory {
    http_client: HttpClient,
    cached: Mutex<Option<(XiaoyaConfig, Arc<AlistClient>)>>,
}

impl AlistClientFactory {
    pub fn new() -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_http_client(http_client))
    }

    pub fn with_http_client(http_client: HttpClient) -> Self {
        Self {
            http_client,
            cached: Mutex::new(None),
        }
    }
}

impl MediaClientFactory for AlistClientFactory {
    fn client_for(&self, config: &XiaoyaConfig) -> Arc<dyn MediaClient> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((fingerprint, client)) = cached.as_ref() {
            if fingerprint == config {
                return client.clone();
            }
        }

        tracing::debug!(server = %config.server_url, "Creating media client");
        let client = Arc::new(AlistClient::from_config(self.http_client.clone(), config));
        *cached = Some((config.clone(), client.clone()));
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(server_url: &str) -> AlistClient {
        AlistClient::new(HttpClient::new(), server_url, None, None, None)
    }

    fn test_config(server_url: &str) -> XiaoyaConfig {
        XiaoyaConfig {
            enabled: true,
            server_url: server_url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = test_client("http://alist.local:5678/");
        assert_eq!(
            client.endpoint(SEARCH_PATH),
            "http://alist.local:5678/api/fs/search"
        );
    }

    #[test]
    fn test_download_url_encodes_segments() {
        let client = test_client("http://alist.local:5678");
        assert_eq!(
            client.download_url("/电影/The Matrix.mkv", ""),
            "http://alist.local:5678/d/%E7%94%B5%E5%BD%B1/The%20Matrix.mkv"
        );
        assert_eq!(
            client.download_url("movies/a.mp4", "abc=:0"),
            "http://alist.local:5678/d/movies/a.mp4?sign=abc%3D%3A0"
        );
    }

    #[test]
    fn test_into_data_reports_server_message() {
        let envelope: AlistResponse<AlistObject> = AlistResponse {
            code: 500,
            message: "object not found".to_string(),
            data: None,
        };
        let err = AlistClient::into_data(envelope).unwrap_err();
        assert_eq!(err.to_string(), "object not found");

        let envelope: AlistResponse<AlistObject> = AlistResponse {
            code: 403,
            message: String::new(),
            data: None,
        };
        let err = AlistClient::into_data(envelope).unwrap_err();
        assert_eq!(err.to_string(), "Media server returned code 403");
    }

    #[test]
    fn test_credentials_select_auth_mode() {
        let token_client = AlistClient::new(
            HttpClient::new(),
            "http://alist.local",
            Some("admin".to_string()),
            Some("secret".to_string()),
            Some("alist-token".to_string()),
        );
        assert!(!token_client.uses_login());

        let login_client = AlistClient::new(
            HttpClient::new(),
            "http://alist.local",
            Some("admin".to_string()),
            Some("secret".to_string()),
            Some(String::new()),
        );
        assert!(login_client.uses_login());

        let guest_client = AlistClient::new(
            HttpClient::new(),
            "http://alist.local",
            Some(String::new()),
            None,
            None,
        );
        assert!(!guest_client.uses_login());
    }

    #[test]
    fn test_factory_reuses_client_for_same_config() {
        let factory = AlistClientFactory::with_http_client(HttpClient::new());
        let config = test_config("http://alist.local");

        let first = factory.client_for(&config);
        let second = factory.client_for(&config);
        assert!(Arc::ptr_eq(&first, &second));

        let changed = test_config("http://other.local");
        let third = factory.client_for(&changed);
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
