//! Runtime configuration access
//!
//! Handlers never read process-wide configuration directly; they go through a
//! [`ConfigProvider`] held in the application state so tests can substitute
//! their own document.

use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::{RuntimeConfig, XiaoyaConfig},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Current runtime configuration
    async fn get_config(&self) -> AppResult<RuntimeConfig>;
}

/// Fixed, in-memory configuration
pub struct StaticConfigProvider {
    config: RuntimeConfig,
}

impl StaticConfigProvider {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl ConfigProvider for StaticConfigProvider {
    async fn get_config(&self) -> AppResult<RuntimeConfig> {
        Ok(self.config.clone())
    }
}

/// JSON document on disk, re-read on every call so edits apply without a
/// restart. A missing file reads as an empty document.
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn get_config(&self) -> AppResult<RuntimeConfig> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "Runtime config file not found");
                return Ok(RuntimeConfig::default());
            }
            Err(e) => {
                return Err(AppError::Config(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("failed to parse {}: {}", self.path.display(), e))
        })
    }
}

/// Load the runtime configuration and return the Xiaoya section if the
/// feature is present, enabled and has a server URL.
pub async fn resolve_xiaoya_config(provider: &dyn ConfigProvider) -> AppResult<XiaoyaConfig> {
    let config = provider.get_config().await?;

    match config.xiaoya_config {
        Some(xiaoya) if xiaoya.is_usable() => Ok(xiaoya),
        _ => Err(AppError::NotConfigured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn runtime(xiaoya: Option<XiaoyaConfig>) -> RuntimeConfig {
        RuntimeConfig {
            xiaoya_config: xiaoya,
        }
    }

    fn usable() -> XiaoyaConfig {
        XiaoyaConfig {
            enabled: true,
            server_url: "http://alist.local:5678".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_returns_usable_section() {
        let provider = StaticConfigProvider::new(runtime(Some(usable())));
        let resolved = resolve_xiaoya_config(&provider).await.unwrap();
        assert_eq!(resolved.server_url, "http://alist.local:5678");
    }

    #[tokio::test]
    async fn test_resolve_rejects_missing_disabled_or_urlless() {
        let cases = vec![
            None,
            Some(XiaoyaConfig {
                enabled: false,
                ..usable()
            }),
            Some(XiaoyaConfig {
                server_url: String::new(),
                ..usable()
            }),
        ];

        for case in cases {
            let provider = StaticConfigProvider::new(runtime(case));
            let err = resolve_xiaoya_config(&provider).await.unwrap_err();
            assert!(matches!(err, AppError::NotConfigured));
        }
    }

    #[tokio::test]
    async fn test_resolve_propagates_provider_failure() {
        let mut provider = MockConfigProvider::new();
        provider
            .expect_get_config()
            .times(1)
            .returning(|| Err(AppError::Config("storage unavailable".to_string())));

        let err = resolve_xiaoya_config(&provider).await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_file_provider_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"XiaoyaConfig": {{"Enabled": true, "ServerURL": "http://alist.local"}}}}"#
        )
        .unwrap();

        let provider = FileConfigProvider::new(file.path());
        let config = provider.get_config().await.unwrap();
        assert!(config.xiaoya_config.unwrap().is_usable());
    }

    #[tokio::test]
    async fn test_file_provider_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FileConfigProvider::new(dir.path().join("absent.json"));
        let config = provider.get_config().await.unwrap();
        assert!(config.xiaoya_config.is_none());
    }

    #[tokio::test]
    async fn test_file_provider_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let provider = FileConfigProvider::new(file.path());
        let err = provider.get_config().await.unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
