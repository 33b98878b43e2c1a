use serde::Deserialize;
use std::path::PathBuf;

use crate::models::{RuntimeConfig, XiaoyaConfig};

/// Process configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON document holding the runtime configuration. Re-read on every
    /// request when set.
    #[serde(default)]
    pub runtime_config_path: Option<PathBuf>,

    /// Seed values for the Xiaoya section when no runtime config file is used
    #[serde(default)]
    pub xiaoya_enabled: bool,
    #[serde(default)]
    pub xiaoya_server_url: String,
    #[serde(default)]
    pub xiaoya_username: Option<String>,
    #[serde(default)]
    pub xiaoya_password: Option<String>,
    #[serde(default)]
    pub xiaoya_token: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Runtime configuration built from the `XIAOYA_*` variables
    pub fn seed_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            xiaoya_config: Some(XiaoyaConfig {
                enabled: self.xiaoya_enabled,
                server_url: self.xiaoya_server_url.clone(),
                username: self.xiaoya_username.clone(),
                password: self.xiaoya_password.clone(),
                token: self.xiaoya_token.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.runtime_config_path.is_none());
        assert!(!config.xiaoya_enabled);
    }

    #[test]
    fn test_seed_runtime_config() {
        let config = from_pairs(&[
            ("XIAOYA_ENABLED", "true"),
            ("XIAOYA_SERVER_URL", "http://alist.local:5678"),
            ("XIAOYA_TOKEN", "alist-abc"),
        ]);

        let runtime = config.seed_runtime_config();
        let xiaoya = runtime.xiaoya_config.unwrap();
        assert!(xiaoya.enabled);
        assert_eq!(xiaoya.server_url, "http://alist.local:5678");
        assert_eq!(xiaoya.token.as_deref(), Some("alist-abc"));
        assert!(xiaoya.username.is_none());
    }
}
