use serde::{Deserialize, Serialize};

/// Process-wide runtime configuration document
///
/// Only the sections this gateway reads are modelled; unknown keys are
/// ignored so the document can be shared with other features.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    #[serde(rename = "XiaoyaConfig", default, skip_serializing_if = "Option::is_none")]
    pub xiaoya_config: Option<XiaoyaConfig>,
}

/// Connection settings for the Xiaoya (AList) media server
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub struct XiaoyaConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "ServerURL", default)]
    pub server_url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

impl XiaoyaConfig {
    /// Usable only when enabled and pointing at a server
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.server_url.is_empty()
    }
}
