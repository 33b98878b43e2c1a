//! Remote media server abstraction
//!
//! The gateway only ever needs two things from the media server: a paged
//! keyword search and the playable URL of a file. Everything about how the
//! server is reached (login handshake, envelope format) lives behind
//! [`MediaClient`].

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{SearchPage, XiaoyaConfig},
};

pub mod alist;

pub use alist::{AlistClient, AlistClientFactory};

/// Client bound to one media server and one set of credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaClient: Send + Sync {
    /// Resolve a direct, playable URL for a file path in the remote index
    async fn resolve_play_url(&self, path: &str) -> AppResult<String>;

    /// Keyword search over the remote index
    async fn search(&self, keyword: &str, page: u32, per_page: u32) -> AppResult<SearchPage>;
}

/// Builds clients from a validated provider configuration
///
/// Construction never fails; configuration problems are caught earlier by
/// [`crate::services::settings::resolve_xiaoya_config`].
pub trait MediaClientFactory: Send + Sync {
    fn client_for(&self, config: &XiaoyaConfig) -> Arc<dyn MediaClient>;
}
