use std::sync::Arc;

use crate::services::{ConfigProvider, MediaClientFactory};

/// Shared application state
///
/// Holds no per-request data: configuration is fetched through the provider
/// on every request and clients come from the factory.
#[derive(Clone)]
pub struct AppState {
    pub config_provider: Arc<dyn ConfigProvider>,
    pub client_factory: Arc<dyn MediaClientFactory>,
}

impl AppState {
    pub fn new(
        config_provider: Arc<dyn ConfigProvider>,
        client_factory: Arc<dyn MediaClientFactory>,
    ) -> Self {
        Self {
            config_provider,
            client_factory,
        }
    }
}
