use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use xiaoya_gateway::{
    api::{create_router, AppState},
    config::Config,
    services::{
        providers::AlistClientFactory, ConfigProvider, FileConfigProvider, StaticConfigProvider,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xiaoya_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let config_provider: Arc<dyn ConfigProvider> = match &config.runtime_config_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Reading runtime config from file");
            Arc::new(FileConfigProvider::new(path.clone()))
        }
        None => {
            tracing::info!("Using runtime config from environment");
            Arc::new(StaticConfigProvider::new(config.seed_runtime_config()))
        }
    };
    let client_factory = Arc::new(AlistClientFactory::new()?);

    let app = create_router(AppState::new(config_provider, client_factory));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
