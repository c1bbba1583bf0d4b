use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use bookforge::api::types::{AccessVerifier, AllowAllVerifier, ApiContext, StaticTokenVerifier};
use bookforge::api::start_api_server;
use bookforge::config::AppConfig;
use bookforge::llm::client::ChatCompletionClient;
use bookforge::llm::CompletionClient;
use bookforge::pipeline::EbookPipeline;
use bookforge::store::{ArtifactStore, SqliteArtifactStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(
        "Bookforge v{} starting on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_addr
    );

    let llm: Option<Box<dyn CompletionClient>> = match &config.api_key {
        Some(key) => {
            tracing::info!(model = %config.model, base_url = %config.base_url, "Upstream completion client configured");
            Some(Box::new(ChatCompletionClient::new(
                &config.base_url,
                key,
                &config.model,
                config.llm_timeout_secs,
            )))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; serving fallback artifacts only");
            None
        }
    };

    let access: Arc<dyn AccessVerifier> = if config.access_tokens.is_empty() {
        tracing::warn!("ACCESS_TOKENS not set; generation routes are unauthenticated");
        Arc::new(AllowAllVerifier)
    } else {
        Arc::new(StaticTokenVerifier::new(config.access_tokens.clone()))
    };

    let mut ctx = ApiContext::new(Arc::new(EbookPipeline::new(llm)), access);

    if let Some(path) = &config.db_path {
        match SqliteArtifactStore::open(path) {
            Ok(store) => {
                tracing::info!(path = %path.display(), "Artifact store opened");
                let store: Arc<dyn ArtifactStore> = Arc::new(store);
                ctx = ctx.with_store(store);
            }
            Err(e) => {
                tracing::warn!("Failed to open artifact store at {}: {e}", path.display());
            }
        }
    }

    let mut server = start_api_server(ctx, config.bind_addr)
        .await
        .map_err(std::io::Error::other)?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    server.shutdown();

    Ok(())
}
