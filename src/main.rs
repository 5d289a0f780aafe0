use std::sync::Arc;

use suit_feed::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache, KeyValueStore, RedisStore},
    services::{providers::InternetArchiveProvider, ArchiveFetcher, PreferenceStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suit_feed=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let tuning = config.tuning();

    let store: Arc<dyn KeyValueStore> =
        Arc::new(RedisStore::new(create_redis_client(&config.redis_url)?));
    let (cache, cache_writer) = Cache::new(store.clone());

    let provider = InternetArchiveProvider::new(
        cache,
        config.archive_search_url.clone(),
        config.archive_metadata_url.clone(),
        config.archive_download_url.clone(),
    );
    let fetcher = ArchiveFetcher::new(Arc::new(provider), tuning.min_keyword_matches);
    let preferences = PreferenceStore::new(store, config.preferences_key.clone(), tuning.watched_limit);

    let state = AppState::new(fetcher, preferences, tuning, config.bootstrap_count);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_writer.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
