mod api;
mod middleware;
mod store;

use std::sync::Arc;

use staybook_geocode::GeocodePipeline;
use staybook_listings::ListingService;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
    store::PgListingStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = staybook_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = staybook_db::PoolConfig::from_app_config(&config);
    let pool = staybook_db::connect_pool(config.require_database_url()?, pool_config).await?;
    let applied = staybook_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let pipeline = Arc::new(GeocodePipeline::from_config(&config.geocode)?);
    tracing::info!(
        providers = ?pipeline.provider_names(),
        default_coordinate = ?pipeline.default_coordinate(),
        "geocoding pipeline ready"
    );

    let missing = config.image_storage.missing_vars();
    if !missing.is_empty() {
        tracing::warn!(
            missing = ?missing,
            "image storage credentials missing; listing creation will be rejected"
        );
    }

    let listings = ListingService::new(
        pipeline,
        PgListingStore::new(pool.clone()),
        config.image_storage.clone(),
    );

    let auth = AuthState::from_config(&config)?;
    let app = build_app(AppState { pool, listings }, auth, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "staybook server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
