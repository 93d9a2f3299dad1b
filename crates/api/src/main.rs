//! HTTP process entrypoint.

use std::sync::Arc;

use anyhow::Context;

use notely_api::app;
use notely_infra::{CacheConfig, DatabaseConfig, HttpConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notely_observability::init();

    let db_cfg = DatabaseConfig::from_env();
    let cache_cfg = CacheConfig::from_env();
    let http_cfg = HttpConfig::from_env();

    let services = Arc::new(app::services::build_services(&db_cfg, &cache_cfg).await?);
    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_cfg.port))
        .await
        .with_context(|| format!("failed to bind port {}", http_cfg.port))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
