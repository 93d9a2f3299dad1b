//! Messaging process entrypoint.
//!
//! Wires config, Postgres, and the Redis Streams subscription, then runs the
//! consumer until SIGINT/SIGTERM. Shutdown drains in-flight messages,
//! bounded by the configured shutdown timeout. A small health endpoint runs
//! alongside for liveness probes.

use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing::{error, info};

use notely_infra::{DatabaseConfig, HttpConfig, MessagingConfig, PgNoteStore, RedisStreamsQueue};
use notely_messaging::NoteConsumer;
use notely_notes::CreateHandler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notely_observability::init();

    let db_cfg = DatabaseConfig::from_env();
    let msg_cfg = MessagingConfig::from_env();
    let http_cfg = HttpConfig::from_env();

    let pool = PgPoolOptions::new()
        .acquire_timeout(db_cfg.ping_timeout)
        .connect(&db_cfg.url)
        .await
        .context("could not connect to database")?;
    let store = Arc::new(PgNoteStore::new(pool, db_cfg.operation_timeout));

    let queue = RedisStreamsQueue::connect(&msg_cfg.url, &msg_cfg.stream, msg_cfg.ping_timeout)
        .await
        .context("could not connect to queue")?;
    let consumer_name = format!("consumer-{}", uuid::Uuid::now_v7());
    let subscription = queue
        .subscribe(&msg_cfg.group, &consumer_name, msg_cfg.wait_time)
        .await
        .context("could not open subscription")?;

    let app = axum::Router::new().route("/health", get(health));
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", http_cfg.port))
        .await
        .with_context(|| format!("could not bind health endpoint on port {}", http_cfg.port))?;
    info!(port = http_cfg.port, "health endpoint listening");
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            error!(error = %err, "health server failed");
        }
    });

    let handler = Arc::new(CreateHandler::new(store));
    let consumer = NoteConsumer::new(handler, msg_cfg.max_workers);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    info!(
        stream = %msg_cfg.stream,
        group = %msg_cfg.group,
        consumer = %consumer_name,
        max_workers = msg_cfg.max_workers,
        "consumer starting"
    );

    let mut consumer_task =
        tokio::spawn(async move { consumer.run(shutdown_rx, subscription).await });

    tokio::select! {
        // The consumer only finishes on its own on a fatal receive error.
        finished = &mut consumer_task => {
            finished.context("consumer panicked")??;
        }
        _ = shutdown_signal() => {
            info!("shutdown started");
            let _ = shutdown_tx.send(true);

            match tokio::time::timeout(msg_cfg.shutdown_timeout, consumer_task).await {
                Ok(finished) => finished.context("consumer panicked")??,
                Err(_) => {
                    error!("shutdown timed out before in-flight messages drained");
                }
            }
            info!("shutdown complete");
        }
    }

    Ok(())
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
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
