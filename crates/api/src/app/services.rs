//! Infrastructure wiring for the HTTP process.

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use notely_infra::{CacheConfig, DatabaseConfig, PgNoteStore, RedisNoteCache};
use notely_notes::LookupService;

/// Shared service handles, created once at startup and owned for the process
/// lifetime. Requests share them; none of them hold per-request state.
pub struct AppServices {
    pub lookup: LookupService,
}

impl AppServices {
    pub fn new(lookup: LookupService) -> Self {
        Self { lookup }
    }
}

/// Wire live Postgres/Redis services from config, verifying both backends
/// with their bounded ping timeouts.
pub async fn build_services(
    db: &DatabaseConfig,
    cache: &CacheConfig,
) -> anyhow::Result<AppServices> {
    let pool = PgPoolOptions::new()
        .acquire_timeout(db.ping_timeout)
        .connect(&db.url)
        .await
        .context("could not connect to database")?;
    let store = Arc::new(PgNoteStore::new(pool, db.operation_timeout));

    let redis = RedisNoteCache::connect(&cache.url, cache.ping_timeout, cache.operation_timeout)
        .await
        .context("could not connect to cache")?;

    Ok(AppServices::new(LookupService::new(
        store,
        Arc::new(redis),
        cache.ttl,
    )))
}
