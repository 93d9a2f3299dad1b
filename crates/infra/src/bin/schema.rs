//! Schema admin command: `notely-schema <create|drop>`.

use sqlx::postgres::PgPoolOptions;

use notely_infra::DatabaseConfig;
use notely_infra::schema;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    notely_observability::init();

    let action = std::env::args().nth(1).unwrap_or_default();

    let db = DatabaseConfig::from_env();
    let pool = PgPoolOptions::new()
        .acquire_timeout(db.ping_timeout)
        .connect(&db.url)
        .await?;

    match action.as_str() {
        "create" => {
            schema::create(&pool).await?;
            tracing::info!("schema created");
        }
        "drop" => {
            schema::drop(&pool).await?;
            tracing::info!("schema dropped");
        }
        _ => anyhow::bail!("usage: notely-schema <create|drop>"),
    }

    Ok(())
}
