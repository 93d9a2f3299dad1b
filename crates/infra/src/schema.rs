//! Notes table DDL.

use sqlx::PgPool;

use notely_notes::StoreError;

pub const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    text TEXT NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)
"#;

pub const DROP_SCHEMA: &str = "DROP TABLE IF EXISTS notes";

pub async fn create(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(CREATE_SCHEMA)
        .execute(pool)
        .await
        .map_err(|err| StoreError::Database(format!("create schema: {err}")))?;
    Ok(())
}

pub async fn drop(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(DROP_SCHEMA)
        .execute(pool)
        .await
        .map_err(|err| StoreError::Database(format!("drop schema: {err}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_targets_the_notes_table() {
        assert!(CREATE_SCHEMA.contains("CREATE TABLE IF NOT EXISTS notes"));
        assert!(CREATE_SCHEMA.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(DROP_SCHEMA.contains("DROP TABLE IF EXISTS notes"));
    }
}
