//! Postgres connection pool and module-migration runner.

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use bookshelf_kernel::settings::DatabaseSettings;
use bookshelf_kernel::Migration;

pub use sqlx::PgPool;

const MIGRATION_LEDGER: &str = r#"
    CREATE TABLE IF NOT EXISTS schema_migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (module, id)
    );
"#;

/// Establish a connection pool to the Postgres store.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&settings.url)
        .await
        .with_context(|| "failed to connect to the database")?;

    Ok(pool)
}

/// Apply module-contributed migrations that have not run yet.
///
/// Applied migrations are recorded in `schema_migrations` keyed by
/// `(module, id)`, so re-running at every startup is safe.
pub async fn apply_migrations(
    pool: &PgPool,
    migrations: &[(String, Migration)],
) -> anyhow::Result<()> {
    sqlx::raw_sql(MIGRATION_LEDGER)
        .execute(pool)
        .await
        .with_context(|| "failed to create migration ledger")?;

    for (module, migration) in migrations {
        let applied = sqlx::query("SELECT 1 FROM schema_migrations WHERE module = $1 AND id = $2")
            .bind(module)
            .bind(migration.id)
            .fetch_optional(pool)
            .await
            .with_context(|| "failed to read migration ledger")?;

        if applied.is_some() {
            continue;
        }

        tracing::info!(module = %module, id = migration.id, "applying migration");

        sqlx::raw_sql(migration.up)
            .execute(pool)
            .await
            .with_context(|| format!("migration '{}/{}' failed", module, migration.id))?;

        sqlx::query("INSERT INTO schema_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(pool)
            .await
            .with_context(|| "failed to record migration")?;
    }

    Ok(())
}

/// True if the error is a Postgres unique-constraint violation (23505).
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
