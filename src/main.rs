mod modules;

use anyhow::Context;
use bookshelf_kernel::{InitCtx, ModuleRegistry};
use bookshelf_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;

    bookshelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "bookshelf bootstrap starting"
    );

    let pool = bookshelf_db::connect(&settings.database).await?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool.clone());

    let migrations = registry.collect_migrations();
    bookshelf_db::apply_migrations(&pool, &migrations)
        .await
        .with_context(|| "failed to apply module migrations")?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("bookshelf bootstrap complete");

    // Modules are stopped even when the server exits with an error.
    let served = bookshelf_http::start_server(&registry, &settings).await;

    if let Err(e) = registry.stop_all().await {
        tracing::error!(error = %e, "failed to stop modules during shutdown");
    }

    served
}
