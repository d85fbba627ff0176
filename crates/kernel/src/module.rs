use async_trait::async_trait;
use axum::Router;

/// Context provided to modules during initialization and startup.
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// A SQL migration contributed by a module, applied once at startup.
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// Trait implemented by every bookshelf module.
///
/// A module bundles a resource's routes, its schema migrations, and its
/// lifecycle hooks. Routes are mounted under `/{module_name}`.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module; doubles as its mount prefix.
    fn name(&self) -> &'static str;

    /// Called during application startup, after migrations have run.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// The Axum router for this module's routes.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI specification fragment for this module, merged into the
    /// service-wide document.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations contributed by this module, executed in order.
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Start background work for this module.
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Stop the module and release its resources.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
