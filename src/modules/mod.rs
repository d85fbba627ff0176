pub mod books;

use bookshelf_db::PgPool;
use bookshelf_kernel::ModuleRegistry;
use std::sync::Arc;

/// Register all application modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry, pool: PgPool) {
    let store = Arc::new(books::store::PgBookStore::new(pool));
    registry.register(books::create_module(store));
}
