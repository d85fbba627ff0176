pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validate;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use std::sync::Arc;

use bookshelf_kernel::{InitCtx, Migration, Module};

use self::service::BookService;
use self::store::BookStore;

/// The books module: owns the service and wires routes, migrations, and
/// OpenAPI docs into the kernel.
pub struct BooksModule {
    service: Arc<BookService>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn BookStore>) -> Self {
        Self {
            service: Arc::new(BookService::new(store)),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    isbn       TEXT PRIMARY KEY,
                    amazon_url TEXT NOT NULL,
                    author     TEXT NOT NULL,
                    language   TEXT NOT NULL,
                    pages      INTEGER NOT NULL,
                    publisher  TEXT NOT NULL,
                    title      TEXT NOT NULL,
                    year       INTEGER NOT NULL
                );
                "#,
        }]
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "All stored books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "books": {
                                                    "type": "array",
                                                    "items": { "$ref": "#/components/schemas/Book" }
                                                }
                                            }
                                        }
                                    }
                                }
                            },
                            "500": {
                                "description": "Store failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Book" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "The stored book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure or duplicate isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{isbn}": {
                    "get": {
                        "summary": "Get a book by isbn",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "The matching book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "put": {
                        "summary": "Replace a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/BookInput" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/BookEnvelope" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation failure",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "parameters": [{
                            "name": "isbn",
                            "in": "path",
                            "required": true,
                            "schema": { "type": "string" }
                        }],
                        "responses": {
                            "200": {
                                "description": "Deletion confirmation",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "object",
                                            "properties": {
                                                "message": { "type": "string" }
                                            }
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "No book with that isbn",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "isbn": { "type": "string", "description": "Primary key, immutable" },
                            "amazon_url": { "type": "string", "format": "uri" },
                            "author": { "type": "string" },
                            "language": { "type": "string" },
                            "pages": { "type": "integer", "minimum": 1 },
                            "publisher": { "type": "string" },
                            "title": { "type": "string" },
                            "year": { "type": "integer" }
                        },
                        "required": ["isbn", "amazon_url", "author", "language", "pages", "publisher", "title", "year"]
                    },
                    "BookInput": {
                        "type": "object",
                        "description": "Full replacement payload; isbn comes from the URL path",
                        "properties": {
                            "amazon_url": { "type": "string", "format": "uri" },
                            "author": { "type": "string" },
                            "language": { "type": "string" },
                            "pages": { "type": "integer", "minimum": 1 },
                            "publisher": { "type": "string" },
                            "title": { "type": "string" },
                            "year": { "type": "integer" }
                        },
                        "required": ["amazon_url", "author", "language", "pages", "publisher", "title", "year"]
                    },
                    "BookEnvelope": {
                        "type": "object",
                        "properties": {
                            "book": { "$ref": "#/components/schemas/Book" }
                        },
                        "required": ["book"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a books module instance over the given store.
pub fn create_module(store: Arc<dyn BookStore>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::store::MemoryBookStore;

    #[test]
    fn module_contributes_the_books_migration() {
        let module = BooksModule::new(Arc::new(MemoryBookStore::new()));
        let migrations = module.migrations();
        assert_eq!(migrations.len(), 1);
        assert_eq!(migrations[0].id, "001_create_books");
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
        assert!(migrations[0].up.contains("PRIMARY KEY"));
    }

    #[test]
    fn openapi_fragment_covers_both_paths() {
        let module = BooksModule::new(Arc::new(MemoryBookStore::new()));
        let spec = module.openapi().unwrap();
        assert!(spec["paths"].get("/").is_some());
        assert!(spec["paths"].get("/{isbn}").is_some());
        assert!(spec["components"]["schemas"].get("Book").is_some());
    }
}
