pub mod models;
pub mod repository;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use library_db::DocumentStore;
use library_kernel::{InitCtx, Module};
use serde_json::json;

use crate::modules::books::repository::BookRepository;
use repository::AuthorRepository;
use service::AuthorService;

/// Authors module: CRUD over `authors` plus the books-by-author listing
pub struct AuthorsModule {
    service: AuthorService,
}

impl AuthorsModule {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        let service = AuthorService::new(
            AuthorRepository::new(store.clone()),
            BookRepository::new(store),
        );
        Self { service }
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/authors": {
                    "get": {
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "All stored authors",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Author" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create an author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorInput" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Created author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "400": { "$ref": "#/components/responses/BadRequest" },
                            "422": { "$ref": "#/components/responses/Unprocessable" }
                        }
                    }
                },
                "/authors/{id}": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                    ],
                    "get": {
                        "summary": "Get an author",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "The author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "404": { "$ref": "#/components/responses/NotFound" }
                        }
                    },
                    "patch": {
                        "summary": "Update an author",
                        "description": "Fields present in the body replace the stored ones; the result is validated as a whole.",
                        "tags": ["Authors"],
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/AuthorInput" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Updated author",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Author" }
                                    }
                                }
                            },
                            "400": { "$ref": "#/components/responses/BadRequest" },
                            "404": { "$ref": "#/components/responses/NotFound" },
                            "422": { "$ref": "#/components/responses/Unprocessable" }
                        }
                    },
                    "delete": {
                        "summary": "Delete an author",
                        "description": "The author's books are kept.",
                        "tags": ["Authors"],
                        "responses": {
                            "204": { "description": "Deleted" },
                            "404": { "$ref": "#/components/responses/NotFound" }
                        }
                    }
                },
                "/authors/{id}/books": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }
                    ],
                    "get": {
                        "summary": "List the books of an author",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "Books whose authorId is this author",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            },
                            "404": { "$ref": "#/components/responses/NotFound" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "string" },
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" },
                            "birthday": { "type": "string", "format": "date" },
                            "createdAt": { "type": "string", "format": "date-time" },
                            "updatedAt": { "type": "string", "format": "date-time" }
                        },
                        "required": ["id", "firstName", "lastName", "birthday", "createdAt", "updatedAt"]
                    },
                    "AuthorInput": {
                        "type": "object",
                        "properties": {
                            "firstName": { "type": "string" },
                            "lastName": { "type": "string" },
                            "birthday": { "type": "string", "format": "date" }
                        }
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create the authors module over the shared store
pub fn create_module(store: Arc<dyn DocumentStore>) -> Arc<dyn Module> {
    Arc::new(AuthorsModule::new(store))
}
