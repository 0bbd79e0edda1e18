pub mod models;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use libris_http::{ApiError, Envelope, Identity, Json};
use libris_kernel::{InitCtx, Module};
use serde_json::json;
use uuid::Uuid;

use crate::core::CoreService;
use crate::modules::reviews::models::{CreateReview, Review};
use models::{Book, BookDetail, CreateBook};

/// Books module: CRUD over books plus nested review creation.
pub struct BooksModule {
    core: Arc<CoreService>,
}

impl BooksModule {
    pub fn new(core: Arc<CoreService>) -> Self {
        Self { core }
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
        Router::new()
            .route("/", get(list_books).post(create_book))
            .route("/health", get(health_check))
            .route("/{id}", get(get_book).delete(delete_book))
            .route("/{id}/reviews", axum::routing::post(add_review))
            .with_state(self.core.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books with filters and pagination",
                        "tags": ["Books"],
                        "parameters": [
                            {"name": "page", "in": "query", "schema": {"type": "integer", "default": 1}},
                            {"name": "limit", "in": "query", "schema": {"type": "integer", "default": 10}}
                        ],
                        "responses": {
                            "200": {"description": "Page of books"},
                            "400": {"description": "Unsupported filter operator"}
                        }
                    },
                    "post": {
                        "summary": "Create a book owned by the caller",
                        "tags": ["Books"],
                        "responses": {
                            "201": {"description": "Created book"},
                            "400": {"description": "Validation failure"},
                            "401": {"description": "No identity"}
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a book with reviews and rating aggregate",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Book detail"},
                            "404": {"description": "Unknown book"}
                        }
                    },
                    "delete": {
                        "summary": "Delete a book and cascade its reviews",
                        "tags": ["Books"],
                        "responses": {
                            "200": {"description": "Deleted"},
                            "401": {"description": "No identity"},
                            "403": {"description": "Caller is not the owner"},
                            "404": {"description": "Unknown book"}
                        }
                    }
                },
                "/{id}/reviews": {
                    "post": {
                        "summary": "Add a review to a book",
                        "tags": ["Reviews"],
                        "responses": {
                            "201": {"description": "Created review"},
                            "401": {"description": "No identity"},
                            "404": {"description": "Unknown book"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "title": {"type": "string", "maxLength": 100},
                            "author": {"type": "string"},
                            "description": {"type": "string"},
                            "genre": {
                                "type": "string",
                                "enum": [
                                    "Fiction", "Non-Fiction", "Science Fiction", "Fantasy",
                                    "Mystery", "Thriller", "Romance", "Biography", "History",
                                    "Self-Help", "Other"
                                ]
                            },
                            "publicationYear": {"type": "integer"},
                            "ownerUserId": {"type": "string", "format": "uuid"},
                            "createdAt": {"type": "string", "format": "date-time"}
                        },
                        "required": [
                            "id", "title", "author", "description", "genre",
                            "publicationYear", "ownerUserId", "createdAt"
                        ]
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

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(
    State(core): State<Arc<CoreService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Vec<Book>>>, ApiError> {
    let page = core.list_books(&params).await?;
    let count = page.items.len();
    Ok(Json(Envelope::page(page.items, count, page.pagination)))
}

async fn create_book(
    State(core): State<Arc<CoreService>>,
    identity: Identity,
    Json(payload): Json<CreateBook>,
) -> Result<(StatusCode, Json<Envelope<Book>>), ApiError> {
    let book = core.create_book(identity.user_id(), payload).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(book))))
}

async fn get_book(
    State(core): State<Arc<CoreService>>,
    Path(id): Path<Uuid>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<BookDetail>>, ApiError> {
    let detail = core.get_book(id, &params).await?;
    Ok(Json(Envelope::data(detail)))
}

async fn delete_book(
    State(core): State<Arc<CoreService>>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    core.delete_book(identity.user_id(), id).await?;
    Ok(Json(Envelope::data(json!({}))))
}

async fn add_review(
    State(core): State<Arc<CoreService>>,
    identity: Identity,
    Path(book_id): Path<Uuid>,
    Json(payload): Json<CreateReview>,
) -> Result<(StatusCode, Json<Envelope<Review>>), ApiError> {
    let review = core.add_review(identity.user_id(), book_id, payload).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(review))))
}

/// Create a new instance of the books module.
pub fn create_module(core: Arc<CoreService>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(core))
}
