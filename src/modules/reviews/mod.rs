pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    routing::put,
    Router,
};
use libris_http::{ApiError, Envelope, Identity, Json};
use libris_kernel::{InitCtx, Module};
use serde_json::json;
use uuid::Uuid;

use crate::core::CoreService;
use models::{Review, UpdateReview};

/// Reviews module: author-only mutation of existing reviews.
/// Review creation lives under the books module (`/books/{id}/reviews`).
pub struct ReviewsModule {
    core: Arc<CoreService>,
}

impl ReviewsModule {
    pub fn new(core: Arc<CoreService>) -> Self {
        Self { core }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/{id}", put(update_review).delete(delete_review))
            .with_state(self.core.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/{id}": {
                    "put": {
                        "summary": "Update a review (author only)",
                        "tags": ["Reviews"],
                        "responses": {
                            "200": {"description": "Updated review"},
                            "400": {"description": "Validation failure"},
                            "401": {"description": "No identity"},
                            "403": {"description": "Caller is not the author"},
                            "404": {"description": "Unknown review"}
                        }
                    },
                    "delete": {
                        "summary": "Delete a review (author only)",
                        "tags": ["Reviews"],
                        "responses": {
                            "200": {"description": "Deleted"},
                            "401": {"description": "No identity"},
                            "403": {"description": "Caller is not the author"},
                            "404": {"description": "Unknown review"}
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "bookId": {"type": "string", "format": "uuid"},
                            "userId": {"type": "string", "format": "uuid"},
                            "rating": {"type": "number", "minimum": 1, "maximum": 5},
                            "text": {"type": "string"},
                            "createdAt": {"type": "string", "format": "date-time"}
                        },
                        "required": ["id", "bookId", "userId", "rating", "text", "createdAt"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module stopped");
        Ok(())
    }
}

async fn update_review(
    State(core): State<Arc<CoreService>>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReview>,
) -> Result<Json<Envelope<Review>>, ApiError> {
    let review = core.update_review(identity.user_id(), id, payload).await?;
    Ok(Json(Envelope::data(review)))
}

async fn delete_review(
    State(core): State<Arc<CoreService>>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    core.delete_review(identity.user_id(), id).await?;
    Ok(Json(Envelope::data(json!({}))))
}

/// Create a new instance of the reviews module.
pub fn create_module(core: Arc<CoreService>) -> Arc<dyn Module> {
    Arc::new(ReviewsModule::new(core))
}
