use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use libris_http::{ApiError, Envelope};
use libris_kernel::{InitCtx, Module};
use serde_json::json;

use crate::core::CoreService;
use crate::modules::books::models::Book;

/// Search module: free-text lookup over book titles and authors.
pub struct SearchModule {
    core: Arc<CoreService>,
}

impl SearchModule {
    pub fn new(core: Arc<CoreService>) -> Self {
        Self { core }
    }
}

#[async_trait]
impl Module for SearchModule {
    fn name(&self) -> &'static str {
        "search"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "search module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(search_books))
            .with_state(self.core.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Search books by title or author substring",
                        "tags": ["Search"],
                        "parameters": [
                            {"name": "q", "in": "query", "required": true, "schema": {"type": "string"}}
                        ],
                        "responses": {
                            "200": {"description": "Matching books"},
                            "400": {"description": "Missing search query"}
                        }
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "search module stopped");
        Ok(())
    }
}

async fn search_books(
    State(core): State<Arc<CoreService>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Envelope<Vec<Book>>>, ApiError> {
    let books = core.search_books(params.get("q").map(String::as_str)).await?;
    let count = books.len();
    Ok(Json(Envelope::list(books, count)))
}

/// Create a new instance of the search module.
pub fn create_module(core: Arc<CoreService>) -> Arc<dyn Module> {
    Arc::new(SearchModule::new(core))
}
