//! In-process document store backed by per-collection `BTreeMap`s.
//!
//! Documents are keyed by their `id` field; iteration is id order, so
//! time-ordered (v7) ids give a stable, creation-ordered scan.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::filter::{Filter, Window};
use crate::{Collection, DocumentStore};

/// In-memory [`DocumentStore`]. Collections are created on first access.
#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Arc<MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> Arc<dyn Collection> {
        let mut collections = self.collections.lock().expect("collection map poisoned");
        collections
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryCollection::default()))
            .clone()
    }
}

#[derive(Default)]
struct MemoryCollection {
    docs: RwLock<BTreeMap<String, Value>>,
}

fn doc_id(doc: &Value) -> Result<String, StoreError> {
    doc.get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| StoreError::MalformedDocument("missing string 'id' field".to_string()))
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn insert(&self, doc: Value) -> Result<Value, StoreError> {
        if !doc.is_object() {
            return Err(StoreError::MalformedDocument(
                "document must be a JSON object".to_string(),
            ));
        }
        let id = doc_id(&doc)?;

        let mut docs = self.docs.write().await;
        if docs.contains_key(&id) {
            return Err(StoreError::DuplicateId(id));
        }
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    async fn find(&self, filter: &Filter, window: Option<Window>) -> Result<Vec<Value>, StoreError> {
        let docs = self.docs.read().await;
        let matches = docs.values().filter(|doc| filter.matches(doc)).cloned();

        let results = match window {
            Some(window) => matches
                .skip(window.offset as usize)
                .take(window.limit as usize)
                .collect(),
            None => matches.collect(),
        };
        Ok(results)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: Value) -> Result<Option<Value>, StoreError> {
        let patch = match patch {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::MalformedDocument(
                    "patch must be a JSON object".to_string(),
                ))
            }
        };

        let mut docs = self.docs.write().await;
        let Some(doc) = docs.get_mut(id) else {
            return Ok(None);
        };

        let target = doc
            .as_object_mut()
            .ok_or_else(|| StoreError::MalformedDocument("stored document is not an object".to_string()))?;
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            target.insert(key, value);
        }
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut docs = self.docs.write().await;
        Ok(docs.remove(id).is_some())
    }

    async fn delete_many(&self, filter: &Filter) -> Result<u64, StoreError> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|_, doc| !filter.matches(doc));
        let removed = (before - docs.len()) as u64;
        if removed > 0 {
            tracing::debug!(removed, "bulk delete");
        }
        Ok(removed)
    }

    async fn count(&self, filter: &Filter) -> Result<u64, StoreError> {
        let docs = self.docs.read().await;
        Ok(docs.values().filter(|doc| filter.matches(doc)).count() as u64)
    }
}
