use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::{oid::ObjectId, Bson, Document};
use std::sync::Arc;

use super::store::{Collection, DocumentStore};
use crate::error::Result;

/// Process-local document store. Documents keep insertion order within a
/// collection. Used for tests and for running without a cluster.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<DashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .get(&collection)
            .map(|docs| docs.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

/// Resolves a dotted path such as `job_info.user_email`.
fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(path, expected)| lookup(doc, path) == Some(expected))
}

fn has_id(doc: &Document, id: &ObjectId) -> bool {
    doc.get_object_id("_id").map(|doc_id| doc_id == *id).unwrap_or(false)
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>> {
        let found = self
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(found)
    }

    async fn find_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>> {
        let found = self
            .collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| has_id(doc, &id)).cloned());
        Ok(found)
    }

    async fn insert_one(&self, collection: Collection, mut doc: Document) -> Result<ObjectId> {
        let id = ObjectId::new();
        doc.insert("_id", id);
        self.collections.entry(collection).or_default().push(doc);
        log::debug!("Inserted {} into {}", id, collection);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: ObjectId,
        patch: Document,
    ) -> Result<Option<Document>> {
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(None);
        };

        let updated = docs.iter_mut().find(|doc| has_id(doc, &id)).map(|doc| {
            for (key, value) in patch {
                doc.insert(key, value);
            }
            doc.clone()
        });
        Ok(updated)
    }

    async fn delete_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>> {
        let Some(mut docs) = self.collections.get_mut(&collection) else {
            return Ok(None);
        };

        let removed = docs
            .iter()
            .position(|doc| has_id(doc, &id))
            .map(|index| docs.remove(index));
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
