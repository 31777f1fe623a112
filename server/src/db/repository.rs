use async_trait::async_trait;
use futures_util::stream::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Client, Database,
};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

use super::models::{
    Bid, BidFilter, BidInput, BidStatusUpdate, JobPost, JobPostFilter, JobPostInput, JobPostUpdate,
};
use super::store::{Collection, DocumentStore};
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct MongoDbContext {
    client: Client,
    db: Database,
}

impl MongoDbContext {
    pub fn new(client: Client, database_name: &str) -> Self {
        Self {
            db: client.database(database_name),
            client,
        }
    }

    pub async fn connect(uri: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self::new(client, database_name))
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection(collection.name())
    }
}

#[async_trait]
impl DocumentStore for MongoDbContext {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>> {
        let mut cursor = self.collection(collection).find(filter).await?;

        let mut documents = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }

        Ok(documents)
    }

    async fn find_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>> {
        let document = self
            .collection(collection)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(document)
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<ObjectId> {
        let result = self.collection(collection).insert_one(doc).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::Internal(format!(
                "{} insert returned a non-ObjectId id: {}",
                collection, result.inserted_id
            ))
        })
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: ObjectId,
        patch: Document,
    ) -> Result<Option<Document>> {
        let document = self
            .collection(collection)
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": patch })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document)
    }

    async fn delete_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>> {
        let document = self
            .collection(collection)
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(document)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

/// Decodes a listing. Documents that do not fit `T` are logged and skipped.
fn decode_all<T: DeserializeOwned>(collection: Collection, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").cloned();
            match bson::from_document(document) {
                Ok(decoded) => Some(decoded),
                Err(err) => {
                    log::warn!("Skipping malformed {} document {:?}: {}", collection, id, err);
                    None
                }
            }
        })
        .collect()
}

fn decode_one<T: DeserializeOwned>(document: Option<Document>) -> Result<Option<T>> {
    document
        .map(|document| bson::from_document(document).map_err(AppError::from))
        .transpose()
}

/// Encodes a new document. The store always assigns `_id`; a client-supplied
/// one is dropped.
fn insert_document<T: Serialize>(value: &T) -> Result<Document> {
    let mut document = bson::to_document(value)?;
    document.remove("_id");
    Ok(document)
}

#[derive(Clone)]
pub struct JobPostRepository {
    store: Arc<dyn DocumentStore>,
}

impl JobPostRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &JobPostFilter) -> Result<Vec<JobPost>> {
        let documents = self
            .store
            .find(Collection::JobPosts, filter.to_document())
            .await?;
        Ok(decode_all(Collection::JobPosts, documents))
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<JobPost>> {
        decode_one(self.store.find_one(Collection::JobPosts, id).await?)
    }

    pub async fn create(&self, post: &JobPostInput) -> Result<ObjectId> {
        let document = insert_document(post)?;
        self.store.insert_one(Collection::JobPosts, document).await
    }

    pub async fn update(&self, id: ObjectId, update: &JobPostUpdate) -> Result<Option<JobPost>> {
        let patch = update.to_patch()?;
        // An empty $set is rejected by the server.
        if patch.is_empty() {
            return self.find_by_id(id).await;
        }
        decode_one(self.store.update_one(Collection::JobPosts, id, patch).await?)
    }

    pub async fn delete(&self, id: ObjectId) -> Result<Option<JobPost>> {
        decode_one(self.store.delete_one(Collection::JobPosts, id).await?)
    }
}

#[derive(Clone)]
pub struct BidRepository {
    store: Arc<dyn DocumentStore>,
}

impl BidRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, filter: &BidFilter) -> Result<Vec<Bid>> {
        let documents = self.store.find(Collection::Bids, filter.to_document()).await?;
        Ok(decode_all(Collection::Bids, documents))
    }

    pub async fn create(&self, bid: &BidInput) -> Result<ObjectId> {
        let document = insert_document(bid)?;
        self.store.insert_one(Collection::Bids, document).await
    }

    pub async fn update_status(
        &self,
        id: ObjectId,
        update: &BidStatusUpdate,
    ) -> Result<Option<Bid>> {
        decode_one(
            self.store
                .update_one(Collection::Bids, id, update.to_patch())
                .await?,
        )
    }
}
