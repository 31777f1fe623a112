use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use std::fmt;
use std::sync::Arc;

use super::repository::{BidRepository, JobPostRepository};
use crate::error::{AppError, Result};

/// The two collections the marketplace keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    JobPosts,
    Bids,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::JobPosts => "JobPost",
            Collection::Bids => "BidJob",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Untyped gateway over the document database. Filters are equality
/// matches; `update_one` applies `patch` as a `$set`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(&self, collection: Collection, filter: Document) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>>;

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<ObjectId>;

    /// Returns the document as it is after the update.
    async fn update_one(
        &self,
        collection: Collection,
        id: ObjectId,
        patch: Document,
    ) -> Result<Option<Document>>;

    async fn delete_one(&self, collection: Collection, id: ObjectId) -> Result<Option<Document>>;

    async fn ping(&self) -> Result<()>;
}

/// Shared store handle injected into handlers.
#[derive(Clone)]
pub struct Store {
    inner: Arc<dyn DocumentStore>,
}

impl Store {
    pub fn new<S: DocumentStore + 'static>(store: S) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    pub fn job_posts(&self) -> JobPostRepository {
        JobPostRepository::new(self.inner.clone())
    }

    pub fn bids(&self) -> BidRepository {
        BidRepository::new(self.inner.clone())
    }

    pub async fn ping(&self) -> Result<()> {
        self.inner.ping().await
    }
}

/// Parses a client-supplied document id. Missing and malformed ids are
/// rejected before any store call.
pub fn parse_object_id(raw: Option<&str>) -> Result<ObjectId> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::BadRequest("missing id".to_string()))?;

    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidId(raw.to_string()))
}
