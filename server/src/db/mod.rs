pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

pub use memory::MemoryStore;
pub use repository::{BidRepository, JobPostRepository, MongoDbContext};
pub use store::{parse_object_id, Collection, DocumentStore, Store};
