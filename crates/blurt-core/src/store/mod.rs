//! Hosted document store access.
//!
//! [`DocumentStore`] is the narrow seam over the backend's keyed-record
//! database; [`RestDocumentStore`] is the production implementation and
//! [`MemoryDocumentStore`] stands in for it in tests and offline runs.
//! The typed repositories on top translate between models and records.

mod memory;
mod posts;
mod profiles;
mod rest;

pub use memory::MemoryDocumentStore;
pub use posts::PostRepository;
pub use profiles::ProfileRepository;
pub use rest::RestDocumentStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid store configuration: {0}")]
    InvalidConfiguration(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse record: {0}")]
    Parse(#[from] serde_json::Error),

    /// Error reported by the store API, formatted as "message (status)"
    #[error("Store API error: {0}")]
    Api(String),
}

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Keyed-record database addressed by collection name.
///
/// Records are JSON objects. All calls carry the signed-in user's access
/// token; the backend enforces per-user access with it.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a record and returns the id the store assigned to it.
    async fn create(&self, collection: &str, record: Value, token: &str) -> StoreResult<String>;

    /// Overwrites the record at `id` in full, creating it when missing.
    async fn set(&self, collection: &str, id: &str, record: Value, token: &str)
        -> StoreResult<()>;

    /// Fetches the record at `id`, or `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str, token: &str) -> StoreResult<Option<Value>>;

    /// Deletes the record at `id`; deleting a missing record is not an
    /// error.
    async fn delete(&self, collection: &str, id: &str, token: &str) -> StoreResult<()>;

    /// Lists records whose `field` equals `value`, in store order.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        token: &str,
    ) -> StoreResult<Vec<Value>>;
}
