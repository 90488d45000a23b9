//! In-memory document store for tests and offline development.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoreError, StoreResult};

type Collection = BTreeMap<String, Value>;

/// [`DocumentStore`] backed by process memory.
///
/// Mirrors the REST store's observable behavior: ids are assigned on
/// insert, `set` overwrites in full, and deleting a missing record
/// succeeds. `op_count` counts every store call, which lets tests assert
/// that a code path never reached the store at all.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
    ops: AtomicUsize,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far.
    #[must_use]
    pub fn op_count(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    fn record_op(&self) {
        self.ops.fetch_add(1, Ordering::SeqCst);
    }
}

fn require_object(record: &Value) -> StoreResult<()> {
    if record.is_object() {
        Ok(())
    } else {
        Err(StoreError::Api("record must be a JSON object".to_string()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn create(&self, collection: &str, record: Value, _token: &str) -> StoreResult<String> {
        self.record_op();
        require_object(&record)?;
        let id = Uuid::now_v7().to_string();
        let mut record = record;
        record["id"] = Value::String(id.clone());
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), record);
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        record: Value,
        _token: &str,
    ) -> StoreResult<()> {
        self.record_op();
        require_object(&record)?;
        let mut record = record;
        record["id"] = Value::String(id.to_string());
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str, _token: &str) -> StoreResult<Option<Value>> {
        self.record_op();
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn delete(&self, collection: &str, id: &str, _token: &str) -> StoreResult<()> {
        self.record_op();
        if let Some(records) = self.collections.write().await.get_mut(collection) {
            records.remove(id);
        }
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        _token: &str,
    ) -> StoreResult<Vec<Value>> {
        self.record_op();
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|records| {
                records
                    .values()
                    .filter(|record| {
                        record.get(field).and_then(Value::as_str) == Some(value)
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
