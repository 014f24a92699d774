//! Conference records submitted through guarded endpoints.
//!
//! Events, committees, delegates and the rest are plain CRUD owned elsewhere;
//! this store only keeps what the API accepted so the guarded write path has
//! something real to mutate.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use munadmin_core::{PrincipalId, RecordId};

use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub id: RecordId,
    pub resource: String,
    pub data: serde_json::Value,
    pub created_by: PrincipalId,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn append(&self, record: Record) -> Result<(), StoreError>;

    /// Records of one resource type, oldest first.
    async fn list(&self, resource: &str) -> Result<Vec<Record>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<HashMap<String, Vec<Record>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn append(&self, record: Record) -> Result<(), StoreError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("record store lock poisoned".to_string()))?;
        map.entry(record.resource.clone()).or_default().push(record);
        Ok(())
    }

    async fn list(&self, resource: &str) -> Result<Vec<Record>, StoreError> {
        let map = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("record store lock poisoned".to_string()))?;
        Ok(map.get(resource).cloned().unwrap_or_default())
    }
}
