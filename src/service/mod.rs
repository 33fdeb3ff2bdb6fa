use std::sync::Arc;

use uuid::Uuid;

use crate::database::store::{
    CreateOptions, ListOptions, RecordStore, Requester, StoreError, UpdateOptions,
};
use crate::model::Record;

/// Business layer over the record store.
///
/// Validates inputs and threads the requester, unchanged, into the storage
/// layer. Typed errors propagate up; translation to wire responses happens
/// only at the handler boundary.
#[derive(Clone)]
pub struct RecordService {
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, options: CreateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        tracing::debug!(operation = "create", "creating a new record");
        options.validate()?;
        self.store.create(options, requester).await
    }

    pub async fn list(&self, options: ListOptions, requester: Option<&Requester>) -> Result<Vec<Record>, StoreError> {
        tracing::debug!(operation = "list", "listing records");
        options.validate()?;
        self.store.list(options, requester).await
    }

    pub async fn get(&self, id: Uuid, requester: Option<&Requester>) -> Result<Record, StoreError> {
        tracing::debug!(operation = "get", "retrieving a record");
        if id.is_nil() {
            // A nil id cannot exist; same outcome as any other unknown id
            return Err(StoreError::NotFound);
        }
        self.store.get(id, requester).await
    }

    pub async fn update(&self, id: Uuid, options: UpdateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        tracing::debug!(operation = "update", "updating a record");
        if id.is_nil() {
            return Err(StoreError::NotFound);
        }
        options.validate()?;
        self.store.update(id, options, requester).await
    }

    pub async fn delete(&self, id: Uuid, requester: Option<&Requester>) -> Result<(), StoreError> {
        tracing::debug!(operation = "delete", "deleting a record");
        if id.is_nil() {
            return Err(StoreError::NotFound);
        }
        self.store.delete(id, requester).await
    }

    /// Storage connectivity probe for the health endpoint.
    pub async fn health(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }
}
