use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::store::{
    CreateOptions, ListOptions, OrderBy, OrderDirection, RecordStore, Requester, StoreError,
    UnauthenticatedAccess, UpdateOptions,
};
use crate::model::Record;

/// In-memory `RecordStore`.
///
/// The reference implementation of the ownership filter, used by the
/// integration tests in place of Postgres. Behavior matches `PgRecordStore`
/// operation for operation, including soft deletes and the uniform
/// not-found outcome for ownership mismatches.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<HashMap<Uuid, Record>>,
    unauthenticated: UnauthenticatedAccess,
}

impl MemoryRecordStore {
    pub fn new(unauthenticated: UnauthenticatedAccess) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            unauthenticated,
        }
    }
}

fn visible_to(record: &Record, owner: Option<Uuid>) -> bool {
    record.deleted_at.is_none() && owner.map_or(true, |owner| record.owner_id == owner)
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, options: CreateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        options.validate()?;

        // The verified requester always wins over any owner in the options.
        let owner_id = match self.unauthenticated.owner_scope(requester)? {
            Some(owner) => owner,
            None => options.owner_id.ok_or(StoreError::InvalidOwner)?,
        };

        let now = Utc::now();
        let record = Record {
            id: Uuid::new_v4(),
            title: options.title,
            owner_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.records.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list(&self, options: ListOptions, requester: Option<&Requester>) -> Result<Vec<Record>, StoreError> {
        options.validate()?;
        let owner = self.unauthenticated.owner_scope(requester)?;

        let records = self.records.read().await;
        let mut matches: Vec<Record> = records
            .values()
            .filter(|record| visible_to(record, owner))
            .filter(|record| options.title.as_ref().map_or(true, |title| &record.title == title))
            .cloned()
            .collect();

        matches.sort_by(|a, b| {
            let ordering = match options.order_by {
                OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
                OrderBy::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                OrderBy::Title => a.title.cmp(&b.title),
            };
            match options.order_direction {
                OrderDirection::Asc => ordering,
                OrderDirection::Desc => ordering.reverse(),
            }
        });

        let mut page: Vec<Record> = matches.into_iter().skip(options.skip as usize).collect();
        if options.limit > 0 {
            page.truncate(options.limit as usize);
        }
        Ok(page)
    }

    async fn get(&self, id: Uuid, requester: Option<&Requester>) -> Result<Record, StoreError> {
        let owner = self.unauthenticated.owner_scope(requester)?;

        let records = self.records.read().await;
        match records.get(&id) {
            Some(record) if visible_to(record, owner) => Ok(record.clone()),
            _ => Err(StoreError::NotFound),
        }
    }

    async fn update(&self, id: Uuid, options: UpdateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        options.validate()?;
        let owner = self.unauthenticated.owner_scope(requester)?;

        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound)?;
        if !visible_to(record, owner) {
            return Err(StoreError::NotFound);
        }

        record.title = options.title;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid, requester: Option<&Requester>) -> Result<(), StoreError> {
        let owner = self.unauthenticated.owner_scope(requester)?;

        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound)?;
        if !visible_to(record, owner) {
            return Err(StoreError::NotFound);
        }

        record.deleted_at = Some(Utc::now());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
