use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::context::Identity;
use crate::model::Record;

/// The user on whose behalf a storage operation runs.
///
/// Passed explicitly through every service and storage call; never read
/// from ambient state below the handler layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub id: Uuid,
}

impl From<Identity> for Requester {
    fn from(identity: Identity) -> Self {
        Self { id: identity.owner_id() }
    }
}

/// Storage behavior when no requester is available.
///
/// `Reject` refuses the operation; `Unfiltered` runs it without an owner
/// constraint, for trusted internal callers. Whichever mode a store is
/// constructed with applies uniformly to all five operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnauthenticatedAccess {
    #[default]
    Reject,
    Unfiltered,
}

impl UnauthenticatedAccess {
    /// Resolve the owner constraint for one operation: `Some(owner)` scopes
    /// the query, `None` leaves it unfiltered.
    pub(crate) fn owner_scope(&self, requester: Option<&Requester>) -> Result<Option<Uuid>, StoreError> {
        match (requester, self) {
            (Some(requester), _) => Ok(Some(requester.id)),
            (None, UnauthenticatedAccess::Unfiltered) => Ok(None),
            (None, UnauthenticatedAccess::Reject) => Err(StoreError::Unauthenticated),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Covers both "no such record" and "record belongs to someone else";
    /// the two are deliberately indistinguishable.
    #[error("record not found")]
    NotFound,
    #[error("invalid title")]
    InvalidTitle,
    #[error("invalid owner")]
    InvalidOwner,
    #[error("invalid pagination or ordering filters")]
    InvalidFilters,
    #[error("unauthenticated access is not permitted")]
    Unauthenticated,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl OrderBy {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            _ => Err(StoreError::InvalidFilters),
        }
    }

    pub fn as_column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    #[default]
    Desc,
}

impl OrderDirection {
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(StoreError::InvalidFilters),
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Options for creating a record.
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub title: String,
    /// Owner to stamp when no requester is available. Ignored (overwritten)
    /// whenever a requester is present: the verified identity always wins
    /// over client-supplied data.
    pub owner_id: Option<Uuid>,
}

impl CreateOptions {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.is_empty() {
            return Err(StoreError::InvalidTitle);
        }
        Ok(())
    }
}

/// Options for listing records. The ownership constraint is applied before
/// any of these.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Exact title filter.
    pub title: Option<String>,
    pub skip: i64,
    /// 0 means no limit; capped at 100 otherwise.
    pub limit: i64,
    pub order_by: OrderBy,
    pub order_direction: OrderDirection,
}

impl ListOptions {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.skip < 0 || self.limit < 0 || self.limit > 100 {
            return Err(StoreError::InvalidFilters);
        }
        Ok(())
    }
}

/// Options for updating a record.
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub title: String,
}

impl UpdateOptions {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.is_empty() {
            return Err(StoreError::InvalidTitle);
        }
        Ok(())
    }
}

/// The storage layer.
///
/// Every operation takes the requester explicitly and constrains its query
/// to that requester's records; see `UnauthenticatedAccess` for the
/// behavior when none is given.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create(&self, options: CreateOptions, requester: Option<&Requester>) -> Result<Record, StoreError>;

    async fn list(&self, options: ListOptions, requester: Option<&Requester>) -> Result<Vec<Record>, StoreError>;

    async fn get(&self, id: Uuid, requester: Option<&Requester>) -> Result<Record, StoreError>;

    async fn update(&self, id: Uuid, options: UpdateOptions, requester: Option<&Requester>) -> Result<Record, StoreError>;

    async fn delete(&self, id: Uuid, requester: Option<&Requester>) -> Result<(), StoreError>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_by_parses_known_columns_only() {
        assert_eq!(OrderBy::parse("created_at").unwrap(), OrderBy::CreatedAt);
        assert_eq!(OrderBy::parse("updated_at").unwrap(), OrderBy::UpdatedAt);
        assert_eq!(OrderBy::parse("title").unwrap(), OrderBy::Title);
        assert!(OrderBy::parse("owner_id").is_err());
        assert!(OrderBy::parse("").is_err());
    }

    #[test]
    fn order_direction_parses_asc_and_desc_only() {
        assert_eq!(OrderDirection::parse("asc").unwrap(), OrderDirection::Asc);
        assert_eq!(OrderDirection::parse("desc").unwrap(), OrderDirection::Desc);
        assert!(OrderDirection::parse("ASC").is_err());
        assert!(OrderDirection::parse("sideways").is_err());
    }

    #[test]
    fn list_options_reject_out_of_range_pagination() {
        assert!(ListOptions { skip: -1, ..Default::default() }.validate().is_err());
        assert!(ListOptions { limit: -1, ..Default::default() }.validate().is_err());
        assert!(ListOptions { limit: 101, ..Default::default() }.validate().is_err());
        assert!(ListOptions { skip: 0, limit: 100, ..Default::default() }.validate().is_ok());
    }

    #[test]
    fn owner_scope_modes() {
        let requester = Requester { id: Uuid::new_v4() };

        let scope = UnauthenticatedAccess::Reject.owner_scope(Some(&requester)).unwrap();
        assert_eq!(scope, Some(requester.id));

        assert!(matches!(
            UnauthenticatedAccess::Reject.owner_scope(None),
            Err(StoreError::Unauthenticated)
        ));

        assert_eq!(UnauthenticatedAccess::Unfiltered.owner_scope(None).unwrap(), None);
    }
}
