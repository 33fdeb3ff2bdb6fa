use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted record.
///
/// `id` is generated at creation and immutable. `owner_id` is stamped from
/// the verified requester at creation and never reassigned; it serializes as
/// `user_id` on the wire. `deleted_at` is the soft-delete marker: rows with
/// it set are invisible to every read and mutation.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Record {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "user_id")]
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}
