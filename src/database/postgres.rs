use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::store::{
    CreateOptions, ListOptions, RecordStore, Requester, StoreError, UnauthenticatedAccess,
    UpdateOptions,
};
use crate::model::Record;

const COLUMNS: &str = "id, title, owner_id, created_at, updated_at, deleted_at";

/// Postgres-backed `RecordStore`.
///
/// The ownership filter is part of every statement: reads and mutations are
/// constrained to `id = $n AND owner_id = $n` so a foreign record and a
/// missing record produce the same zero-row result.
pub struct PgRecordStore {
    pool: PgPool,
    unauthenticated: UnauthenticatedAccess,
}

impl PgRecordStore {
    pub fn new(pool: PgPool, unauthenticated: UnauthenticatedAccess) -> Self {
        Self { pool, unauthenticated }
    }

    /// Create the records table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL CHECK (length(title) > 0),
                owner_id UUID NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                deleted_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS records_owner_id_idx ON records (owner_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn create(&self, options: CreateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        options.validate()?;

        // The verified requester always wins over any owner in the options.
        let owner_id = match self.unauthenticated.owner_scope(requester)? {
            Some(owner) => owner,
            None => options.owner_id.ok_or(StoreError::InvalidOwner)?,
        };

        let sql = format!(
            "INSERT INTO records (id, title, owner_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) RETURNING {COLUMNS}"
        );
        let record = sqlx::query_as::<_, Record>(&sql)
            .bind(Uuid::new_v4())
            .bind(&options.title)
            .bind(owner_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn list(&self, options: ListOptions, requester: Option<&Requester>) -> Result<Vec<Record>, StoreError> {
        options.validate()?;
        let owner = self.unauthenticated.owner_scope(requester)?;

        // Ownership scoping comes first; pagination and ordering are applied
        // to the already-scoped row set.
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut bind_index = 0;
        if owner.is_some() {
            bind_index += 1;
            conditions.push(format!("owner_id = ${bind_index}"));
        }
        if options.title.is_some() {
            bind_index += 1;
            conditions.push(format!("title = ${bind_index}"));
        }

        let mut sql = format!(
            "SELECT {COLUMNS} FROM records WHERE {}",
            conditions.join(" AND ")
        );
        sql.push_str(&format!(
            " ORDER BY {} {}",
            options.order_by.as_column(),
            options.order_direction.as_sql()
        ));
        if options.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", options.limit));
        }
        if options.skip > 0 {
            sql.push_str(&format!(" OFFSET {}", options.skip));
        }

        let mut query = sqlx::query_as::<_, Record>(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        if let Some(title) = &options.title {
            query = query.bind(title);
        }

        let records = query.fetch_all(&self.pool).await?;
        Ok(records)
    }

    async fn get(&self, id: Uuid, requester: Option<&Requester>) -> Result<Record, StoreError> {
        let owner = self.unauthenticated.owner_scope(requester)?;

        let mut sql = format!("SELECT {COLUMNS} FROM records WHERE id = $1 AND deleted_at IS NULL");
        if owner.is_some() {
            sql.push_str(" AND owner_id = $2");
        }

        let mut query = sqlx::query_as::<_, Record>(&sql).bind(id);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        query.fetch_optional(&self.pool).await?.ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: Uuid, options: UpdateOptions, requester: Option<&Requester>) -> Result<Record, StoreError> {
        options.validate()?;
        let owner = self.unauthenticated.owner_scope(requester)?;

        let mut sql = String::from(
            "UPDATE records SET title = $1, updated_at = $2 WHERE id = $3 AND deleted_at IS NULL",
        );
        if owner.is_some() {
            sql.push_str(" AND owner_id = $4");
        }
        sql.push_str(&format!(" RETURNING {COLUMNS}"));

        let mut query = sqlx::query_as::<_, Record>(&sql)
            .bind(&options.title)
            .bind(Utc::now())
            .bind(id);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        query.fetch_optional(&self.pool).await?.ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: Uuid, requester: Option<&Requester>) -> Result<(), StoreError> {
        let owner = self.unauthenticated.owner_scope(requester)?;

        let mut sql = String::from(
            "UPDATE records SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL",
        );
        if owner.is_some() {
            sql.push_str(" AND owner_id = $3");
        }

        let mut query = sqlx::query(&sql).bind(Utc::now()).bind(id);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }

        let result = query.execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
