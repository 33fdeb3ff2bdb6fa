use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::context::Identity;
use crate::database::store::{CreateOptions, ListOptions, OrderBy, OrderDirection, Requester, UpdateOptions};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::model::Record;
use crate::state::AppState;

/// Resolve the verified identity into the explicit requester parameter.
///
/// The identity is read from the request extensions exactly once, here; the
/// service and storage layers only ever see the `Requester` value. On a
/// protected route the authentication stage has always populated it, so
/// `None` means the store's unauthenticated-access mode decides.
fn requester(identity: Option<Extension<Identity>>) -> Option<Requester> {
    identity.map(|Extension(identity)| Requester::from(identity))
}

fn parse_record_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| ApiError::bad_request("invalid record id"))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub title: Option<String>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

impl ListQuery {
    fn into_options(self) -> Result<ListOptions, ApiError> {
        let order_by = match self.order_by.as_deref() {
            Some(value) => OrderBy::parse(value)?,
            None => OrderBy::default(),
        };
        let order_direction = match self.order_direction.as_deref() {
            Some(value) => OrderDirection::parse(value)?,
            None => OrderDirection::default(),
        };

        Ok(ListOptions {
            title: self.title,
            skip: self.skip.unwrap_or(0),
            limit: self.limit.unwrap_or(0),
            order_by,
            order_direction,
        })
    }
}

/// POST /v1 - create a new record owned by the requester
pub async fn create(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<ApiResponse<Record>, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("invalid request body"))?;
    let requester = requester(identity);

    let options = CreateOptions {
        title: payload.title,
        owner_id: None,
    };
    let record = state.service.create(options, requester.as_ref()).await?;

    Ok(ApiResponse::created(record).with_message("The record was created successfully."))
}

/// GET /v1 - list the requester's records
pub async fn list(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Record>>, ApiError> {
    let Query(query) = query.map_err(|_| ApiError::bad_request("invalid query parameters"))?;
    let requester = requester(identity);

    let records = state.service.list(query.into_options()?, requester.as_ref()).await?;

    Ok(ApiResponse::success(records))
}

/// GET /v1/{id} - fetch one record, ownership-filtered
pub async fn get(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Record>, ApiError> {
    let id = parse_record_id(&id)?;
    let requester = requester(identity);

    let record = state.service.get(id, requester.as_ref()).await?;

    Ok(ApiResponse::success(record))
}

/// PATCH /v1/{id} - update one record, ownership-filtered
pub async fn update(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<ApiResponse<Record>, ApiError> {
    let id = parse_record_id(&id)?;
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("invalid request body"))?;
    let requester = requester(identity);

    let options = UpdateOptions { title: payload.title };
    let record = state.service.update(id, options, requester.as_ref()).await?;

    Ok(ApiResponse::success(record).with_message("The record was updated successfully."))
}

/// DELETE /v1/{id} - soft-delete one record, ownership-filtered
pub async fn remove(
    State(state): State<AppState>,
    identity: Option<Extension<Identity>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id = parse_record_id(&id)?;
    let requester = requester(identity);

    state.service.delete(id, requester.as_ref()).await?;

    Ok(ApiResponse::<()>::no_content())
}
