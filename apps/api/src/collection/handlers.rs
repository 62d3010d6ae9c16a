use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Serialize;

use crate::collection::{not_found, Collection};
use crate::errors::AppError;
use crate::models::Record;

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub message: String,
    pub deleted_id: i64,
}

/// A non-numeric id can never match a stored record.
fn parse_id<R: Record>(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| not_found::<R>(raw))
}

/// GET /api/{collection}
pub async fn handle_list<R: Record>(
    State(collection): State<Arc<Collection<R>>>,
) -> Result<Json<Vec<R>>, AppError> {
    Ok(Json(collection.list().await?))
}

/// POST /api/{collection}
pub async fn handle_replace_all<R: Record>(
    State(collection): State<Arc<Collection<R>>>,
    payload: Result<Json<Vec<R>>, JsonRejection>,
) -> Result<Json<SavedResponse>, AppError> {
    let Json(records) = payload?;
    let count = collection.replace_all(records).await?;
    Ok(Json(SavedResponse {
        message: format!("{} data saved", R::NAME),
        count,
    }))
}

/// POST /api/{collection}/add
pub async fn handle_add<R: Record>(
    State(collection): State<Arc<Collection<R>>>,
    payload: Result<Json<R::Fields>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let Json(fields) = payload?;
    Ok(Json(collection.add(fields).await?))
}

/// PUT /api/{collection}/:id
pub async fn handle_update<R: Record>(
    State(collection): State<Arc<Collection<R>>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<R::Fields>, JsonRejection>,
) -> Result<Json<R>, AppError> {
    let id = parse_id::<R>(&raw_id)?;
    let Json(patch) = payload?;
    Ok(Json(collection.update(id, patch).await?))
}

/// DELETE /api/{collection}/:id
pub async fn handle_delete<R: Record>(
    State(collection): State<Arc<Collection<R>>>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    let id = parse_id::<R>(&raw_id)?;
    let deleted_id = collection.delete(id).await?;
    Ok(Json(DeletedResponse {
        message: format!("{} deleted", R::NAME),
        deleted_id,
    }))
}
