//! Item handlers: create, read, update, delete. Listing goes through [`super::list_resources`].

use super::parse_id;
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{created, ok};
use crate::service::{CreateItemRequest, ItemService, UpdateItemRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn create_item(
    State(service): State<Arc<ItemService>>,
    JsonBody(req): JsonBody<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    let item = service.create(req).await?;
    Ok(created(item))
}

pub async fn read_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    Ok(ok(service.get(id).await?))
}

pub async fn update_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    req.validate()?;
    Ok(ok(service.update(id, req).await?))
}

pub async fn delete_item(
    State(service): State<Arc<ItemService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
