use super::parse_id;
use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{created, ok};
use crate::service::{CraftingMethodService, CreateCraftingMethodRequest, UpdateCraftingMethodRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

pub async fn create_crafting_method(
    State(service): State<Arc<CraftingMethodService>>,
    JsonBody(req): JsonBody<CreateCraftingMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;
    Ok(created(service.create(req).await?))
}

pub async fn read_crafting_method(
    State(service): State<Arc<CraftingMethodService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    Ok(ok(service.get(id).await?))
}

pub async fn update_crafting_method(
    State(service): State<Arc<CraftingMethodService>>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateCraftingMethodRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    req.validate()?;
    Ok(ok(service.update(id, req).await?))
}

pub async fn delete_crafting_method(
    State(service): State<Arc<CraftingMethodService>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
