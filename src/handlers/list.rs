//! Generic list handler: query string -> typed params -> one page envelope.

use crate::error::AppError;
use crate::list::{parse_list_params, QueryMap};
use crate::service::ListService;
use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

pub async fn list_resources<S: ListService>(
    State(service): State<Arc<S>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let query: QueryMap = pairs.into_iter().collect();
    let params = parse_list_params::<S::Filters>(&query, service.limits())?;
    let page = service.list(params).await?;
    Ok(Json(page))
}
