//! Response helpers and the pagination envelope.

use crate::list::ListLimits;
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Standard paginated list envelope.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub total: i64,
    pub per_page: i64,
    pub current_page: i64,
    pub last_page: i64,
    pub from: i64,
    pub to: i64,
    pub data: Vec<T>,
}

impl<T> Paginated<T> {
    /// Build page metadata for `data`, given the filter-wide `total` and the requested
    /// page/per-page. `current_page` is clamped to `last_page`; the query is not re-run.
    pub fn new(data: Vec<T>, total: i64, page: i64, per_page: i64, limits: &ListLimits) -> Self {
        let mut page = limits.normalize_page(page);
        let per_page = limits.normalize_per_page(per_page);

        let last_page = if total > 0 {
            (total + per_page - 1) / per_page
        } else if page == 1 {
            1
        } else {
            0
        };

        if last_page > 0 && page > last_page {
            page = last_page;
        }

        let (from, to) = if total > 0 && !data.is_empty() {
            let from = (page - 1) * per_page + 1;
            (from, from + data.len() as i64 - 1)
        } else {
            (0, 0)
        };

        Paginated {
            total,
            per_page,
            current_page: page,
            last_page,
            from,
            to,
            data,
        }
    }
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
