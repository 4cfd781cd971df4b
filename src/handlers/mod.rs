//! HTTP handlers: decode, validate, call the service, encode.

pub mod crafting_method;
pub mod item;
pub mod list;

pub use crafting_method::*;
pub use item::*;
pub use list::list_resources;

use crate::error::AppError;

/// Path ids are positive integers; anything else is a 400.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("invalid id '{}'", raw))),
    }
}
