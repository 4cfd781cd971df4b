//! Router assembly.

mod api;
mod common;

pub use api::{api_routes, app, HttpOptions, API_PREFIX, BODY_LIMIT_BYTES};
pub use common::common_routes;
