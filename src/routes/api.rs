//! Resource routes under `/api/v1` and the middleware stack.

use crate::config::AppConfig;
use crate::error::ErrorBody;
use crate::handlers::{
    create_crafting_method, create_item, delete_crafting_method, delete_item, list_resources,
    read_crafting_method, read_item, update_crafting_method, update_item,
};
use crate::routes::common_routes;
use crate::service::{CraftingMethodService, ItemService};
use crate::state::AppState;
use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::any::Any;
use std::time::Duration;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub const API_PREFIX: &str = "/api/v1";
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
pub const CORS_MAX_AGE: Duration = Duration::from_secs(300);

/// Middleware settings for [`app`].
#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub body_limit: usize,
}

impl Default for HttpOptions {
    fn default() -> Self {
        HttpOptions {
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(60),
            body_limit: BODY_LIMIT_BYTES,
        }
    }
}

impl From<&AppConfig> for HttpOptions {
    fn from(config: &AppConfig) -> Self {
        HttpOptions {
            allowed_origins: config.allowed_origins.clone(),
            request_timeout: config.request_timeout,
            body_limit: BODY_LIMIT_BYTES,
        }
    }
}

/// Item and crafting-method CRUD, relative to the API prefix.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(list_resources::<ItemService>).post(create_item),
        )
        .route(
            "/items/:id",
            get(read_item).put(update_item).delete(delete_item),
        )
        .route(
            "/crafting-methods",
            get(list_resources::<CraftingMethodService>).post(create_crafting_method),
        )
        .route(
            "/crafting-methods/:id",
            get(read_crafting_method)
                .put(update_crafting_method)
                .delete(delete_crafting_method),
        )
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
        ])
        .expose_headers([header::LINK])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE)
}

/// The full application: health/version at the root, resources under `/api/v1`.
pub fn app(state: AppState, options: &HttpOptions) -> Router {
    Router::new()
        .merge(common_routes::<AppState>())
        .nest(API_PREFIX, api_routes())
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(options.body_limit))
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// A handler panic becomes a 500 with the standard error body.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "request handler panicked");
    let body = ErrorBody {
        status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        message: "Internal Server Error".into(),
        details: None,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panics_become_json_500() {
        let router: Router = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(panic_response));
        let req = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let res = router.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "Internal Server Error");
    }
}
