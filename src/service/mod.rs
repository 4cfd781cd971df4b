//! Resource services: slug derivation, partial-update merge, post-write re-fetch.

mod crafting_method;
mod item;
mod validation;

pub use crafting_method::{CraftingMethodService, CreateCraftingMethodRequest, UpdateCraftingMethodRequest};
pub use item::{CreateItemRequest, ItemService, UpdateItemRequest};
pub use validation::{RequestValidator, NAME_MAX_CHARS, NAME_MIN_CHARS, URL_MAX_CHARS};

use crate::error::{Context, ServiceError};
use crate::list::{ListFilters, ListLimits, ListParams};
use crate::response::Paginated;
use crate::store::{Resource, Store};
use async_trait::async_trait;
use serde::Serialize;

/// A service that can serve one page of a resource list. The list handler is generic over this.
#[async_trait]
pub trait ListService: Send + Sync + 'static {
    type Row: Serialize + Send;
    type Filters: ListFilters;

    fn limits(&self) -> &ListLimits;

    async fn list(&self, params: ListParams<Self::Filters>) -> Result<Paginated<Self::Row>, ServiceError>;
}

pub(crate) async fn list_page<R: Resource>(
    store: &dyn Store<R>,
    params: &ListParams<R::Filters>,
    limits: &ListLimits,
) -> Result<Paginated<R>, ServiceError> {
    let (rows, total) = store
        .list(params)
        .await
        .with_context(|| format!("cannot list {}s", R::KIND))?;
    Ok(Paginated::new(rows, total, params.page, params.per_page, limits))
}

/// Re-read a row after a successful write to pick up backend-assigned values.
/// A failed re-read is logged and the written copy is returned instead.
pub(crate) async fn refetch<R: Resource>(store: &dyn Store<R>, written: R) -> R {
    match store.get_by_id(written.id()).await {
        Ok(fresh) => fresh,
        Err(e) => {
            tracing::warn!(kind = R::KIND, id = written.id(), error = %e, "re-fetch after write failed");
            written
        }
    }
}
