use super::{list_page, refetch, ListService, RequestValidator};
use crate::error::{AppError, Context, ServiceError};
use crate::list::{ListLimits, ListParams};
use crate::model::{Item, ItemFilters, Patch};
use crate::response::Paginated;
use crate::slug::slugify;
use crate::store::ItemStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateItemRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_raw_material: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl CreateItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::new()
            .name("name", &self.name)
            .url("image_url", self.image_url.as_deref())
            .finish()
    }
}

/// Only fields present in the body are applied.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct UpdateItemRequest {
    #[serde(default)]
    pub name: Patch<String>,
    pub is_raw_material: Option<bool>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub image_url: Patch<String>,
}

impl UpdateItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::new()
            .patch_name("name", &self.name)
            .patch_url("image_url", &self.image_url)
            .finish()
    }
}

pub struct ItemService {
    store: Arc<ItemStore>,
    limits: ListLimits,
}

impl ItemService {
    pub fn new(store: Arc<ItemStore>, limits: ListLimits) -> Self {
        ItemService { store, limits }
    }

    pub async fn create(&self, req: CreateItemRequest) -> Result<Item, ServiceError> {
        let slug = slugify(&req.name);
        let mut item = Item::draft(req.name, slug, req.is_raw_material, req.description, req.image_url);
        self.store
            .create(&mut item)
            .await
            .with_context(|| format!("cannot create item '{}'", item.name))?;
        tracing::debug!(id = item.id, slug = %item.slug, "item created");
        Ok(refetch(self.store.as_ref(), item).await)
    }

    pub async fn get(&self, id: i64) -> Result<Item, ServiceError> {
        self.store
            .get_by_id(id)
            .await
            .with_context(|| format!("item with id {} not found", id))
    }

    /// Merge the request into the stored item. Skips the write when nothing changed.
    pub async fn update(&self, id: i64, req: UpdateItemRequest) -> Result<Item, ServiceError> {
        let mut item = self.get(id).await?;
        let mut changed = false;

        if let Patch::Value(name) = req.name {
            if name != item.name {
                item.slug = slugify(&name);
                item.name = name;
                changed = true;
            }
        }
        if let Some(raw) = req.is_raw_material {
            if raw != item.is_raw_material {
                item.is_raw_material = raw;
                changed = true;
            }
        }
        changed |= req.description.apply_to(&mut item.description);
        changed |= req.image_url.apply_to(&mut item.image_url);

        if !changed {
            return Ok(item);
        }
        self.store
            .update(&mut item)
            .await
            .with_context(|| format!("cannot update item {}", id))?;
        Ok(refetch(self.store.as_ref(), item).await)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .delete(id)
            .await
            .with_context(|| format!("cannot delete item {}", id))
    }
}

#[async_trait]
impl ListService for ItemService {
    type Row = Item;
    type Filters = ItemFilters;

    fn limits(&self) -> &ListLimits {
        &self.limits
    }

    async fn list(&self, params: ListParams<ItemFilters>) -> Result<Paginated<Item>, ServiceError> {
        list_page(self.store.as_ref(), &params, &self.limits).await
    }
}
