use super::{list_page, refetch, ListService, RequestValidator};
use crate::error::{AppError, Context, ServiceError};
use crate::list::{ListLimits, ListParams};
use crate::model::{CraftingMethod, CraftingMethodFilters, Patch};
use crate::response::Paginated;
use crate::slug::slugify;
use crate::store::CraftingMethodStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct CreateCraftingMethodRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl CreateCraftingMethodRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::new().name("name", &self.name).finish()
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct UpdateCraftingMethodRequest {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl UpdateCraftingMethodRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        RequestValidator::new().patch_name("name", &self.name).finish()
    }
}

pub struct CraftingMethodService {
    store: Arc<CraftingMethodStore>,
    limits: ListLimits,
}

impl CraftingMethodService {
    pub fn new(store: Arc<CraftingMethodStore>, limits: ListLimits) -> Self {
        CraftingMethodService { store, limits }
    }

    pub async fn create(&self, req: CreateCraftingMethodRequest) -> Result<CraftingMethod, ServiceError> {
        let slug = slugify(&req.name);
        let mut method = CraftingMethod::draft(req.name, slug, req.description);
        self.store
            .create(&mut method)
            .await
            .with_context(|| format!("cannot create crafting method '{}'", method.name))?;
        Ok(refetch(self.store.as_ref(), method).await)
    }

    pub async fn get(&self, id: i64) -> Result<CraftingMethod, ServiceError> {
        self.store
            .get_by_id(id)
            .await
            .with_context(|| format!("crafting method with id {} not found", id))
    }

    pub async fn update(&self, id: i64, req: UpdateCraftingMethodRequest) -> Result<CraftingMethod, ServiceError> {
        let mut method = self.get(id).await?;
        let mut changed = false;

        if let Patch::Value(name) = req.name {
            if name != method.name {
                method.slug = slugify(&name);
                method.name = name;
                changed = true;
            }
        }
        changed |= req.description.apply_to(&mut method.description);

        if !changed {
            return Ok(method);
        }
        self.store
            .update(&mut method)
            .await
            .with_context(|| format!("cannot update crafting method {}", id))?;
        Ok(refetch(self.store.as_ref(), method).await)
    }

    /// Fails with `Referenced` while recipes still use the method.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.store
            .delete(id)
            .await
            .with_context(|| format!("cannot delete crafting method {}", id))
    }
}

#[async_trait]
impl ListService for CraftingMethodService {
    type Row = CraftingMethod;
    type Filters = CraftingMethodFilters;

    fn limits(&self) -> &ListLimits {
        &self.limits
    }

    async fn list(
        &self,
        params: ListParams<CraftingMethodFilters>,
    ) -> Result<Paginated<CraftingMethod>, ServiceError> {
        list_page(self.store.as_ref(), &params, &self.limits).await
    }
}
