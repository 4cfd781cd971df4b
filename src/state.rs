//! Shared application state. Handlers extract the service they need via `FromRef`.

use crate::list::ListLimits;
use crate::model::{CraftingMethod, Item};
use crate::service::{CraftingMethodService, ItemService};
use crate::store::{CraftingMethodStore, ItemStore, MemoryStore, PgStore};
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub items: Arc<ItemService>,
    pub crafting_methods: Arc<CraftingMethodService>,
}

impl AppState {
    pub fn new(items: Arc<ItemStore>, crafting_methods: Arc<CraftingMethodStore>, limits: ListLimits) -> Self {
        AppState {
            items: Arc::new(ItemService::new(items, limits)),
            crafting_methods: Arc::new(CraftingMethodService::new(crafting_methods, limits)),
        }
    }

    pub fn postgres(pool: PgPool, limits: ListLimits) -> Self {
        Self::new(
            Arc::new(PgStore::<Item>::new(pool.clone())),
            Arc::new(PgStore::<CraftingMethod>::new(pool)),
            limits,
        )
    }

    pub fn in_memory(limits: ListLimits) -> Self {
        Self::new(
            Arc::new(MemoryStore::<Item>::new()),
            Arc::new(MemoryStore::<CraftingMethod>::new()),
            limits,
        )
    }
}

impl FromRef<AppState> for Arc<ItemService> {
    fn from_ref(state: &AppState) -> Self {
        state.items.clone()
    }
}

impl FromRef<AppState> for Arc<CraftingMethodService> {
    fn from_ref(state: &AppState) -> Self {
        state.crafting_methods.clone()
    }
}
