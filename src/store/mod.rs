//! Resource persistence: one `Store` contract, a PostgreSQL and an in-memory backend.
//!
//! Stores are the only writers of `created_at`/`updated_at` and raise the lowest-level
//! [`StoreError`] kinds (`NotFound`, `DuplicateEntry`, ...).

pub mod memory;
pub mod postgres;

use crate::error::StoreError;
use crate::list::{ListFilters, ListParams, SORTABLE_FIELDS};
use crate::model::{CraftingMethod, CraftingMethodFilters, Item, ItemFilters};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A listable, slugged resource row.
pub trait Resource: Clone + Send + Sync + 'static {
    type Filters: ListFilters + Clone + 'static;

    /// Singular name used in log and error context ("item").
    const KIND: &'static str;
    const SORT_FIELDS: &'static [&'static str] = SORTABLE_FIELDS;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
    fn name(&self) -> &str;
    fn slug(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_created_at(&mut self, at: DateTime<Utc>);
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// In-process evaluation of the filter (memory backend).
    fn matches(&self, filters: &Self::Filters) -> bool;
}

#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    /// Stamp timestamps, persist, and write the generated id back into `row`.
    async fn create(&self, row: &mut R) -> Result<(), StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<R, StoreError>;

    /// Refresh `updated_at` and persist every mutable field by id.
    async fn update(&self, row: &mut R) -> Result<(), StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// One page of matching rows plus the filter-wide total.
    async fn list(&self, params: &ListParams<R::Filters>) -> Result<(Vec<R>, i64), StoreError>;
}

pub type ItemStore = dyn Store<Item>;
pub type CraftingMethodStore = dyn Store<CraftingMethod>;

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

impl Resource for Item {
    type Filters = ItemFilters;
    const KIND: &'static str = "item";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }
    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn matches(&self, filters: &ItemFilters) -> bool {
        contains_ignore_case(&self.name, filters.name.as_deref())
            && filters
                .is_raw_material
                .map_or(true, |raw| raw == self.is_raw_material)
    }
}

impl Resource for CraftingMethod {
    type Filters = CraftingMethodFilters;
    const KIND: &'static str = "crafting method";

    fn id(&self) -> i64 {
        self.id
    }
    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn slug(&self) -> &str {
        &self.slug
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
    fn set_created_at(&mut self, at: DateTime<Utc>) {
        self.created_at = at;
    }
    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn matches(&self, filters: &CraftingMethodFilters) -> bool {
        contains_ignore_case(&self.name, filters.name.as_deref())
    }
}
