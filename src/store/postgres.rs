//! PostgreSQL-backed [`Store`] over the parameterized SQL builder.

use crate::error::StoreError;
use crate::list::{ListParams, SortSpec};
use crate::model::{CraftingMethod, CraftingMethodFilters, Item, ItemFilters};
use crate::sql::{self, to_arguments, PgBindValue, Predicate, QueryBuf, Table};
use crate::store::{Resource, Store};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;

/// Table mapping for a resource stored in PostgreSQL.
pub trait PgResource: Resource + for<'r> FromRow<'r, PgRow> + Unpin {
    const TABLE: Table;

    fn predicates(filters: &Self::Filters) -> Vec<Predicate>;

    /// Every persisted column except `id`, in insert/update order.
    fn write_values(&self) -> Vec<(&'static str, PgBindValue)>;
}

const ITEMS: Table = Table {
    name: "items",
    columns: &[
        "id",
        "name",
        "slug",
        "is_raw_material",
        "description",
        "image_url",
        "created_at",
        "updated_at",
    ],
};

const CRAFTING_METHODS: Table = Table {
    name: "crafting_methods",
    columns: &["id", "name", "slug", "description", "created_at", "updated_at"],
};

fn name_predicate(name: &Option<String>) -> Option<Predicate> {
    name.as_ref().filter(|n| !n.is_empty()).map(|n| Predicate::Contains {
        column: "name",
        needle: n.clone(),
    })
}

impl PgResource for Item {
    const TABLE: Table = ITEMS;

    fn predicates(filters: &ItemFilters) -> Vec<Predicate> {
        let mut out: Vec<Predicate> = name_predicate(&filters.name).into_iter().collect();
        if let Some(raw) = filters.is_raw_material {
            out.push(Predicate::Equals {
                column: "is_raw_material",
                value: raw.into(),
            });
        }
        out
    }

    fn write_values(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("slug", self.slug.clone().into()),
            ("is_raw_material", self.is_raw_material.into()),
            ("description", self.description.clone().into()),
            ("image_url", self.image_url.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

impl PgResource for CraftingMethod {
    const TABLE: Table = CRAFTING_METHODS;

    fn predicates(filters: &CraftingMethodFilters) -> Vec<Predicate> {
        name_predicate(&filters.name).into_iter().collect()
    }

    fn write_values(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("slug", self.slug.clone().into()),
            ("description", self.description.clone().into()),
            ("created_at", self.created_at.into()),
            ("updated_at", self.updated_at.into()),
        ]
    }
}

pub struct PgStore<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> PgStore<R> {
    pub fn new(pool: PgPool) -> Self {
        PgStore {
            pool,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for PgStore<R> {
    fn clone(&self) -> Self {
        PgStore::new(self.pool.clone())
    }
}

impl<R: PgResource> PgStore<R> {
    async fn execute(&self, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "execute");
        let args = to_arguments(&q.params)?;
        let done = sqlx::query_with(&q.sql, args)
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_write)?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl<R: PgResource> Store<R> for PgStore<R> {
    async fn create(&self, row: &mut R) -> Result<(), StoreError> {
        let now = Utc::now();
        row.set_created_at(now);
        row.set_updated_at(now);
        let q = sql::insert(&R::TABLE, row.write_values());
        tracing::debug!(sql = %q.sql, params = ?q.params, "insert");
        let args = to_arguments(&q.params)?;
        let id: i64 = sqlx::query_scalar_with(&q.sql, args)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::from_write)?;
        row.set_id(id);
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<R, StoreError> {
        let q = sql::select_by_id(&R::TABLE, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let args = to_arguments(&q.params)?;
        sqlx::query_as_with::<_, R, _>(&q.sql, args)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, row: &mut R) -> Result<(), StoreError> {
        row.set_updated_at(Utc::now());
        let mut values = row.write_values();
        values.retain(|(col, _)| *col != "created_at");
        let q = sql::update(&R::TABLE, row.id(), values);
        if self.execute(&q).await? == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let q = sql::delete(&R::TABLE, id);
        if self.execute(&q).await? == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, params: &ListParams<R::Filters>) -> Result<(Vec<R>, i64), StoreError> {
        let predicates = R::predicates(&params.filters);

        let q = sql::count(&R::TABLE, &predicates);
        tracing::debug!(sql = %q.sql, params = ?q.params, "count");
        let args = to_arguments(&q.params)?;
        let total: i64 = sqlx::query_scalar_with(&q.sql, args)
            .fetch_one(&self.pool)
            .await?;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let sort = SortSpec::resolve(params.sort.as_deref(), R::SORT_FIELDS);
        let q = sql::select_page(&R::TABLE, &predicates, sort, params.per_page, params.offset());
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let args = to_arguments(&q.params)?;
        let rows = sqlx::query_as_with::<_, R, _>(&q.sql, args)
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_predicates() {
        let filters = ItemFilters {
            name: Some("iron".into()),
            is_raw_material: Some(false),
        };
        let preds = Item::predicates(&filters);
        assert_eq!(
            preds,
            vec![
                Predicate::Contains {
                    column: "name",
                    needle: "iron".into()
                },
                Predicate::Equals {
                    column: "is_raw_material",
                    value: PgBindValue::Bool(false)
                },
            ]
        );
        assert!(Item::predicates(&ItemFilters::default()).is_empty());
    }

    #[test]
    fn crafting_method_predicates() {
        let filters = CraftingMethodFilters {
            name: Some(String::new()),
        };
        assert!(CraftingMethod::predicates(&filters).is_empty());
    }

    #[test]
    fn write_values_cover_table_columns() {
        let item = Item::draft("Iron Ore".into(), "iron-ore".into(), true, None, None);
        let cols: Vec<&str> = item.write_values().into_iter().map(|(c, _)| c).collect();
        assert_eq!(cols, &ITEMS.columns[1..]);
        let method = CraftingMethod::draft("Smelting".into(), "smelting".into(), None);
        let cols: Vec<&str> = method.write_values().into_iter().map(|(c, _)| c).collect();
        assert_eq!(cols, &CRAFTING_METHODS.columns[1..]);
    }
}
