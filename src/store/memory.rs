//! In-process [`Store`] with the same contracts as the PostgreSQL one: unique
//! name/slug, case-insensitive name filter, whitelisted sort, count before page.

use crate::error::StoreError;
use crate::list::{ListParams, SortDirection, SortSpec};
use crate::store::{Resource, Store};
use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::RwLock;

struct Rows<R> {
    next_id: i64,
    by_id: BTreeMap<i64, R>,
}

pub struct MemoryStore<R> {
    rows: RwLock<Rows<R>>,
}

impl<R: Resource> Default for MemoryStore<R> {
    fn default() -> Self {
        MemoryStore::new()
    }
}

impl<R: Resource> MemoryStore<R> {
    pub fn new() -> Self {
        MemoryStore {
            rows: RwLock::new(Rows {
                next_id: 1,
                by_id: BTreeMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Rows<R>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Inconsistent("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Rows<R>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Inconsistent("memory store lock poisoned".into()))
    }
}

fn check_unique<R: Resource>(rows: &Rows<R>, candidate: &R) -> Result<(), StoreError> {
    for other in rows.by_id.values() {
        if other.id() == candidate.id() {
            continue;
        }
        if other.name() == candidate.name() {
            return Err(StoreError::DuplicateEntry(format!(
                "{} name '{}' already exists",
                R::KIND,
                candidate.name()
            )));
        }
        if other.slug() == candidate.slug() {
            return Err(StoreError::DuplicateEntry(format!(
                "{} slug '{}' already exists",
                R::KIND,
                candidate.slug()
            )));
        }
    }
    Ok(())
}

fn compare<R: Resource>(a: &R, b: &R, sort: SortSpec) -> Ordering {
    let primary = match sort.field {
        "name" => a.name().cmp(b.name()),
        "slug" => a.slug().cmp(b.slug()),
        "updated_at" => a.updated_at().cmp(&b.updated_at()),
        _ => a.created_at().cmp(&b.created_at()),
    };
    let ord = primary.then_with(|| a.id().cmp(&b.id()));
    match sort.direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    }
}

#[async_trait]
impl<R: Resource> Store<R> for MemoryStore<R> {
    async fn create(&self, row: &mut R) -> Result<(), StoreError> {
        let mut rows = self.write()?;
        let now = Utc::now();
        row.set_created_at(now);
        row.set_updated_at(now);
        row.set_id(0);
        check_unique(&rows, row)?;
        let id = rows.next_id;
        rows.next_id += 1;
        row.set_id(id);
        rows.by_id.insert(id, row.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: i64) -> Result<R, StoreError> {
        self.read()?.by_id.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn update(&self, row: &mut R) -> Result<(), StoreError> {
        let mut rows = self.write()?;
        let Some(created_at) = rows.by_id.get(&row.id()).map(|r| r.created_at()) else {
            return Err(StoreError::NotFound);
        };
        check_unique(&rows, row)?;
        row.set_updated_at(Utc::now());
        let mut stored = row.clone();
        stored.set_created_at(created_at);
        rows.by_id.insert(row.id(), stored);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.write()?
            .by_id
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, params: &ListParams<R::Filters>) -> Result<(Vec<R>, i64), StoreError> {
        let rows = self.read()?;
        let mut matching: Vec<&R> = rows
            .by_id
            .values()
            .filter(|r| r.matches(&params.filters))
            .collect();
        let total = matching.len() as i64;
        if total == 0 {
            return Ok((Vec::new(), 0));
        }
        let sort = SortSpec::resolve(params.sort.as_deref(), R::SORT_FIELDS);
        matching.sort_by(|a, b| compare(*a, *b, sort));
        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.per_page).unwrap_or(0);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemFilters};

    fn item(name: &str, slug: &str, raw: bool) -> Item {
        Item::draft(name.into(), slug.into(), raw, None, None)
    }

    fn params(filters: ItemFilters, sort: Option<&str>, page: i64, per_page: i64) -> ListParams<ItemFilters> {
        ListParams {
            page,
            per_page,
            sort: sort.map(str::to_string),
            filters,
        }
    }

    async fn seeded() -> MemoryStore<Item> {
        let store = MemoryStore::new();
        for (name, slug, raw) in [
            ("Iron Ore", "iron-ore", true),
            ("Iron Plate", "iron-plate", false),
            ("Copper Ore", "copper-ore", true),
            ("Gear", "gear", false),
        ] {
            store.create(&mut item(name, slug, raw)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let mut it = item("Iron Ore", "iron-ore", true);
        store.create(&mut it).await.unwrap();
        assert_eq!(it.id, 1);
        assert_eq!(it.created_at, it.updated_at);
        assert!(it.created_at > chrono::DateTime::<Utc>::default());
        assert_eq!(store.get_by_id(1).await.unwrap(), it);
    }

    #[tokio::test]
    async fn duplicates_rejected() {
        let store = seeded().await;
        let err = store.create(&mut item("Iron Ore", "other", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry(_)));
        let err = store.create(&mut item("iron  ore", "iron-ore", true)).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEntry(_)));
    }

    #[tokio::test]
    async fn update_and_delete_missing_rows() {
        let store = seeded().await;
        let mut ghost = item("Ghost", "ghost", false);
        ghost.id = 99;
        assert!(matches!(store.update(&mut ghost).await, Err(StoreError::NotFound)));
        assert!(matches!(store.delete(99).await, Err(StoreError::NotFound)));
        assert!(matches!(store.get_by_id(99).await, Err(StoreError::NotFound)));
        store.delete(1).await.unwrap();
        assert!(matches!(store.get_by_id(1).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_keeps_created_at_and_checks_uniqueness() {
        let store = seeded().await;
        let mut gear = store.get_by_id(4).await.unwrap();
        let created = gear.created_at;
        gear.name = "Iron Plate".into();
        gear.slug = "iron-plate".into();
        assert!(matches!(store.update(&mut gear).await, Err(StoreError::DuplicateEntry(_))));
        gear.name = "Cog".into();
        gear.slug = "cog".into();
        store.update(&mut gear).await.unwrap();
        let stored = store.get_by_id(4).await.unwrap();
        assert_eq!(stored.name, "Cog");
        assert_eq!(stored.created_at, created);
        assert!(stored.updated_at >= created);
    }

    #[tokio::test]
    async fn list_filters_sorts_and_pages() {
        let store = seeded().await;
        let filters = ItemFilters {
            name: Some("IRON".into()),
            is_raw_material: None,
        };
        let (rows, total) = store.list(&params(filters, Some("name_desc"), 1, 15)).await.unwrap();
        assert_eq!(total, 2);
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Iron Plate", "Iron Ore"]);

        let filters = ItemFilters {
            name: None,
            is_raw_material: Some(true),
        };
        let (rows, total) = store.list(&params(filters, Some("slug_asc"), 1, 15)).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].slug, "copper-ore");

        let (rows, total) = store
            .list(&params(ItemFilters::default(), Some("name_asc"), 2, 3))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Iron Plate");
    }

    #[tokio::test]
    async fn default_sort_is_newest_first() {
        let store = seeded().await;
        let (rows, _) = store
            .list(&params(ItemFilters::default(), Some("nope_asc"), 1, 15))
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn empty_result_short_circuits() {
        let store = seeded().await;
        let filters = ItemFilters {
            name: Some("diamond".into()),
            is_raw_material: None,
        };
        let (rows, total) = store.list(&params(filters, None, 3, 15)).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(total, 0);
    }
}
