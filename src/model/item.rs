use crate::error::ParseError;
use crate::list::{ListFilters, QueryMap};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A game item. `slug` always mirrors `name` through [`crate::slug::slugify`].
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_raw_material: bool,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Unsaved item; id and timestamps are assigned by the store.
    pub fn draft(
        name: String,
        slug: String,
        is_raw_material: bool,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        let epoch = DateTime::<Utc>::default();
        Item {
            id: 0,
            name,
            slug,
            is_raw_material,
            description,
            image_url,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilters {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,
    pub is_raw_material: Option<bool>,
}

impl ListFilters for ItemFilters {
    fn from_query(query: &QueryMap) -> Result<Self, ParseError> {
        Ok(ItemFilters {
            name: query.string("name"),
            is_raw_material: query.bool("is_raw_material")?,
        })
    }
}
