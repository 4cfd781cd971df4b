use crate::error::ParseError;
use crate::list::{ListFilters, QueryMap};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A way of crafting (workbench, furnace, assembler...). Same slug rule as items.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct CraftingMethod {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CraftingMethod {
    pub fn draft(name: String, slug: String, description: Option<String>) -> Self {
        let epoch = DateTime::<Utc>::default();
        CraftingMethod {
            id: 0,
            name,
            slug,
            description,
            created_at: epoch,
            updated_at: epoch,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CraftingMethodFilters {
    pub name: Option<String>,
}

impl ListFilters for CraftingMethodFilters {
    fn from_query(query: &QueryMap) -> Result<Self, ParseError> {
        Ok(CraftingMethodFilters {
            name: query.string("name"),
        })
    }
}
