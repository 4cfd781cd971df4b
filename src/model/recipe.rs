//! Recipe rows: a crafting method turns input items into output items.
//! Data model only; these tables are created by [`crate::db::ensure_schema`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output probability in basis points: 10000 = 100.00%.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i32", into = "i32")]
#[sqlx(transparent)]
pub struct Chance(i32);

impl Chance {
    pub const MAX: i32 = 10_000;
    pub const CERTAIN: Chance = Chance(Self::MAX);

    pub fn new(basis_points: i32) -> Option<Self> {
        (0..=Self::MAX).contains(&basis_points).then_some(Chance(basis_points))
    }

    pub fn basis_points(&self) -> i32 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl Default for Chance {
    fn default() -> Self {
        Chance::CERTAIN
    }
}

impl TryFrom<i32> for Chance {
    type Error = String;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Chance::new(v).ok_or_else(|| format!("chance must be between 0 and {}, got {}", Self::MAX, v))
    }
}

impl From<Chance> for i32 {
    fn from(c: Chance) -> i32 {
        c.0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: i64,
    pub name: Option<String>,
    pub crafting_method_id: i64,
    pub energy_per_tick: Option<i32>,
    pub duration_ticks: Option<i32>,
    pub notes: Option<String>,
    /// Canonical recipe for its outputs when the user has no preference.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct RecipeInput {
    pub id: i64,
    pub recipe_id: i64,
    pub item_id: i64,
    pub quantity: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct RecipeOutput {
    pub id: i64,
    pub recipe_id: i64,
    pub item_id: i64,
    pub quantity: i32,
    pub chance: Chance,
    pub is_primary_output: bool,
}

/// A user's pinned recipe for one output item; unique per (user, output item).
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserPreferredRecipe {
    pub id: i64,
    pub user_id: i64,
    pub output_item_id: i64,
    pub recipe_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chance_bounds() {
        assert_eq!(Chance::new(0).map(|c| c.basis_points()), Some(0));
        assert_eq!(Chance::new(10_000), Some(Chance::CERTAIN));
        assert_eq!(Chance::new(10_001), None);
        assert_eq!(Chance::new(-1), None);
        assert_eq!(Chance::default(), Chance::CERTAIN);
    }

    #[test]
    fn chance_percent() {
        assert_eq!(Chance::new(2_550).unwrap().percent(), 25.5);
        assert_eq!(Chance::CERTAIN.percent(), 100.0);
    }

    #[test]
    fn chance_serde_checks_range() {
        let c: Chance = serde_json::from_str("7500").unwrap();
        assert_eq!(c.basis_points(), 7_500);
        assert_eq!(serde_json::to_string(&c).unwrap(), "7500");
        assert!(serde_json::from_str::<Chance>("20000").is_err());
    }
}
