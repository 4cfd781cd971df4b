//! Domain types: persisted rows, list filters, and the partial-update wrapper.

pub mod crafting_method;
pub mod item;
pub mod patch;
pub mod recipe;

pub use crafting_method::{CraftingMethod, CraftingMethodFilters};
pub use item::{Item, ItemFilters};
pub use patch::Patch;
pub use recipe::{Chance, Recipe, RecipeInput, RecipeOutput, UserPreferredRecipe};
