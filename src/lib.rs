//! Crafting API: REST backend for game items, crafting methods and the recipe schema.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod list;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod slug;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{AppConfig, StorageBackend};
pub use db::{connect, ensure_database_exists, ensure_schema};
pub use error::{AppError, ConfigError, ServiceError, StoreError};
pub use response::Paginated;
pub use routes::{app, HttpOptions};
pub use service::{CraftingMethodService, ItemService};
pub use state::AppState;
