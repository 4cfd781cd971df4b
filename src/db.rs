//! Database bootstrap: create the database if missing, open the pool, ensure tables.

use crate::config::AppConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use std::time::Duration;

const POOL_MAX_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Tables in dependency order. Every statement is idempotent.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        slug VARCHAR(255) NOT NULL UNIQUE,
        is_raw_material BOOLEAN NOT NULL DEFAULT FALSE,
        description TEXT,
        image_url VARCHAR(2048),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS crafting_methods (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE,
        slug VARCHAR(255) NOT NULL UNIQUE,
        description TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipes (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(255) UNIQUE,
        crafting_method_id BIGINT NOT NULL REFERENCES crafting_methods(id) ON DELETE RESTRICT,
        energy_per_tick INTEGER,
        duration_ticks INTEGER,
        notes TEXT,
        is_default BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_inputs (
        id BIGSERIAL PRIMARY KEY,
        recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        UNIQUE (recipe_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recipe_outputs (
        id BIGSERIAL PRIMARY KEY,
        recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        chance INTEGER NOT NULL DEFAULT 10000 CHECK (chance BETWEEN 0 AND 10000),
        is_primary_output BOOLEAN NOT NULL DEFAULT FALSE,
        UNIQUE (recipe_id, item_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username VARCHAR(255) NOT NULL UNIQUE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_preferred_recipes (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        output_item_id BIGINT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
        recipe_id BIGINT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        UNIQUE (user_id, output_item_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_items_is_raw_material ON items (is_raw_material)",
    "CREATE INDEX IF NOT EXISTS idx_recipes_crafting_method_id ON recipes (crafting_method_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_inputs_item_id ON recipe_inputs (item_id)",
    "CREATE INDEX IF NOT EXISTS idx_recipe_outputs_item_id ON recipe_outputs (item_id)",
];

/// Create all tables and indexes if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for ddl in SCHEMA {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!(statements = SCHEMA.len(), "schema ensured");
    Ok(())
}

/// Open the pool and verify the connection.
pub async fn connect(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .max_lifetime(POOL_MAX_LIFETIME)
        .connect(&config.database_url)
        .await?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    let (admin_url, db_name) = split_db_name(database_url);
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)?;
    let mut conn = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://u:p@h:5432/name?x=y` into (`postgres://u:p@h:5432/postgres?x=y`, `name`).
fn split_db_name(url: &str) -> (String, String) {
    let Some(slash) = url.rfind('/') else {
        return (url.to_string(), String::new());
    };
    let (base, rest) = url.split_at(slash + 1);
    let (name, query) = match rest.split_once('?') {
        Some((n, q)) => (n, Some(q)),
        None => (rest, None),
    };
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    (admin_url, name.trim().to_string())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_database_name() {
        assert_eq!(
            split_db_name("postgres://u:p@db:5432/crafting"),
            ("postgres://u:p@db:5432/postgres".to_string(), "crafting".to_string())
        );
        assert_eq!(
            split_db_name("postgres://db/crafting?sslmode=disable"),
            ("postgres://db/postgres?sslmode=disable".to_string(), "crafting".to_string())
        );
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("crafting"), "\"crafting\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn schema_covers_every_table() {
        let ddl = SCHEMA.join("\n");
        for table in [
            "items",
            "crafting_methods",
            "recipes",
            "recipe_inputs",
            "recipe_outputs",
            "users",
            "user_preferred_recipes",
        ] {
            assert!(
                ddl.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)),
                "missing {}",
                table
            );
        }
        assert!(ddl.contains("REFERENCES crafting_methods(id) ON DELETE RESTRICT"));
    }
}
