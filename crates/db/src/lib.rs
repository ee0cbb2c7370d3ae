pub mod memory;
pub mod models;
pub mod pg;
pub mod repositories;
pub mod repository;
pub mod schema;
pub mod stores;

use std::sync::Arc;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use memory::MemoryRepository;
pub use pg::PgRepository;
pub use repository::Repository;

pub type DbPool = Pool<Postgres>;

/// The repository handle shared between stores and request handlers.
pub type SharedRepository = Arc<dyn Repository>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
