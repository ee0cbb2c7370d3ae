use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use dotenv::dotenv;
use timetable_api::config::{ApiConfig, StorageKind};
use timetable_db::{
    MemoryRepository, PgRepository, SharedRepository, create_pool, schema::initialize_database,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let repo: SharedRepository = match config.storage {
        StorageKind::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL must be set for postgres storage"))?;
            let pool = create_pool(database_url).await?;
            initialize_database(&pool).await?;
            Arc::new(PgRepository::new(pool))
        }
        // Data is lost when the process exits.
        StorageKind::Memory => Arc::new(MemoryRepository::new()),
    };

    timetable_api::start_server(config, repo).await?;

    Ok(())
}
