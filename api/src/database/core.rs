use super::types::Database;
use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new().connect(database_url).await?;
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }
}
