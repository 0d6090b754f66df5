/// Shared test helpers for database tests
use super::Database;
use sqlx::sqlite::SqlitePoolOptions;

/// Set up a fresh in-memory sqlite database with all migrations applied.
/// A single connection keeps every query on the same in-memory instance.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory sqlite database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Migration failed");

    Database { pool }
}
