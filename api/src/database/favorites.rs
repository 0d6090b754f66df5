use super::types::{now_ns, Database};
use anyhow::Result;

impl Database {
    /// Add a property to the user's favorites. Idempotent: re-adding an
    /// existing favorite is a no-op.
    pub async fn add_favorite(&self, user_id: i64, property_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO favorites (user_id, property_id, created_at_ns) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(property_id)
        .bind(now_ns())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Remove a favorite. Returns whether an entry was actually deleted.
    pub async fn remove_favorite(&self, user_id: i64, property_id: i64) -> Result<bool> {
        let done = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND property_id = ?")
            .bind(user_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    pub async fn favorite_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT property_id FROM favorites WHERE user_id = ? ORDER BY property_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }
}
