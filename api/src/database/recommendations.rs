use super::properties::{qualified_columns, Property};
use super::types::{now_ns, Database};
use anyhow::Result;
use serde::Serialize;

/// A recommendation as seen by its recipient, property populated.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReceivedRecommendation {
    #[serde(rename = "from")]
    pub from_email: String,
    #[sqlx(flatten)]
    pub property: Property,
}

/// A recommendation as seen by its sender, property populated.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct SentRecommendation {
    #[serde(rename = "to")]
    pub to_email: String,
    #[sqlx(flatten)]
    pub property: Property,
}

impl Database {
    /// Record a recommendation. `Ok(false)` means this sender already
    /// recommended this property to this recipient (409 upstream).
    pub async fn create_recommendation(
        &self,
        from_user_id: i64,
        from_email: &str,
        to_user_id: i64,
        property_id: i64,
    ) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO recommendations (from_user_id, from_email, to_user_id, property_id, \
             created_at_ns) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(from_user_id)
        .bind(from_email)
        .bind(to_user_id)
        .bind(property_id)
        .bind(now_ns())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn received_recommendations(
        &self,
        user_id: i64,
    ) -> Result<Vec<ReceivedRecommendation>> {
        let sql = format!(
            "SELECT {}, r.from_email FROM recommendations r \
             JOIN properties p ON p.id = r.property_id \
             WHERE r.to_user_id = ? ORDER BY r.id",
            qualified_columns("p")
        );
        let recommendations = sqlx::query_as::<_, ReceivedRecommendation>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(recommendations)
    }

    pub async fn sent_recommendations(&self, user_id: i64) -> Result<Vec<SentRecommendation>> {
        let sql = format!(
            "SELECT {}, u.email AS to_email FROM recommendations r \
             JOIN properties p ON p.id = r.property_id \
             JOIN users u ON u.id = r.to_user_id \
             WHERE r.from_user_id = ? ORDER BY r.id",
            qualified_columns("p")
        );
        let recommendations = sqlx::query_as::<_, SentRecommendation>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(recommendations)
    }
}
