use super::types::{now_ns, Database};
use crate::search::{build_where, PredicateMap, PropertyStore, SqlValue};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A catalog listing. Multi-valued string sets (`amenities`, `tags`) are
/// stored as `|`-separated text, the same encoding the seed data uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Option<i64>,
    pub title: String,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub amenities: Option<String>,
    pub furnished: Option<String>,
    pub available_from: Option<String>,
    pub listed_by: Option<String>,
    pub tags: Option<String>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: bool,
    pub listing_type: Option<String>,
    pub created_by: Option<i64>,
    pub created_at_ns: i64,
    pub updated_at_ns: i64,
}

/// Create/update payload. Every field is optional so the update path can do
/// a partial merge; create additionally requires `title`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price: Option<f64>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub area_sq_ft: Option<f64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<i64>,
    pub amenities: Option<Vec<String>>,
    pub furnished: Option<String>,
    pub available_from: Option<String>,
    pub listed_by: Option<String>,
    pub tags: Option<Vec<String>>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: Option<bool>,
    pub listing_type: Option<String>,
}

const PROPERTY_COLUMNS: &str = "id, title, property_type, price, state, city, area_sq_ft, \
     bedrooms, bathrooms, amenities, furnished, available_from, listed_by, tags, color_theme, \
     rating, is_verified, listing_type, created_by, created_at_ns, updated_at_ns";

/// The property column list qualified with a table alias, for joins.
pub(crate) fn qualified_columns(alias: &str) -> String {
    PROPERTY_COLUMNS
        .split(", ")
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_set(values: &Option<Vec<String>>) -> Option<String> {
    values.as_ref().map(|v| v.join("|"))
}

impl Database {
    pub async fn create_property(&self, input: &PropertyInput, created_by: i64) -> Result<Property> {
        let title = input
            .title
            .as_deref()
            .ok_or_else(|| anyhow!("title is required"))?;
        let now = now_ns();

        let done = sqlx::query(
            "INSERT INTO properties (title, property_type, price, state, city, area_sq_ft, \
             bedrooms, bathrooms, amenities, furnished, available_from, listed_by, tags, \
             color_theme, rating, is_verified, listing_type, created_by, created_at_ns, \
             updated_at_ns) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(&input.property_type)
        .bind(input.price)
        .bind(&input.state)
        .bind(&input.city)
        .bind(input.area_sq_ft)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(join_set(&input.amenities))
        .bind(&input.furnished)
        .bind(&input.available_from)
        .bind(&input.listed_by)
        .bind(join_set(&input.tags))
        .bind(&input.color_theme)
        .bind(input.rating)
        .bind(input.is_verified.unwrap_or(false))
        .bind(&input.listing_type)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_property(done.last_insert_rowid())
            .await?
            .ok_or_else(|| anyhow!("property vanished after insert"))
    }

    pub async fn get_property(&self, id: i64) -> Result<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {} FROM properties WHERE id = ?",
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    /// Partial update: absent fields keep their current values.
    pub async fn update_property(&self, id: i64, input: &PropertyInput) -> Result<Option<Property>> {
        sqlx::query(
            "UPDATE properties SET \
             title = COALESCE(?, title), \
             property_type = COALESCE(?, property_type), \
             price = COALESCE(?, price), \
             state = COALESCE(?, state), \
             city = COALESCE(?, city), \
             area_sq_ft = COALESCE(?, area_sq_ft), \
             bedrooms = COALESCE(?, bedrooms), \
             bathrooms = COALESCE(?, bathrooms), \
             amenities = COALESCE(?, amenities), \
             furnished = COALESCE(?, furnished), \
             available_from = COALESCE(?, available_from), \
             listed_by = COALESCE(?, listed_by), \
             tags = COALESCE(?, tags), \
             color_theme = COALESCE(?, color_theme), \
             rating = COALESCE(?, rating), \
             is_verified = COALESCE(?, is_verified), \
             listing_type = COALESCE(?, listing_type), \
             updated_at_ns = ? \
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.property_type)
        .bind(input.price)
        .bind(&input.state)
        .bind(&input.city)
        .bind(input.area_sq_ft)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(join_set(&input.amenities))
        .bind(&input.furnished)
        .bind(&input.available_from)
        .bind(&input.listed_by)
        .bind(join_set(&input.tags))
        .bind(&input.color_theme)
        .bind(input.rating)
        .bind(input.is_verified)
        .bind(&input.listing_type)
        .bind(now_ns())
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_property(id).await
    }

    pub async fn delete_property(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM properties WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PropertyStore for Database {
    async fn query_properties(
        &self,
        predicates: &PredicateMap,
        favorites_of: Option<i64>,
    ) -> Result<Vec<Property>> {
        let (where_sql, binds) = build_where(predicates);

        let mut conditions = Vec::new();
        if !where_sql.is_empty() {
            conditions.push(where_sql);
        }
        if favorites_of.is_some() {
            conditions
                .push("id IN (SELECT property_id FROM favorites WHERE user_id = ?)".to_string());
        }

        let mut sql = format!("SELECT {} FROM properties", PROPERTY_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY id");

        let mut query = sqlx::query_as::<_, Property>(&sql);
        for bind in binds {
            query = match bind {
                SqlValue::Text(v) => query.bind(v),
                SqlValue::Integer(v) => query.bind(v),
                SqlValue::Real(v) => query.bind(v),
            };
        }
        if let Some(user_id) = favorites_of {
            query = query.bind(user_id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }
}
