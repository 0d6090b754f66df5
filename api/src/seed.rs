//! Catalog seeding from a CSV export. Replaces the whole `properties` table;
//! seeded rows have no owner and can only be mutated through the database
//! directly.

use crate::database::Database;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedRecord {
    title: String,
    #[serde(rename = "type", default)]
    property_type: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    area_sq_ft: Option<f64>,
    #[serde(default)]
    bedrooms: Option<i64>,
    #[serde(default)]
    bathrooms: Option<i64>,
    /// Already `|`-separated in the dataset; stored as-is.
    #[serde(default)]
    amenities: Option<String>,
    #[serde(default)]
    furnished: Option<String>,
    #[serde(default)]
    available_from: Option<String>,
    #[serde(default)]
    listed_by: Option<String>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    color_theme: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    is_verified: Option<String>,
    #[serde(default)]
    listing_type: Option<String>,
}

pub async fn import_csv(db: &Database, path: &Path) -> Result<usize> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open seed file {}", path.display()))?;

    sqlx::query("DELETE FROM properties")
        .execute(&db.pool)
        .await?;

    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let mut count = 0usize;
    for record in reader.deserialize::<SeedRecord>() {
        let record = record.context("malformed seed row")?;
        sqlx::query(
            "INSERT INTO properties (title, property_type, price, state, city, area_sq_ft, \
             bedrooms, bathrooms, amenities, furnished, available_from, listed_by, tags, \
             color_theme, rating, is_verified, listing_type, created_by, created_at_ns, \
             updated_at_ns) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)",
        )
        .bind(&record.title)
        .bind(&record.property_type)
        .bind(record.price)
        .bind(&record.state)
        .bind(&record.city)
        .bind(record.area_sq_ft)
        .bind(record.bedrooms)
        .bind(record.bathrooms)
        .bind(&record.amenities)
        .bind(&record.furnished)
        .bind(&record.available_from)
        .bind(&record.listed_by)
        .bind(&record.tags)
        .bind(&record.color_theme)
        .bind(record.rating)
        .bind(record.is_verified.as_deref() == Some("true"))
        .bind(&record.listing_type)
        .bind(now)
        .bind(now)
        .execute(&db.pool)
        .await?;
        count += 1;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_helpers::setup_test_db;
    use crate::search::{compile, PropertyStore};
    use std::io::Write;

    #[tokio::test]
    async fn imports_rows_and_replaces_previous_catalog() {
        let db = setup_test_db().await;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "title,type,price,state,city,areaSqFt,bedrooms,bathrooms,amenities,tags,isVerified"
        )
        .unwrap();
        writeln!(
            file,
            "Sunny flat,Apartment,250,CA,Fresno,900,2,1,gym|pool,budget,true"
        )
        .unwrap();
        writeln!(
            file,
            "Lake house,Villa,900,CA,Tahoe,2400,4,3,lake-view,luxury,false"
        )
        .unwrap();
        file.flush().unwrap();

        let count = import_csv(&db, file.path()).await.unwrap();
        assert_eq!(count, 2);

        let all = db.query_properties(&compile(&[]), None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Sunny flat");
        assert!(all[0].is_verified);
        assert_eq!(all[0].amenities.as_deref(), Some("gym|pool"));
        assert!(!all[1].is_verified);

        // Re-importing replaces, not appends.
        let count = import_csv(&db, file.path()).await.unwrap();
        assert_eq!(count, 2);
        let all = db.query_properties(&compile(&[]), None).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
