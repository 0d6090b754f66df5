//! Translates a compiled predicate mapping into a SQL `WHERE` fragment plus
//! bind values for the `properties` table.
//!
//! Field names arriving from the query string are mapped to columns through
//! an allowlist. Anything the allowlist does not know, and any range with a
//! `NaN` bound, compiles to a clause that matches no rows (`0 = 1`) rather
//! than an error: a filter on a field that does not exist matches nothing,
//! same as the document store this schema replaced.

use super::types::{Predicate, PredicateMap};
use std::collections::HashMap;

/// A value to bind into the assembled query, typed per the target column.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldType {
    Text,
    Int,
    Float,
    Bool,
    /// `|`-separated string set stored as text, matched with LIKE.
    Csv,
}

#[derive(Debug, Clone, Copy)]
struct FieldConfig {
    column: &'static str,
    field_type: FieldType,
}

impl FieldConfig {
    const fn new(column: &'static str, field_type: FieldType) -> Self {
        Self { column, field_type }
    }
}

/// Allowlist mapping query-string field names to database columns.
fn field_allowlist() -> HashMap<&'static str, FieldConfig> {
    let mut map = HashMap::new();
    map.insert("id", FieldConfig::new("id", FieldType::Int));
    map.insert("title", FieldConfig::new("title", FieldType::Text));
    map.insert("type", FieldConfig::new("property_type", FieldType::Text));
    map.insert("price", FieldConfig::new("price", FieldType::Float));
    map.insert("state", FieldConfig::new("state", FieldType::Text));
    map.insert("city", FieldConfig::new("city", FieldType::Text));
    map.insert("areaSqFt", FieldConfig::new("area_sq_ft", FieldType::Float));
    map.insert("bedrooms", FieldConfig::new("bedrooms", FieldType::Int));
    map.insert("bathrooms", FieldConfig::new("bathrooms", FieldType::Int));
    map.insert("amenities", FieldConfig::new("amenities", FieldType::Csv));
    map.insert("furnished", FieldConfig::new("furnished", FieldType::Text));
    map.insert(
        "availableFrom",
        FieldConfig::new("available_from", FieldType::Text),
    );
    map.insert("listedBy", FieldConfig::new("listed_by", FieldType::Text));
    map.insert("tags", FieldConfig::new("tags", FieldType::Csv));
    map.insert(
        "colorTheme",
        FieldConfig::new("color_theme", FieldType::Text),
    );
    map.insert("rating", FieldConfig::new("rating", FieldType::Float));
    map.insert(
        "isVerified",
        FieldConfig::new("is_verified", FieldType::Bool),
    );
    map.insert(
        "listingType",
        FieldConfig::new("listing_type", FieldType::Text),
    );
    map.insert("createdBy", FieldConfig::new("created_by", FieldType::Int));
    map
}

/// Clause used when a predicate cannot match any row.
const NEVER_MATCH: &str = "0 = 1";

/// Build the `WHERE` fragment (without the keyword) and bind values for a
/// predicate mapping. Empty input yields an empty string. Infallible.
pub fn build_where(predicates: &PredicateMap) -> (String, Vec<SqlValue>) {
    let allowlist = field_allowlist();
    let mut clauses = Vec::new();
    let mut binds = Vec::new();

    for (field, predicate) in predicates {
        match allowlist.get(field.as_str()) {
            Some(config) => build_predicate(config, predicate, &mut clauses, &mut binds),
            None => clauses.push(NEVER_MATCH.to_string()),
        }
    }

    (clauses.join(" AND "), binds)
}

fn build_predicate(
    config: &FieldConfig,
    predicate: &Predicate,
    clauses: &mut Vec<String>,
    binds: &mut Vec<SqlValue>,
) {
    match predicate {
        Predicate::Eq(value) => match equality_bind(config.field_type, value) {
            Some(SqlValue::Text(v)) if config.field_type == FieldType::Csv => {
                clauses.push(format!("{} LIKE ?", config.column));
                binds.push(SqlValue::Text(format!("%{}%", v)));
            }
            Some(bind) => {
                clauses.push(format!("{} = ?", config.column));
                binds.push(bind);
            }
            // Unconvertible value for a typed column matches nothing.
            None => clauses.push(NEVER_MATCH.to_string()),
        },
        Predicate::Range(bounds) => {
            if bounds.has_nan_bound() {
                clauses.push(NEVER_MATCH.to_string());
                return;
            }
            let mut parts = Vec::new();
            for (op, bound) in [
                (">", bounds.gt),
                (">=", bounds.gte),
                ("<", bounds.lt),
                ("<=", bounds.lte),
            ] {
                if let Some(n) = bound {
                    parts.push(format!("{} {} ?", config.column, op));
                    binds.push(SqlValue::Real(n));
                }
            }
            if parts.is_empty() {
                // Range with no bounds constrains nothing.
                return;
            }
            clauses.push(parts.join(" AND "));
        }
    }
}

/// Convert an equality value for the column's type. `None` means the value
/// can never equal anything in that column.
fn equality_bind(field_type: FieldType, value: &str) -> Option<SqlValue> {
    match field_type {
        FieldType::Text | FieldType::Csv => Some(SqlValue::Text(value.to_string())),
        FieldType::Int => value.parse::<i64>().ok().map(SqlValue::Integer),
        FieldType::Float => value.parse::<f64>().ok().map(SqlValue::Real),
        FieldType::Bool => {
            if value.eq_ignore_ascii_case("true") {
                Some(SqlValue::Integer(1))
            } else if value.eq_ignore_ascii_case("false") {
                Some(SqlValue::Integer(0))
            } else {
                None
            }
        }
    }
}
