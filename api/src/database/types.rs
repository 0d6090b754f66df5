use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

/// Wall-clock timestamp in nanoseconds, the unit used for every
/// `*_at_ns` column.
pub(crate) fn now_ns() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}
