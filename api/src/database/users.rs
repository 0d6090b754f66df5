use super::types::{now_ns, Database};
use anyhow::Result;

/// A registered account. `password_hash` never leaves this layer; handlers
/// only ever return tokens.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at_ns: i64,
}

impl Database {
    /// Create an account. `Ok(None)` means the email is already registered
    /// (unique-constraint violation), which the HTTP layer maps to 400.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>> {
        let created_at_ns = now_ns();
        let result = sqlx::query(
            "INSERT INTO users (name, email, password_hash, created_at_ns) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(created_at_ns)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Some(User {
                id: done.last_insert_rowid(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at_ns,
            })),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at_ns FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at_ns FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
