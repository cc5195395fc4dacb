//! Users repository for database operations

use std::collections::BTreeSet;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::User,
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by login (primary authentication method)
    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(login) = LOWER($1)")
                .bind(login)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Insert a new user with an already-hashed password
    pub async fn create(
        &self,
        login: &str,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Count all users
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Grant a capability to a user; granting twice is a no-op
    pub async fn grant_capability(&self, user_id: i32, capability: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_capabilities (user_id, capability)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(capability)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get the capability names granted to a user
    pub async fn get_capabilities(&self, user_id: i32) -> AppResult<BTreeSet<String>> {
        let capabilities: Vec<String> = sqlx::query_scalar(
            "SELECT capability FROM user_capabilities WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(capabilities.into_iter().collect())
    }
}
