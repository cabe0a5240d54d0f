use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{error, warn};

use super::{
    errors::UserError,
    password::hash_password,
    repo_types::{NewUser, User},
};

/// Persistence operations on `User` records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users ordered by last name.
    async fn get_all(&self) -> Result<Vec<User>, UserError>;
    async fn get_by_email(&self, email: &str) -> Result<User, UserError>;
    async fn get_one(&self, id: i32) -> Result<User, UserError>;
    /// Hashes the plaintext password and stores the row; returns the new id.
    async fn insert(&self, user: &NewUser) -> Result<i32, UserError>;
    /// Persists email, names and the active flag, stamping `updated_at`.
    async fn update(&self, user: &User) -> Result<(), UserError>;
    async fn reset_password(&self, id: i32, password: &str) -> Result<(), UserError>;
    /// Deleting an id that does not exist is `NotFound`.
    async fn delete(&self, id: i32) -> Result<(), UserError>;
}

/// Postgres-backed store. Each call runs under its own deadline.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn deadline<T, F>(&self, op: &'static str, fut: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => {
                error!(op, error = %e, "user query failed");
                Err(UserError::Query(e))
            }
            Err(_) => {
                warn!(op, timeout_ms = self.timeout.as_millis() as u64, "user query timed out");
                Err(UserError::Timeout(self.timeout))
            }
        }
    }
}

fn hash(plain: &str) -> Result<String, UserError> {
    hash_password(plain).map_err(|e| UserError::Hash(e.to_string()))
}

fn affected_one(rows: u64) -> Result<(), UserError> {
    if rows == 0 {
        Err(UserError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    async fn get_all(&self) -> Result<Vec<User>, UserError> {
        let q = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, password, user_active, created_at, updated_at
            FROM users
            ORDER BY last_name
            "#,
        )
        .fetch_all(&self.pool);
        self.deadline("get_all", q).await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, UserError> {
        let q = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, password, user_active, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool);
        self.deadline("get_by_email", q)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn get_one(&self, id: i32) -> Result<User, UserError> {
        let q = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, password, user_active, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool);
        self.deadline("get_one", q).await?.ok_or(UserError::NotFound)
    }

    async fn insert(&self, user: &NewUser) -> Result<i32, UserError> {
        let password_hash = hash(&user.password)?;
        let now = OffsetDateTime::now_utc();
        let q = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO users (email, first_name, last_name, password, user_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(password_hash)
        .bind(user.active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool);
        self.deadline("insert", q).await
    }

    async fn update(&self, user: &User) -> Result<(), UserError> {
        let q = sqlx::query(
            r#"
            UPDATE users
            SET email = $1, first_name = $2, last_name = $3, user_active = $4, updated_at = $5
            WHERE id = $6
            "#,
        )
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.active)
        .bind(OffsetDateTime::now_utc())
        .bind(user.id)
        .execute(&self.pool);
        let res = self.deadline("update", q).await?;
        affected_one(res.rows_affected())
    }

    async fn reset_password(&self, id: i32, password: &str) -> Result<(), UserError> {
        let password_hash = hash(password)?;
        let q = sqlx::query(r#"UPDATE users SET password = $1, updated_at = $2 WHERE id = $3"#)
            .bind(password_hash)
            .bind(OffsetDateTime::now_utc())
            .bind(id)
            .execute(&self.pool);
        let res = self.deadline("reset_password", q).await?;
        affected_one(res.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<(), UserError> {
        let q = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool);
        let res = self.deadline("delete", q).await?;
        affected_one(res.rows_affected())
    }
}
