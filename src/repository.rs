//! Data access: one [`UserSession`] per request over a pooled PostgreSQL connection.
//!
//! A session owns its connection. Dropping the session hands the connection back to the
//! pool, so it is released on every exit path of the handler holding it.

use crate::entity::{User, USERS_TABLE};
use crate::error::AppError;
use crate::schema::UserDraft;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};

const USER_COLUMNS: &str = "id, name, email, created_at, updated_at";
const EMAIL_TAKEN: &str = "email already registered";

/// Offset/limit window over users ordered by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

/// Source of request-scoped sessions.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Acquire a session for one request.
    async fn session(&self) -> Result<Box<dyn UserSession>, AppError>;

    /// Round-trip to storage without touching user rows.
    async fn ping(&self) -> Result<(), AppError>;
}

/// CRUD over the users table. Each write is a single atomic statement.
#[async_trait]
pub trait UserSession: Send {
    /// Persist a new user. Duplicate email yields [`AppError::Conflict`].
    async fn insert(&mut self, draft: &UserDraft) -> Result<User, AppError>;

    /// Users in id order, at most `page.limit` of them starting at `page.offset`.
    async fn list(&mut self, page: Page) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError>;

    /// Overwrite name and email and refresh `updated_at`. `None` if the id does not exist.
    async fn update(&mut self, id: i64, draft: &UserDraft) -> Result<Option<User>, AppError>;

    /// Remove the row. `false` if the id does not exist.
    async fn delete(&mut self, id: i64) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn session(&self) -> Result<Box<dyn UserSession>, AppError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgUserSession { conn }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

pub struct PgUserSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl UserSession for PgUserSession {
    async fn insert(&mut self, draft: &UserDraft) -> Result<User, AppError> {
        let sql = format!(
            "INSERT INTO {} (name, email) VALUES ($1, $2) RETURNING {}",
            USERS_TABLE, USER_COLUMNS
        );
        tracing::debug!(sql = %sql, "insert user");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&draft.name)
            .bind(&draft.email)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| AppError::from_write(e, EMAIL_TAKEN))?;
        Ok(user)
    }

    async fn list(&mut self, page: Page) -> Result<Vec<User>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS, USERS_TABLE
        );
        tracing::debug!(sql = %sql, offset = page.offset, limit = page.limit, "list users");
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(users)
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", USER_COLUMNS, USERS_TABLE);
        tracing::debug!(sql = %sql, id, "find user");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(user)
    }

    async fn update(&mut self, id: i64, draft: &UserDraft) -> Result<Option<User>, AppError> {
        // updated_at must advance even when NOW() repeats within one clock tick.
        let sql = format!(
            "UPDATE {} SET name = $1, email = $2, \
             updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond') \
             WHERE id = $3 RETURNING {}",
            USERS_TABLE, USER_COLUMNS
        );
        tracing::debug!(sql = %sql, id, "update user");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(|e| AppError::from_write(e, EMAIL_TAKEN))?;
        Ok(user)
    }

    async fn delete(&mut self, id: i64) -> Result<bool, AppError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", USERS_TABLE);
        tracing::debug!(sql = %sql, id, "delete user");
        let result = sqlx::query(&sql).bind(id).execute(&mut *self.conn).await?;
        Ok(result.rows_affected() > 0)
    }
}
