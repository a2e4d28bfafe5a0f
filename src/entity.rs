//! Persisted user row and the audit timestamps every table carries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Table holding [`User`] rows.
pub const USERS_TABLE: &str = "users";

/// Creation and last-mutation timestamps, embedded by value in each entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromRow)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuditFields {
    pub fn new(now: DateTime<Utc>) -> Self {
        AuditFields {
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves `updated_at` forward. Never goes backwards and never stays put, even if the clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let floor = self.updated_at + chrono::Duration::microseconds(1);
        self.updated_at = now.max(floor);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[sqlx(flatten)]
    pub audit: AuditFields,
}
