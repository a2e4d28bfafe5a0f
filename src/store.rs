//! Startup DDL: create the target database and the `users` table if they are missing.

use crate::entity::USERS_TABLE;
use crate::error::{AppError, ConfigError};
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Create the `users` table, its email uniqueness constraint and the name index. Idempotent.
pub async fn ensure_users_table(pool: &PgPool) -> Result<(), AppError> {
    let table = quote_ident(USERS_TABLE);
    let ddl = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_key UNIQUE (email),
            CONSTRAINT users_updated_after_created CHECK (updated_at >= created_at)
        )
        "#,
        table
    );
    sqlx::query(&ddl).execute(pool).await?;
    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS users_name_idx ON {} (name)",
        table
    ))
    .execute(pool)
    .await?;
    tracing::info!(table = USERS_TABLE, "table ready");
    Ok(())
}

/// Connect to the server's `postgres` database and create the one named in `database_url` if absent.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let Some((admin, db_name)) = admin_target(database_url)? else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

/// Options for the maintenance `postgres` database plus the target database name.
/// `None` when the URL names no database or names `postgres` itself.
fn admin_target(database_url: &str) -> Result<Option<(PgConnectOptions, String)>, AppError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|_| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: database_url.to_string(),
    })?;
    let db_name = match opts.get_database() {
        Some(name) if !name.is_empty() && name != "postgres" => name.to_string(),
        _ => return Ok(None),
    };
    Ok(Some((opts.database("postgres"), db_name)))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str) -> Option<(PgConnectOptions, String)> {
        admin_target(url).unwrap()
    }

    #[test]
    fn admin_connection_targets_postgres_on_same_server() {
        let (admin, name) = target("postgres://app:secret@db:5432/users").unwrap();
        assert_eq!(name, "users");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db");
        assert_eq!(admin.get_port(), 5432);
        assert_eq!(admin.get_username(), "app");
    }

    #[test]
    fn url_without_database_has_nothing_to_create() {
        assert!(target("postgres://app:secret@db:5432").is_none());
        assert!(target("postgres://app:secret@db:5432/").is_none());
        assert!(target("postgres://db/postgres").is_none());
    }

    #[test]
    fn slashes_in_query_string_do_not_leak_into_database_name() {
        let (admin, name) = target("postgres://db/users?sslrootcert=/etc/ssl/ca.pem").unwrap();
        assert_eq!(name, "users");
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "db");
    }

    #[test]
    fn rejects_unparsable_url() {
        assert!(matches!(
            admin_target("not a url"),
            Err(AppError::Config(ConfigError::Invalid { key: "DATABASE_URL", .. }))
        ));
    }

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
