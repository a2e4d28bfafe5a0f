//! User service: CRUD over a single `users` table, served with axum and stored in PostgreSQL.

pub mod config;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod repository;
pub mod response;
pub mod routes;
pub mod schema;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;
#[cfg(test)]
mod tests;

pub use config::Settings;
pub use entity::{AuditFields, User};
pub use error::{AppError, ConfigError};
pub use repository::{Page, PgUserStore, UserSession, UserStore};
pub use routes::{app, common_routes, user_routes};
pub use schema::{CreateUserRequest, UpdateUserRequest, UserDraft, UserView};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_users_table};
