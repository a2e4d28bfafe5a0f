//! In-memory [`UserStore`] for router and handler tests.

use crate::entity::{AuditFields, User};
use crate::error::AppError;
use crate::repository::{Page, UserSession, UserStore};
use crate::routes::app;
use crate::schema::UserDraft;
use crate::state::AppState;
use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Rows {
    last_id: i64,
    users: Vec<User>,
}

/// Mirrors the PostgreSQL table: ids from 1, never reused; unique email; id order.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<Mutex<Rows>>,
    open_sessions: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions acquired and not yet dropped.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().users.len()
    }

    pub fn get(&self, id: i64) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Make `session()` and `ping()` fail as if the pool could not reach the server.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn session(&self) -> Result<Box<dyn UserSession>, AppError> {
        self.check_available()?;
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            rows: Arc::clone(&self.rows),
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

struct MemorySession {
    rows: Arc<Mutex<Rows>>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

fn email_taken() -> AppError {
    AppError::Conflict("email already registered".into())
}

#[async_trait]
impl UserSession for MemorySession {
    async fn insert(&mut self, draft: &UserDraft) -> Result<User, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.users.iter().any(|u| u.email == draft.email) {
            return Err(email_taken());
        }
        rows.last_id += 1;
        let user = User {
            id: rows.last_id,
            name: draft.name.clone(),
            email: draft.email.clone(),
            audit: AuditFields::new(Utc::now()),
        };
        rows.users.push(user.clone());
        Ok(user)
    }

    async fn list(&mut self, page: Page) -> Result<Vec<User>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .users
            .iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&mut self, id: i64) -> Result<Option<User>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update(&mut self, id: i64, draft: &UserDraft) -> Result<Option<User>, AppError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.users.iter().any(|u| u.id == id) {
            return Ok(None);
        }
        if rows.users.iter().any(|u| u.id != id && u.email == draft.email) {
            return Err(email_taken());
        }
        let Some(user) = rows.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.name = draft.name.clone();
        user.email = draft.email.clone();
        user.audit.touch(Utc::now());
        Ok(Some(user.clone()))
    }

    async fn delete(&mut self, id: i64) -> Result<bool, AppError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.users.len();
        rows.users.retain(|u| u.id != id);
        Ok(rows.users.len() < before)
    }
}

/// The full router over a fresh in-memory store.
pub fn test_app() -> (Router, MemoryUserStore) {
    let store = MemoryUserStore::new();
    let router = app(
        AppState::new(store.clone()),
        &["http://127.0.0.1:8000".to_string()],
    )
    .unwrap();
    (router, store)
}
