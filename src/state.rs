//! Shared application state for all routes.

use crate::repository::UserStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Hands out one session per request; never shared between requests.
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(store: impl UserStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}
