//! Shared application state for Axum routers.

use crate::db::DbClient;

/// Application-wide state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Database client backed by the connection pool.
    pub db: DbClient,
}

impl AppState {
    pub fn new(db: DbClient) -> Self {
        Self { db }
    }
}
