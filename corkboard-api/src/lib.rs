//! Corkboard API - REST API Layer
//!
//! REST endpoints (Axum) over PostgreSQL for the Corkboard board backend.
//! Boards own ordered columns, columns own ordered cards; the positional
//! operations keep sibling positions dense (`{0, .., n-1}`) through every
//! create, delete, move, and reorder.

pub mod auth;
pub mod config;
pub mod db;
pub mod db_helpers;
pub mod error;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod routes;
pub mod state;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use auth::{auth_middleware, AuthContext, AuthExtractor, SESSION_COOKIE};
pub use config::ApiConfig;
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
#[cfg(feature = "openapi")]
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use state::AppState;
pub use types::*;
