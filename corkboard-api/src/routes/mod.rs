//! REST API Routes Module
//!
//! All REST route handlers organized by entity type:
//! - Board, column, and card CRUD plus the positional operations
//! - Health check endpoints (Kubernetes-compatible)
//! - CORS support for browser-based clients
//! - OpenAPI spec at /openapi.json (behind the `openapi` feature)

pub mod board;
pub mod card;
pub mod column;
pub mod health;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::auth::auth_middleware;
use crate::config::ApiConfig;
use crate::state::AppState;

// Re-export route creation functions for convenience
pub use board::create_router as board_router;
pub use card::create_router as card_router;
pub use column::create_router as column_router;
pub use health::create_router as health_router;

// ============================================================================
// OPENAPI ENDPOINT
// ============================================================================

/// Handler for /openapi.json endpoint.
#[cfg(feature = "openapi")]
async fn openapi_json() -> impl axum::response::IntoResponse {
    use utoipa::OpenApi;

    axum::Json(crate::openapi::ApiDoc::openapi())
}

// ============================================================================
// ROUTER ASSEMBLY
// ============================================================================

/// Build the entity CRUD routes (require authentication).
fn build_entity_routes(state: &AppState) -> Router {
    Router::new()
        .nest("/boards", board::create_router(state.clone()))
        .nest("/columns", column::create_router(state.clone()))
        .nest("/cards", card::create_router(state.clone()))
}

/// Create the complete API router.
///
/// - All /api/v1/* routes require a valid session cookie
/// - Health checks at /health/* are public
/// - OpenAPI spec at /openapi.json is public (when the `openapi` feature is on)
/// - CORS is configured from [`ApiConfig`]
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    let api_routes =
        build_entity_routes(&state).layer(from_fn_with_state(state.clone(), auth_middleware));

    let cors = build_cors_layer(api_config);

    let router = Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health::create_router(state.db.clone()));

    #[cfg(feature = "openapi")]
    let router = router.route("/openapi.json", axum::routing::get(openapi_json));

    router.layer(cors)
}

// ============================================================================
// CORS LAYER
// ============================================================================

/// Build the CORS layer from ApiConfig.
///
/// In development mode (empty origins), allows all origins.
/// In production mode, only allows configured origins.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        // Development mode: allow all origins
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any).allow_headers(Any)
    } else {
        // Production mode: only allow configured origins
        tracing::info!(
            "CORS: Production mode - allowing origins: {:?}",
            config.cors_origins
        );
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        if config.cors_allow_credentials {
            cors.allow_origin(origins).allow_credentials(true)
        } else {
            cors.allow_origin(origins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_dev_mode_builds() {
        let config = ApiConfig::default();
        let _layer = build_cors_layer(&config);
    }

    #[test]
    fn test_cors_layer_production_builds() {
        let config = ApiConfig {
            cors_origins: vec!["https://corkboard.app".to_string()],
            cors_allow_credentials: true,
            cors_max_age_secs: 600,
        };
        let _layer = build_cors_layer(&config);
    }
}
