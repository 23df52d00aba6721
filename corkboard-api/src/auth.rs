//! Session Authentication
//!
//! Cookie-based session authentication. The `corkboard_session` cookie
//! carries an opaque session key that is resolved against the sessions table
//! on every request. The middleware injects an [`AuthContext`] into request
//! extensions; handlers pull it out through the [`AuthExtractor`].

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use corkboard_core::MemberId;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "corkboard_session";

// ============================================================================
// AUTH CONTEXT
// ============================================================================

/// Authenticated caller identity, resolved from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Member the session belongs to
    pub member_id: MemberId,
}

// ============================================================================
// COOKIE PARSING
// ============================================================================

/// Pull the session key out of a `Cookie` header value.
///
/// Returns `None` when the header carries no non-empty session cookie.
pub fn session_key_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

// ============================================================================
// MIDDLEWARE
// ============================================================================

/// Axum middleware for session authentication.
///
/// Resolves the session cookie against the database and injects
/// [`AuthContext`] into request extensions. Returns 401 when the cookie is
/// missing or the session is unknown or expired.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session_key = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(session_key_from_cookie_header)
        .ok_or_else(|| ApiError::unauthorized("Authentication required: no session cookie"))?
        .to_string();

    let member_id = state
        .db
        .session_member(&session_key)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Session is invalid or expired"))?;

    request.extensions_mut().insert(AuthContext { member_id });

    Ok(next.run(request).await)
}

// ============================================================================
// TYPED EXTRACTOR
// ============================================================================

/// Typed Axum extractor for the authentication context.
///
/// Requires `auth_middleware` on the route; without it the extractor returns
/// a 500 rather than silently treating the request as anonymous.
#[derive(Debug, Clone)]
pub struct AuthExtractor(pub AuthContext);

#[async_trait]
impl<S> FromRequestParts<S> for AuthExtractor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthExtractor)
            .ok_or_else(|| {
                ApiError::internal_error(
                    "AuthContext not found in request extensions. \
                     Ensure auth_middleware is applied to this route.",
                )
            })
    }
}

impl std::ops::Deref for AuthExtractor {
    type Target = AuthContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
