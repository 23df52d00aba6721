//! Card REST API Routes
//!
//! Axum route handlers for card CRUD and the card move operation. A move
//! relocates a card within its column or into another column on the same
//! board; either way both columns come out of the transaction dense.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use corkboard_core::{BoardId, ColumnId};

use crate::{
    auth::AuthExtractor,
    db_helpers::{board_or_not_found, card_or_not_found, column_or_not_found, require_board_access},
    error::{ApiError, ApiResult},
    state::AppState,
    types::{CreateCardRequest, ListCardsResponse, MoveCardRequest, UpdateCardRequest},
    validation::{HasUpdates, ValidateNonEmpty, ValidateRange},
};

/// Query parameters for listing cards.
#[derive(Debug, Clone, Deserialize)]
pub struct ListCardsParams {
    /// Column whose cards to list
    pub column_id: ColumnId,
}

/// Query parameters for searching cards.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchCardsParams {
    /// Board to search within
    pub board_id: BoardId,
    /// Substring to match against card titles and descriptions
    pub q: String,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/cards - Create a new card at the end of a column
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/cards",
    tag = "Cards",
    request_body = CreateCardRequest,
    responses(
        (status = 201, description = "Card created successfully", body = corkboard_core::Card),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn create_card(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CreateCardRequest>,
) -> ApiResult<impl IntoResponse> {
    req.title.validate_non_empty("title")?;

    let column = column_or_not_found(&state.db, req.column_id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    let card = state.db.card_create(&req).await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/v1/cards?column_id= - List a column's cards in position order
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/cards",
    tag = "Cards",
    params(
        ("column_id" = Uuid, Query, description = "Column whose cards to list")
    ),
    responses(
        (status = 200, description = "Cards in position order", body = ListCardsResponse),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn list_cards(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Query(params): Query<ListCardsParams>,
) -> ApiResult<impl IntoResponse> {
    let column = column_or_not_found(&state.db, params.column_id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    let cards = state.db.card_list_by_column(params.column_id).await?;
    let total = cards.len() as i32;

    Ok(Json(ListCardsResponse { cards, total }))
}

/// GET /api/v1/cards/{id} - Get card by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    params(
        ("id" = Uuid, Path, description = "Card ID")
    ),
    responses(
        (status = 200, description = "Card details", body = corkboard_core::Card),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Card not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn get_card(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let card = card_or_not_found(&state.db, id).await?;
    let column = column_or_not_found(&state.db, card.column_id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    Ok(Json(card))
}

/// PATCH /api/v1/cards/{id} - Update card attributes
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    params(
        ("id" = Uuid, Path, description = "Card ID")
    ),
    request_body = UpdateCardRequest,
    responses(
        (status = 200, description = "Card updated successfully", body = corkboard_core::Card),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Card not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn update_card(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCardRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate_has_updates()?;
    if let Some(ref title) = req.title {
        title.validate_non_empty("title")?;
    }

    let card = card_or_not_found(&state.db, id).await?;
    let column = column_or_not_found(&state.db, card.column_id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    let card = state.db.card_update(id, &req).await?;
    Ok(Json(card))
}

/// DELETE /api/v1/cards/{id} - Delete a card
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/cards/{id}",
    tag = "Cards",
    params(
        ("id" = Uuid, Path, description = "Card ID")
    ),
    responses(
        (status = 204, description = "Card deleted successfully"),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Card not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn delete_card(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let card = card_or_not_found(&state.db, id).await?;
    let column = column_or_not_found(&state.db, card.column_id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    state.db.card_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/cards/search?board_id=&q= - Search a board's cards
///
/// Case-insensitive substring match against card titles and descriptions,
/// scoped to one board. Results come back in board order.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/cards/search",
    tag = "Cards",
    params(
        ("board_id" = Uuid, Query, description = "Board to search within"),
        ("q" = String, Query, description = "Substring to match against titles and descriptions")
    ),
    responses(
        (status = 200, description = "Matching cards in board order", body = ListCardsResponse),
        (status = 400, description = "Missing search query", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn search_cards(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Query(params): Query<SearchCardsParams>,
) -> ApiResult<impl IntoResponse> {
    params.q.validate_non_empty("q")?;

    board_or_not_found(&state.db, params.board_id).await?;
    require_board_access(&state.db, params.board_id, &auth).await?;

    let cards = state.db.card_search(params.board_id, &params.q).await?;
    let total = cards.len() as i32;

    Ok(Json(ListCardsResponse { cards, total }))
}

/// POST /api/v1/cards/{id}/move - Move a card
///
/// Moves within the current column or into another column of the same board.
/// Positions past the end of the destination are clamped to the last valid
/// slot; cross-board targets are rejected.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/cards/{id}/move",
    tag = "Cards",
    params(
        ("id" = Uuid, Path, description = "Card ID")
    ),
    request_body = MoveCardRequest,
    responses(
        (status = 200, description = "Card moved successfully", body = corkboard_core::Card),
        (status = 400, description = "Invalid move", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Card or column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Concurrent modification", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn move_card(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveCardRequest>,
) -> ApiResult<impl IntoResponse> {
    req.position.validate_non_negative("position")?;

    let card = card_or_not_found(&state.db, id).await?;
    let source_column = column_or_not_found(&state.db, card.column_id).await?;
    require_board_access(&state.db, source_column.board_id, &auth).await?;

    // The target must exist and sit on the same board; the transaction
    // re-checks this under lock, but failing early gives a cleaner error.
    let target_column = column_or_not_found(&state.db, req.column_id).await?;
    if target_column.board_id != source_column.board_id {
        return Err(ApiError::invalid_move(format!(
            "card {} cannot move to a column on another board",
            id
        )));
    }

    let card = state.db.card_move(id, req.column_id, req.position).await?;
    Ok(Json(card))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the card routes router.
pub fn create_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_card))
        .route("/", axum::routing::get(list_cards))
        .route("/search", axum::routing::get(search_cards))
        .route("/:id", axum::routing::get(get_card))
        .route("/:id", axum::routing::patch(update_card))
        .route("/:id", axum::routing::delete(delete_card))
        .route("/:id/move", axum::routing::post(move_card))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_card_request_validation() {
        let req = CreateCardRequest {
            column_id: Uuid::nil(),
            title: "".to_string(),
            description: None,
        };
        assert!(req.title.validate_non_empty("title").is_err());
    }

    #[test]
    fn test_move_card_request_validation() {
        let req = MoveCardRequest {
            column_id: Uuid::nil(),
            position: -1,
        };
        assert!(req.position.validate_non_negative("position").is_err());

        let req = MoveCardRequest {
            column_id: Uuid::nil(),
            position: 0,
        };
        assert!(req.position.validate_non_negative("position").is_ok());
    }

    #[test]
    fn test_search_params_require_a_query() {
        let params = SearchCardsParams {
            board_id: Uuid::nil(),
            q: "  ".to_string(),
        };
        assert!(params.q.validate_non_empty("q").is_err());

        let params = SearchCardsParams {
            board_id: Uuid::nil(),
            q: "release".to_string(),
        };
        assert!(params.q.validate_non_empty("q").is_ok());
    }

    #[test]
    fn test_update_card_request_requires_a_field() {
        let req = UpdateCardRequest {
            title: None,
            description: None,
        };
        assert!(req.validate_has_updates().is_err());
    }
}
