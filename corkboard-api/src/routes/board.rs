//! Board REST API Routes
//!
//! Axum route handlers for board CRUD. The detail endpoint returns the full
//! board tree: columns in position order, each with its cards in position
//! order.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthExtractor,
    db_helpers::{board_or_not_found, require_board_access},
    error::{ApiError, ApiResult},
    state::AppState,
    types::{
        BoardDetailResponse, ColumnDetail, CreateBoardRequest, InviteMemberRequest,
        ListBoardsResponse, UpdateBoardRequest,
    },
    validation::{HasUpdates, ValidateNonEmpty},
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/boards - Create a new board
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/boards",
    tag = "Boards",
    request_body = CreateBoardRequest,
    responses(
        (status = 201, description = "Board created successfully", body = corkboard_core::Board),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn create_board(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CreateBoardRequest>,
) -> ApiResult<impl IntoResponse> {
    req.title.validate_non_empty("title")?;

    let board = state.db.board_create(auth.member_id, &req).await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// GET /api/v1/boards - List boards visible to the caller
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/boards",
    tag = "Boards",
    responses(
        (status = 200, description = "Boards owned by or shared with the caller", body = ListBoardsResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn list_boards(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
) -> ApiResult<impl IntoResponse> {
    let boards = state.db.board_list_by_member(auth.member_id).await?;
    let total = boards.len() as i32;

    Ok(Json(ListBoardsResponse { boards, total }))
}

/// GET /api/v1/boards/{id} - Get a board with its columns and cards
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/boards/{id}",
    tag = "Boards",
    params(
        ("id" = Uuid, Path, description = "Board ID")
    ),
    responses(
        (status = 200, description = "Board detail", body = BoardDetailResponse),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn get_board(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let board = board_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, id, &auth).await?;

    let columns = state.db.column_list_by_board(id).await?;
    let cards = state.db.board_cards(id).await?;

    // board_cards returns cards ordered by position within each column.
    let mut by_column: std::collections::HashMap<Uuid, Vec<corkboard_core::Card>> =
        std::collections::HashMap::new();
    for card in cards {
        by_column.entry(card.column_id).or_default().push(card);
    }

    let columns = columns
        .into_iter()
        .map(|column| ColumnDetail {
            cards: by_column.remove(&column.column_id).unwrap_or_default(),
            column,
        })
        .collect();

    Ok(Json(BoardDetailResponse { board, columns }))
}

/// PATCH /api/v1/boards/{id} - Update board attributes
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/api/v1/boards/{id}",
    tag = "Boards",
    params(
        ("id" = Uuid, Path, description = "Board ID")
    ),
    request_body = UpdateBoardRequest,
    responses(
        (status = 200, description = "Board updated successfully", body = corkboard_core::Board),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn update_board(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBoardRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate_has_updates()?;
    if let Some(ref title) = req.title {
        title.validate_non_empty("title")?;
    }

    board_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, id, &auth).await?;

    let board = state.db.board_update(id, &req).await?;
    Ok(Json(board))
}

/// DELETE /api/v1/boards/{id} - Delete a board and everything on it
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/boards/{id}",
    tag = "Boards",
    params(
        ("id" = Uuid, Path, description = "Board ID")
    ),
    responses(
        (status = 204, description = "Board deleted successfully"),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn delete_board(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let board = board_or_not_found(&state.db, id).await?;
    // Only the owner can delete a board; members only lose their access.
    if board.owner_id != auth.member_id {
        return Err(ApiError::forbidden("Only the board owner can delete it"));
    }

    state.db.board_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/boards/{id}/invite - Add a member to a board
///
/// Only the owner can invite. The invited member gets the `member` role;
/// inviting someone already on the board (the owner included) is rejected.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/boards/{id}/invite",
    tag = "Boards",
    params(
        ("id" = Uuid, Path, description = "Board ID")
    ),
    request_body = InviteMemberRequest,
    responses(
        (status = 201, description = "Member added to the board", body = corkboard_core::BoardMember),
        (status = 400, description = "Member already on the board", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board or member not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn invite_member(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<InviteMemberRequest>,
) -> ApiResult<impl IntoResponse> {
    let board = board_or_not_found(&state.db, id).await?;
    if board.owner_id != auth.member_id {
        return Err(ApiError::forbidden("Only the board owner can invite"));
    }

    if !state.db.member_exists(req.member_id).await? {
        return Err(ApiError::not_found(format!(
            "Member {} not found",
            req.member_id
        )));
    }

    let membership = state.db.board_member_add(id, req.member_id).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the board routes router.
pub fn create_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_board))
        .route("/", axum::routing::get(list_boards))
        .route("/:id", axum::routing::get(get_board))
        .route("/:id", axum::routing::patch(update_board))
        .route("/:id", axum::routing::delete(delete_board))
        .route("/:id/invite", axum::routing::post(invite_member))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_board_request_validation() {
        let req = CreateBoardRequest {
            title: "   ".to_string(),
            description: None,
        };
        assert!(req.title.validate_non_empty("title").is_err());

        let req = CreateBoardRequest {
            title: "Roadmap".to_string(),
            description: Some("Q3 planning".to_string()),
        };
        assert!(req.title.validate_non_empty("title").is_ok());
    }

    #[test]
    fn test_update_board_request_requires_a_field() {
        let req = UpdateBoardRequest {
            title: None,
            description: None,
        };
        assert!(req.validate_has_updates().is_err());
    }
}
