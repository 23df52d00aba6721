//! Column REST API Routes
//!
//! Axum route handlers for column CRUD plus the two positional operations:
//! bulk reorder of a board's columns, and moving a single column to a new
//! slot. Both run atomically against the database and keep the board's
//! column positions dense.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use corkboard_core::BoardId;

use crate::{
    auth::AuthExtractor,
    db_helpers::{board_or_not_found, column_or_not_found, require_board_access},
    error::{ApiError, ApiResult},
    state::AppState,
    types::{
        CreateColumnRequest, ListColumnsResponse, MoveColumnRequest, ReorderColumnsRequest,
        UpdateColumnRequest,
    },
    validation::{HasUpdates, ValidateNonEmpty, ValidateRange},
};

/// Query parameters for listing columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ListColumnsParams {
    /// Board whose columns to list
    pub board_id: BoardId,
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/columns - Create a new column at the end of a board
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/columns",
    tag = "Columns",
    request_body = CreateColumnRequest,
    responses(
        (status = 201, description = "Column created successfully", body = corkboard_core::Column),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn create_column(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CreateColumnRequest>,
) -> ApiResult<impl IntoResponse> {
    req.title.validate_non_empty("title")?;

    board_or_not_found(&state.db, req.board_id).await?;
    require_board_access(&state.db, req.board_id, &auth).await?;

    let column = state.db.column_create(&req).await?;

    Ok((StatusCode::CREATED, Json(column)))
}

/// GET /api/v1/columns?board_id= - List a board's columns in position order
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/columns",
    tag = "Columns",
    params(
        ("board_id" = Uuid, Query, description = "Board whose columns to list")
    ),
    responses(
        (status = 200, description = "Columns in position order", body = ListColumnsResponse),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn list_columns(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Query(params): Query<ListColumnsParams>,
) -> ApiResult<impl IntoResponse> {
    board_or_not_found(&state.db, params.board_id).await?;
    require_board_access(&state.db, params.board_id, &auth).await?;

    let columns = state.db.column_list_by_board(params.board_id).await?;
    let total = columns.len() as i32;

    Ok(Json(ListColumnsResponse { columns, total }))
}

/// GET /api/v1/columns/{id} - Get column by ID
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/api/v1/columns/{id}",
    tag = "Columns",
    params(
        ("id" = Uuid, Path, description = "Column ID")
    ),
    responses(
        (status = 200, description = "Column details", body = corkboard_core::Column),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn get_column(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let column = column_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    Ok(Json(column))
}

/// PATCH /api/v1/columns/{id} - Update column attributes
#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/api/v1/columns/{id}",
    tag = "Columns",
    params(
        ("id" = Uuid, Path, description = "Column ID")
    ),
    request_body = UpdateColumnRequest,
    responses(
        (status = 200, description = "Column updated successfully", body = corkboard_core::Column),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn update_column(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateColumnRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate_has_updates()?;
    if let Some(ref title) = req.title {
        title.validate_non_empty("title")?;
    }

    let column = column_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    let column = state.db.column_update(id, &req).await?;
    Ok(Json(column))
}

/// DELETE /api/v1/columns/{id} - Delete a column and its cards
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/api/v1/columns/{id}",
    tag = "Columns",
    params(
        ("id" = Uuid, Path, description = "Column ID")
    ),
    responses(
        (status = 204, description = "Column deleted successfully"),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn delete_column(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let column = column_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    state.db.column_delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/columns/reorder - Reorder all columns of a board
///
/// The request must assign every column of the board a distinct position in
/// `0..n-1`. The operation is atomic: either every column lands on its new
/// slot, or nothing changes.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/columns/reorder",
    tag = "Columns",
    request_body = ReorderColumnsRequest,
    responses(
        (status = 200, description = "Columns in their new order", body = ListColumnsResponse),
        (status = 400, description = "Assignments are not a valid permutation", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Board or column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Concurrent modification", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn reorder_columns(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<ReorderColumnsRequest>,
) -> ApiResult<impl IntoResponse> {
    if req.column_orders.is_empty() {
        return Err(ApiError::missing_field("column_orders"));
    }
    for order in &req.column_orders {
        order.position.validate_non_negative("position")?;
    }

    board_or_not_found(&state.db, req.board_id).await?;
    require_board_access(&state.db, req.board_id, &auth).await?;

    let columns = state
        .db
        .columns_reorder(req.board_id, &req.column_orders)
        .await?;
    let total = columns.len() as i32;

    Ok(Json(ListColumnsResponse { columns, total }))
}

/// POST /api/v1/columns/{id}/move - Move a column to a new position
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/api/v1/columns/{id}/move",
    tag = "Columns",
    params(
        ("id" = Uuid, Path, description = "Column ID")
    ),
    request_body = MoveColumnRequest,
    responses(
        (status = 200, description = "Column moved successfully", body = corkboard_core::Column),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 403, description = "Forbidden", body = ApiError),
        (status = 404, description = "Column not found", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 409, description = "Concurrent modification", body = ApiError),
    ),
    security(("session_cookie" = []))
))]
pub async fn move_column(
    State(state): State<AppState>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveColumnRequest>,
) -> ApiResult<impl IntoResponse> {
    req.position.validate_non_negative("position")?;

    let column = column_or_not_found(&state.db, id).await?;
    require_board_access(&state.db, column.board_id, &auth).await?;

    let column = state.db.column_move(id, req.position).await?;
    Ok(Json(column))
}

// ============================================================================
// ROUTER SETUP
// ============================================================================

/// Create the column routes router.
pub fn create_router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/", axum::routing::post(create_column))
        .route("/", axum::routing::get(list_columns))
        .route("/reorder", axum::routing::post(reorder_columns))
        .route("/:id", axum::routing::get(get_column))
        .route("/:id", axum::routing::patch(update_column))
        .route("/:id", axum::routing::delete(delete_column))
        .route("/:id/move", axum::routing::post(move_column))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnOrder;

    #[test]
    fn test_reorder_rejects_negative_positions() {
        let order = ColumnOrder {
            id: Uuid::nil(),
            position: -1,
        };
        assert!(order.position.validate_non_negative("position").is_err());
    }

    #[test]
    fn test_move_request_position_validation() {
        let req = MoveColumnRequest { position: 0 };
        assert!(req.position.validate_non_negative("position").is_ok());

        let req = MoveColumnRequest { position: -3 };
        assert!(req.position.validate_non_negative("position").is_err());
    }

    #[test]
    fn test_update_column_request_requires_a_field() {
        let req = UpdateColumnRequest { title: None };
        assert!(req.validate_has_updates().is_err());
    }
}
