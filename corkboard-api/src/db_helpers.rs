//! Database Helper Functions
//!
//! Common database operations that combine multiple steps,
//! reducing boilerplate in route handlers.

use corkboard_core::{Board, BoardId, Card, CardId, Column, ColumnId};

use crate::auth::AuthContext;
use crate::db::DbClient;
use crate::error::{ApiError, ApiResult};

/// Fetch a board or return the 404-mapped error.
pub async fn board_or_not_found(db: &DbClient, board_id: BoardId) -> ApiResult<Board> {
    db.board_get(board_id)
        .await?
        .ok_or_else(|| ApiError::board_not_found(board_id))
}

/// Fetch a column or return the 404-mapped error.
pub async fn column_or_not_found(db: &DbClient, column_id: ColumnId) -> ApiResult<Column> {
    db.column_get(column_id)
        .await?
        .ok_or_else(|| ApiError::column_not_found(column_id))
}

/// Fetch a card or return the 404-mapped error.
pub async fn card_or_not_found(db: &DbClient, card_id: CardId) -> ApiResult<Card> {
    db.card_get(card_id)
        .await?
        .ok_or_else(|| ApiError::card_not_found(card_id))
}

/// Reject callers who neither own the board nor appear in its membership
/// table.
pub async fn require_board_access(
    db: &DbClient,
    board_id: BoardId,
    auth: &AuthContext,
) -> ApiResult<()> {
    if db.has_board_access(board_id, auth.member_id).await? {
        Ok(())
    } else {
        Err(ApiError::forbidden(
            "You do not have access to this board",
        ))
    }
}
