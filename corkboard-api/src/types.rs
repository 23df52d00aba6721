//! API Request and Response Types
//!
//! Request and response types for the Corkboard REST API. Entity responses
//! reuse the core entity structs directly; this module holds the request
//! bodies, list envelopes, and the reorder/move payloads.

use corkboard_core::{Board, BoardId, Card, Column, ColumnId, MemberId, Position};
use serde::{Deserialize, Serialize};

use crate::validation::HasUpdates;

// ============================================================================
// BOARD TYPES
// ============================================================================

/// Request to create a new board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateBoardRequest {
    /// Title of the board
    pub title: String,
    /// Optional description
    pub description: Option<String>,
}

/// Request to update an existing board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateBoardRequest {
    /// New title (if changing)
    pub title: Option<String>,
    /// New description (if changing)
    pub description: Option<String>,
}

impl HasUpdates for UpdateBoardRequest {
    fn has_any_updates(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

/// Request to add a member to a board. Only the board owner may invite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InviteMemberRequest {
    /// Member being granted access
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub member_id: MemberId,
}

/// Response containing a list of boards visible to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListBoardsResponse {
    /// Boards owned by or shared with the caller
    pub boards: Vec<Board>,
    /// Total count
    pub total: i32,
}

/// A board together with its columns and cards, in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BoardDetailResponse {
    #[serde(flatten)]
    pub board: Board,
    /// Columns ordered by position, each with its cards ordered by position
    pub columns: Vec<ColumnDetail>,
}

/// A column with its cards, used inside [`BoardDetailResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ColumnDetail {
    #[serde(flatten)]
    pub column: Column,
    /// Cards ordered by position
    pub cards: Vec<Card>,
}

// ============================================================================
// COLUMN TYPES
// ============================================================================

/// Request to create a new column. The column is appended at the end of the
/// board; the position is assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateColumnRequest {
    /// Board this column belongs to
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub board_id: BoardId,
    /// Title of the column
    pub title: String,
}

/// Request to update an existing column's attributes. Position changes go
/// through the move and reorder endpoints instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateColumnRequest {
    /// New title (if changing)
    pub title: Option<String>,
}

impl HasUpdates for UpdateColumnRequest {
    fn has_any_updates(&self) -> bool {
        self.title.is_some()
    }
}

/// Response containing a board's columns in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListColumnsResponse {
    /// Columns ordered by position
    pub columns: Vec<Column>,
    /// Total count
    pub total: i32,
}

/// One column's target slot in a bulk reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ColumnOrder {
    /// Column being placed
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub id: ColumnId,
    /// Target position, 0-based
    pub position: Position,
}

/// Request to reorder all columns of a board in one shot.
///
/// The assignments must cover positions `0..n-1` exactly once for the board's
/// `n` columns; anything else is rejected and nothing is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ReorderColumnsRequest {
    /// Board whose columns are being reordered
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub board_id: BoardId,
    /// Position assignments
    pub column_orders: Vec<ColumnOrder>,
}

/// Request to move a single column to a new position within its board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MoveColumnRequest {
    /// Target position, 0-based. Values past the end are clamped to the last
    /// slot.
    pub position: Position,
}

// ============================================================================
// CARD TYPES
// ============================================================================

/// Request to create a new card. The card is appended at the end of the
/// column; the position is assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCardRequest {
    /// Column this card belongs to
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub column_id: ColumnId,
    /// Title of the card
    pub title: String,
    /// Optional description
    pub description: Option<String>,
}

/// Request to update an existing card's attributes. Position and column
/// changes go through the move endpoint instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCardRequest {
    /// New title (if changing)
    pub title: Option<String>,
    /// New description (if changing)
    pub description: Option<String>,
}

impl HasUpdates for UpdateCardRequest {
    fn has_any_updates(&self) -> bool {
        self.title.is_some() || self.description.is_some()
    }
}

/// Response containing a column's cards in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListCardsResponse {
    /// Cards ordered by position
    pub cards: Vec<Card>,
    /// Total count
    pub total: i32,
}

/// Request to move a card, within its column or into another column on the
/// same board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MoveCardRequest {
    /// Destination column. Must belong to the card's board.
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub column_id: ColumnId,
    /// Target position in the destination column, 0-based. Values past the
    /// end are clamped to the last valid slot.
    pub position: Position,
}
