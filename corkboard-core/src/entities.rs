//! Core entity structures

use crate::{BoardId, CardId, ColumnId, MemberId, Position, Timestamp};
use serde::{Deserialize, Serialize};

/// Board - top-level container owned by a member.
/// A board owns an ordered collection of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Board {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub board_id: BoardId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub owner_id: MemberId,
    pub title: String,
    pub description: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

/// Role a member holds on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BoardRole {
    Owner,
    Member,
}

/// Access grant linking a member to a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BoardMember {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub board_id: BoardId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub member_id: MemberId,
    pub role: BoardRole,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
}

/// Column - ordered child of a board, parent of cards.
///
/// `position` is dense and zero-based within the owning board: the positions
/// of a board's columns are always exactly `{0, .., n-1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Column {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub column_id: ColumnId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub board_id: BoardId,
    pub title: String,
    pub position: Position,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

/// Card - ordered child of a column.
///
/// Belongs to exactly one column at a time; `position` is dense and
/// zero-based within that column. Moving a card is the only operation that
/// rewrites `column_id` on an existing row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Card {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub card_id: CardId,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "uuid"))]
    pub column_id: ColumnId,
    pub title: String,
    pub description: Option<String>,
    pub position: Position,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub created_at: Timestamp,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = "date-time"))]
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_entity_id;
    use chrono::Utc;

    fn sample_card(position: i32) -> Card {
        Card {
            card_id: new_entity_id(),
            column_id: new_entity_id(),
            title: "Write release notes".to_string(),
            description: None,
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_card_serde_round_trip() {
        let card = sample_card(3);
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }

    #[test]
    fn test_board_role_snake_case() {
        let json = serde_json::to_string(&BoardRole::Owner).unwrap();
        assert_eq!(json, "\"owner\"");
        let back: BoardRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(back, BoardRole::Member);
    }
}
