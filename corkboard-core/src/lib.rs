//! Corkboard Core - Entity Types and Reorder Arithmetic
//!
//! Pure data structures plus the position-planning logic for drag-and-drop
//! reordering. No I/O lives here: the storage and API crates apply the plans
//! this crate computes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod entities;
pub mod error;
pub mod reorder;

pub use entities::{Board, BoardMember, BoardRole, Card, Column};
pub use error::{CorkboardError, CorkboardResult, ReorderError, StorageError, ValidationError};
pub use reorder::{check_dense, plan_across_parents, plan_within_parent, MovePlan, SiblingShift};

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// Entity identifier using UUIDv7 for timestamp-sortable IDs.
pub type EntityId = Uuid;

/// Board identifier.
pub type BoardId = Uuid;

/// Column identifier.
pub type ColumnId = Uuid;

/// Card identifier.
pub type CardId = Uuid;

/// Member (acting identity) identifier.
pub type MemberId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Zero-based position of a child within its parent's ordered collection.
pub type Position = i32;

/// Generate a new UUIDv7 EntityId (timestamp-sortable).
pub fn new_entity_id() -> EntityId {
    Uuid::now_v7()
}

// ============================================================================
// ENTITY TYPE DISCRIMINATOR
// ============================================================================

/// Entity type discriminator for polymorphic references and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum EntityType {
    Member,
    Board,
    Column,
    Card,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Member => write!(f, "Member"),
            EntityType::Board => write!(f, "Board"),
            EntityType::Column => write!(f, "Column"),
            EntityType::Card => write!(f, "Card"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_id_is_v7() {
        let id = new_entity_id();
        assert_eq!(id.get_version_num(), 7);
    }

    #[test]
    fn test_entity_ids_sortable_by_creation() {
        let a = new_entity_id();
        let b = new_entity_id();
        // UUIDv7 embeds a timestamp; later ids never sort before earlier ones.
        assert!(a <= b);
    }

    #[test]
    fn test_entity_type_display() {
        assert_eq!(EntityType::Board.to_string(), "Board");
        assert_eq!(EntityType::Column.to_string(), "Column");
        assert_eq!(EntityType::Card.to_string(), "Card");
        assert_eq!(EntityType::Member.to_string(), "Member");
    }
}
