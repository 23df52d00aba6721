//! Error types for Corkboard operations

use crate::EntityType;
use thiserror::Error;
use uuid::Uuid;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    #[error("Insert failed for {entity_type}: {reason}")]
    InsertFailed {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Update failed for {entity_type} with id {id}: {reason}")]
    UpdateFailed {
        entity_type: EntityType,
        id: Uuid,
        reason: String,
    },

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Position must be non-negative, got {position}")]
    NegativePosition { position: i32 },

    #[error("Positions of {entity_type} children under {parent_id} are not dense: {positions:?}")]
    DensityViolation {
        entity_type: EntityType,
        parent_id: Uuid,
        positions: Vec<i32>,
    },
}

/// Reorder/move semantic errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    #[error("Cannot move card {card_id} to a column on a different board")]
    CrossBoardMove { card_id: Uuid },

    #[error("Invalid move for {entity_type} {id}: {reason}")]
    InvalidMove {
        entity_type: EntityType,
        id: Uuid,
        reason: String,
    },
}

/// Master error type for all Corkboard errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CorkboardError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Reorder error: {0}")]
    Reorder(#[from] ReorderError),
}

/// Result type alias for Corkboard operations.
pub type CorkboardResult<T> = Result<T, CorkboardError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display_not_found() {
        let err = StorageError::NotFound {
            entity_type: EntityType::Card,
            id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Entity not found"));
        assert!(msg.contains("Card"));
        assert!(msg.contains("00000000-0000-0000-0000-000000000000"));
    }

    #[test]
    fn test_validation_error_display_negative_position() {
        let err = ValidationError::NegativePosition { position: -3 };
        let msg = format!("{}", err);
        assert!(msg.contains("non-negative"));
        assert!(msg.contains("-3"));
    }

    #[test]
    fn test_validation_error_display_density_violation() {
        let err = ValidationError::DensityViolation {
            entity_type: EntityType::Column,
            parent_id: Uuid::nil(),
            positions: vec![0, 2, 2],
        };
        let msg = format!("{}", err);
        assert!(msg.contains("not dense"));
        assert!(msg.contains("[0, 2, 2]"));
    }

    #[test]
    fn test_reorder_error_display_cross_board() {
        let err = ReorderError::CrossBoardMove {
            card_id: Uuid::nil(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("different board"));
    }

    #[test]
    fn test_corkboard_error_from_variants() {
        let storage = CorkboardError::from(StorageError::LockPoisoned);
        assert!(matches!(storage, CorkboardError::Storage(_)));

        let validation = CorkboardError::from(ValidationError::NegativePosition { position: -1 });
        assert!(matches!(validation, CorkboardError::Validation(_)));

        let reorder = CorkboardError::from(ReorderError::CrossBoardMove {
            card_id: Uuid::nil(),
        });
        assert!(matches!(reorder, CorkboardError::Reorder(_)));
    }
}
