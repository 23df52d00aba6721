//! Corkboard Storage - Storage Trait and Mock Implementation
//!
//! Defines the storage abstraction for boards, columns and cards. The
//! Postgres implementation lives in the API crate (`DbClient`); this crate
//! provides the trait plus `MockStorage`, an in-memory implementation used
//! by tests.
//!
//! Every mutating operation on `MockStorage` runs to completion under a
//! single write lock, which is the in-memory equivalent of the one-statement-
//! group transaction the Postgres path uses: concurrent reorders serialize,
//! and no caller ever observes a half-applied move.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use corkboard_core::{
    check_dense, plan_across_parents, plan_within_parent, Board, BoardId, BoardMember, Card,
    CardId, Column, ColumnId, CorkboardResult, EntityType, MemberId, MovePlan, Position,
    ReorderError, StorageError, ValidationError,
};

// ============================================================================
// UPDATE TYPES
// ============================================================================

/// Update payload for boards.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Update payload for columns.
#[derive(Debug, Clone, Default)]
pub struct ColumnUpdate {
    /// New title
    pub title: Option<String>,
}

/// Update payload for cards.
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

/// Storage trait for Corkboard entities.
///
/// Implementations must apply each mutating call atomically: either every
/// row touched by the call is updated, or none is. The reorder operations
/// (`column_reorder`, `column_move`, `card_move`) additionally require that
/// concurrent calls touching the same parent serialize, so that two
/// interleaved read-modify-write position updates cannot produce duplicate
/// or missing positions.
pub trait StorageTrait: Send + Sync {
    // === Board Operations ===

    /// Insert a new board.
    fn board_insert(&self, b: &Board) -> CorkboardResult<()>;

    /// Get a board by ID.
    fn board_get(&self, id: BoardId) -> CorkboardResult<Option<Board>>;

    /// List boards a member owns or belongs to, newest first.
    fn board_list_by_member(&self, member_id: MemberId) -> CorkboardResult<Vec<Board>>;

    /// Update a board.
    fn board_update(&self, id: BoardId, update: BoardUpdate) -> CorkboardResult<()>;

    /// Delete a board and everything under it.
    fn board_delete(&self, id: BoardId) -> CorkboardResult<()>;

    /// Insert a board membership grant.
    fn board_member_insert(&self, m: &BoardMember) -> CorkboardResult<()>;

    /// Whether a member may view/modify a board (owner or member).
    fn has_board_access(&self, board_id: BoardId, member_id: MemberId) -> CorkboardResult<bool>;

    // === Column Operations ===

    /// Insert a new column. The column's `position` must equal the board's
    /// current column count (columns are created by appending).
    fn column_insert(&self, c: &Column) -> CorkboardResult<()>;

    /// Get a column by ID.
    fn column_get(&self, id: ColumnId) -> CorkboardResult<Option<Column>>;

    /// List a board's columns in position order.
    fn column_list_by_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Column>>;

    /// Update a column.
    fn column_update(&self, id: ColumnId, update: ColumnUpdate) -> CorkboardResult<()>;

    /// Delete a column and its cards, closing the position gap it leaves.
    fn column_delete(&self, id: ColumnId) -> CorkboardResult<()>;

    /// Bulk-assign positions to a board's columns.
    ///
    /// Every listed column must exist and belong to `board_id`. After the
    /// listed assignments are applied, the full position set of the board's
    /// columns must be dense; otherwise the call fails and nothing changes.
    fn column_reorder(
        &self,
        board_id: BoardId,
        assignments: &[(ColumnId, Position)],
    ) -> CorkboardResult<()>;

    /// Move one column to a new slot within its board.
    fn column_move(&self, id: ColumnId, requested_position: Position) -> CorkboardResult<Column>;

    // === Card Operations ===

    /// Insert a new card. The card's `position` must equal the column's
    /// current card count (cards are created by appending).
    fn card_insert(&self, c: &Card) -> CorkboardResult<()>;

    /// Get a card by ID.
    fn card_get(&self, id: CardId) -> CorkboardResult<Option<Card>>;

    /// List a column's cards in position order.
    fn card_list_by_column(&self, column_id: ColumnId) -> CorkboardResult<Vec<Card>>;

    /// Update a card.
    fn card_update(&self, id: CardId, update: CardUpdate) -> CorkboardResult<()>;

    /// Delete a card, closing the position gap it leaves.
    fn card_delete(&self, id: CardId) -> CorkboardResult<()>;

    /// Move a card to a slot in `target_column_id`, which may be its current
    /// column or another column on the same board.
    fn card_move(
        &self,
        id: CardId,
        target_column_id: ColumnId,
        requested_position: Position,
    ) -> CorkboardResult<Card>;
}

// ============================================================================
// MOCK STORAGE
// ============================================================================

#[derive(Debug, Default)]
struct MockState {
    boards: HashMap<BoardId, Board>,
    board_members: Vec<BoardMember>,
    columns: HashMap<ColumnId, Column>,
    cards: HashMap<CardId, Card>,
}

/// In-memory mock storage for testing.
///
/// One lock guards all maps, so a write guard held for the duration of an
/// operation gives the same all-or-nothing, serialized behavior the SQL
/// implementation gets from transactions with row locking.
#[derive(Debug, Default, Clone)]
pub struct MockStorage {
    state: Arc<RwLock<MockState>>,
}

impl MockStorage {
    /// Create a new mock storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.boards.clear();
            state.board_members.clear();
            state.columns.clear();
            state.cards.clear();
        }
    }

    /// Get count of stored boards.
    pub fn board_count(&self) -> usize {
        self.state.read().map(|s| s.boards.len()).unwrap_or(0)
    }

    /// Get count of stored columns.
    pub fn column_count(&self) -> usize {
        self.state.read().map(|s| s.columns.len()).unwrap_or(0)
    }

    /// Get count of stored cards.
    pub fn card_count(&self) -> usize {
        self.state.read().map(|s| s.cards.len()).unwrap_or(0)
    }

    fn read(&self) -> CorkboardResult<RwLockReadGuard<'_, MockState>> {
        self.state
            .read()
            .map_err(|_| StorageError::LockPoisoned.into())
    }

    fn write(&self) -> CorkboardResult<RwLockWriteGuard<'_, MockState>> {
        self.state
            .write()
            .map_err(|_| StorageError::LockPoisoned.into())
    }
}

fn not_found(entity_type: EntityType, id: uuid::Uuid) -> corkboard_core::CorkboardError {
    StorageError::NotFound { entity_type, id }.into()
}

impl StorageTrait for MockStorage {
    // === Board Operations ===

    fn board_insert(&self, b: &Board) -> CorkboardResult<()> {
        let mut state = self.write()?;
        if state.boards.contains_key(&b.board_id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Board,
                reason: format!("duplicate id {}", b.board_id),
            }
            .into());
        }
        state.boards.insert(b.board_id, b.clone());
        Ok(())
    }

    fn board_get(&self, id: BoardId) -> CorkboardResult<Option<Board>> {
        Ok(self.read()?.boards.get(&id).cloned())
    }

    fn board_list_by_member(&self, member_id: MemberId) -> CorkboardResult<Vec<Board>> {
        let state = self.read()?;
        let mut boards: Vec<Board> = state
            .boards
            .values()
            .filter(|b| {
                b.owner_id == member_id
                    || state
                        .board_members
                        .iter()
                        .any(|m| m.board_id == b.board_id && m.member_id == member_id)
            })
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(boards)
    }

    fn board_update(&self, id: BoardId, update: BoardUpdate) -> CorkboardResult<()> {
        let mut state = self.write()?;
        let board = state
            .boards
            .get_mut(&id)
            .ok_or_else(|| not_found(EntityType::Board, id))?;
        if let Some(title) = update.title {
            board.title = title;
        }
        if let Some(description) = update.description {
            board.description = Some(description);
        }
        board.updated_at = Utc::now();
        Ok(())
    }

    fn board_delete(&self, id: BoardId) -> CorkboardResult<()> {
        let mut state = self.write()?;
        state
            .boards
            .remove(&id)
            .ok_or_else(|| not_found(EntityType::Board, id))?;
        state.board_members.retain(|m| m.board_id != id);
        let column_ids: Vec<ColumnId> = state
            .columns
            .values()
            .filter(|c| c.board_id == id)
            .map(|c| c.column_id)
            .collect();
        state.columns.retain(|_, c| c.board_id != id);
        state
            .cards
            .retain(|_, c| !column_ids.contains(&c.column_id));
        Ok(())
    }

    fn board_member_insert(&self, m: &BoardMember) -> CorkboardResult<()> {
        let mut state = self.write()?;
        if !state.boards.contains_key(&m.board_id) {
            return Err(not_found(EntityType::Board, m.board_id));
        }
        state.board_members.push(m.clone());
        Ok(())
    }

    fn has_board_access(&self, board_id: BoardId, member_id: MemberId) -> CorkboardResult<bool> {
        let state = self.read()?;
        let board = state
            .boards
            .get(&board_id)
            .ok_or_else(|| not_found(EntityType::Board, board_id))?;
        Ok(board.owner_id == member_id
            || state
                .board_members
                .iter()
                .any(|m| m.board_id == board_id && m.member_id == member_id))
    }

    // === Column Operations ===

    fn column_insert(&self, c: &Column) -> CorkboardResult<()> {
        let mut state = self.write()?;
        if !state.boards.contains_key(&c.board_id) {
            return Err(not_found(EntityType::Board, c.board_id));
        }
        if state.columns.contains_key(&c.column_id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Column,
                reason: format!("duplicate id {}", c.column_id),
            }
            .into());
        }
        let count = state
            .columns
            .values()
            .filter(|existing| existing.board_id == c.board_id)
            .count() as Position;
        if c.position != count {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Column,
                reason: format!("position {} does not append at {}", c.position, count),
            }
            .into());
        }
        state.columns.insert(c.column_id, c.clone());
        Ok(())
    }

    fn column_get(&self, id: ColumnId) -> CorkboardResult<Option<Column>> {
        Ok(self.read()?.columns.get(&id).cloned())
    }

    fn column_list_by_board(&self, board_id: BoardId) -> CorkboardResult<Vec<Column>> {
        let state = self.read()?;
        let mut columns: Vec<Column> = state
            .columns
            .values()
            .filter(|c| c.board_id == board_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.position);
        Ok(columns)
    }

    fn column_update(&self, id: ColumnId, update: ColumnUpdate) -> CorkboardResult<()> {
        let mut state = self.write()?;
        let column = state
            .columns
            .get_mut(&id)
            .ok_or_else(|| not_found(EntityType::Column, id))?;
        if let Some(title) = update.title {
            column.title = title;
        }
        column.updated_at = Utc::now();
        Ok(())
    }

    fn column_delete(&self, id: ColumnId) -> CorkboardResult<()> {
        let mut state = self.write()?;
        let removed = state
            .columns
            .remove(&id)
            .ok_or_else(|| not_found(EntityType::Column, id))?;
        state.cards.retain(|_, c| c.column_id != id);
        // Close the gap so the density precondition holds for later reorders.
        let now = Utc::now();
        for column in state
            .columns
            .values_mut()
            .filter(|c| c.board_id == removed.board_id && c.position > removed.position)
        {
            column.position -= 1;
            column.updated_at = now;
        }
        Ok(())
    }

    fn column_reorder(
        &self,
        board_id: BoardId,
        assignments: &[(ColumnId, Position)],
    ) -> CorkboardResult<()> {
        let mut state = self.write()?;
        if !state.boards.contains_key(&board_id) {
            return Err(not_found(EntityType::Board, board_id));
        }
        for &(_, position) in assignments {
            if position < 0 {
                return Err(ValidationError::NegativePosition { position }.into());
            }
        }

        // Apply to a scratch copy so a failed assignment or a density
        // violation leaves the stored state untouched.
        let now = Utc::now();
        let mut scratch: HashMap<ColumnId, Column> = state
            .columns
            .values()
            .filter(|c| c.board_id == board_id)
            .map(|c| (c.column_id, c.clone()))
            .collect();
        for &(column_id, position) in assignments {
            match scratch.get_mut(&column_id) {
                Some(column) => {
                    column.position = position;
                    column.updated_at = now;
                }
                // Missing entirely or belonging to another board.
                None => return Err(not_found(EntityType::Column, column_id)),
            }
        }

        let mut positions: Vec<Position> = scratch.values().map(|c| c.position).collect();
        if !check_dense(&positions) {
            positions.sort_unstable();
            return Err(ValidationError::DensityViolation {
                entity_type: EntityType::Column,
                parent_id: board_id,
                positions,
            }
            .into());
        }

        for (column_id, column) in scratch {
            state.columns.insert(column_id, column);
        }
        Ok(())
    }

    fn column_move(&self, id: ColumnId, requested_position: Position) -> CorkboardResult<Column> {
        let mut state = self.write()?;
        let column = state
            .columns
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(EntityType::Column, id))?;
        let sibling_count = state
            .columns
            .values()
            .filter(|c| c.board_id == column.board_id)
            .count() as Position;

        match plan_within_parent(column.position, requested_position, sibling_count)? {
            MovePlan::Noop => Ok(column),
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                let now = Utc::now();
                for sibling in state
                    .columns
                    .values_mut()
                    .filter(|c| c.board_id == column.board_id)
                {
                    if sibling.column_id == id {
                        sibling.position = new_position;
                        sibling.updated_at = now;
                    } else if shift.applies_to(sibling.position) {
                        sibling.position = shift.apply(sibling.position);
                        sibling.updated_at = now;
                    }
                }
                state
                    .columns
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| not_found(EntityType::Column, id))
            }
            MovePlan::AcrossParents { .. } => {
                unreachable!("within-parent planning cannot cross parents")
            }
        }
    }

    // === Card Operations ===

    fn card_insert(&self, c: &Card) -> CorkboardResult<()> {
        let mut state = self.write()?;
        if !state.columns.contains_key(&c.column_id) {
            return Err(not_found(EntityType::Column, c.column_id));
        }
        if state.cards.contains_key(&c.card_id) {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Card,
                reason: format!("duplicate id {}", c.card_id),
            }
            .into());
        }
        let count = state
            .cards
            .values()
            .filter(|existing| existing.column_id == c.column_id)
            .count() as Position;
        if c.position != count {
            return Err(StorageError::InsertFailed {
                entity_type: EntityType::Card,
                reason: format!("position {} does not append at {}", c.position, count),
            }
            .into());
        }
        state.cards.insert(c.card_id, c.clone());
        Ok(())
    }

    fn card_get(&self, id: CardId) -> CorkboardResult<Option<Card>> {
        Ok(self.read()?.cards.get(&id).cloned())
    }

    fn card_list_by_column(&self, column_id: ColumnId) -> CorkboardResult<Vec<Card>> {
        let state = self.read()?;
        let mut cards: Vec<Card> = state
            .cards
            .values()
            .filter(|c| c.column_id == column_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.position);
        Ok(cards)
    }

    fn card_update(&self, id: CardId, update: CardUpdate) -> CorkboardResult<()> {
        let mut state = self.write()?;
        let card = state
            .cards
            .get_mut(&id)
            .ok_or_else(|| not_found(EntityType::Card, id))?;
        if let Some(title) = update.title {
            card.title = title;
        }
        if let Some(description) = update.description {
            card.description = Some(description);
        }
        card.updated_at = Utc::now();
        Ok(())
    }

    fn card_delete(&self, id: CardId) -> CorkboardResult<()> {
        let mut state = self.write()?;
        let removed = state
            .cards
            .remove(&id)
            .ok_or_else(|| not_found(EntityType::Card, id))?;
        let now = Utc::now();
        for card in state
            .cards
            .values_mut()
            .filter(|c| c.column_id == removed.column_id && c.position > removed.position)
        {
            card.position -= 1;
            card.updated_at = now;
        }
        Ok(())
    }

    fn card_move(
        &self,
        id: CardId,
        target_column_id: ColumnId,
        requested_position: Position,
    ) -> CorkboardResult<Card> {
        let mut state = self.write()?;
        let card = state
            .cards
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(EntityType::Card, id))?;
        let source_column = state
            .columns
            .get(&card.column_id)
            .cloned()
            .ok_or_else(|| not_found(EntityType::Column, card.column_id))?;
        let target_column = state
            .columns
            .get(&target_column_id)
            .cloned()
            .ok_or_else(|| not_found(EntityType::Column, target_column_id))?;
        if target_column.board_id != source_column.board_id {
            return Err(ReorderError::CrossBoardMove { card_id: id }.into());
        }

        let now = Utc::now();
        if target_column_id == source_column.column_id {
            let sibling_count = state
                .cards
                .values()
                .filter(|c| c.column_id == source_column.column_id)
                .count() as Position;
            match plan_within_parent(card.position, requested_position, sibling_count)? {
                MovePlan::Noop => return Ok(card),
                MovePlan::WithinParent {
                    shift,
                    new_position,
                } => {
                    for sibling in state
                        .cards
                        .values_mut()
                        .filter(|c| c.column_id == source_column.column_id)
                    {
                        if sibling.card_id == id {
                            sibling.position = new_position;
                            sibling.updated_at = now;
                        } else if shift.applies_to(sibling.position) {
                            sibling.position = shift.apply(sibling.position);
                            sibling.updated_at = now;
                        }
                    }
                }
                MovePlan::AcrossParents { .. } => {
                    unreachable!("within-parent planning cannot cross parents")
                }
            }
        } else {
            let target_count = state
                .cards
                .values()
                .filter(|c| c.column_id == target_column_id)
                .count() as Position;
            match plan_across_parents(card.position, requested_position, target_count)? {
                MovePlan::AcrossParents {
                    source_shift,
                    target_shift,
                    new_position,
                } => {
                    for other in state.cards.values_mut() {
                        if other.card_id == id {
                            other.column_id = target_column_id;
                            other.position = new_position;
                            other.updated_at = now;
                        } else if other.column_id == source_column.column_id
                            && source_shift.applies_to(other.position)
                        {
                            other.position = source_shift.apply(other.position);
                            other.updated_at = now;
                        } else if other.column_id == target_column_id
                            && target_shift.applies_to(other.position)
                        {
                            other.position = target_shift.apply(other.position);
                            other.updated_at = now;
                        }
                    }
                }
                other => unreachable!("cross-parent planning produced {:?}", other),
            }
        }

        state
            .cards
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(EntityType::Card, id))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use corkboard_core::new_entity_id;

    fn board(owner: MemberId) -> Board {
        Board {
            board_id: new_entity_id(),
            owner_id: owner,
            title: "Sprint board".to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn column(board_id: BoardId, title: &str, position: Position) -> Column {
        Column {
            column_id: new_entity_id(),
            board_id,
            title: title.to_string(),
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn card(column_id: ColumnId, title: &str, position: Position) -> Card {
        Card {
            card_id: new_entity_id(),
            column_id,
            title: title.to_string(),
            description: None,
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn seed_board_with_columns(storage: &MockStorage, n: usize) -> (Board, Vec<Column>) {
        let b = board(new_entity_id());
        storage.board_insert(&b).unwrap();
        let columns: Vec<Column> = (0..n)
            .map(|i| {
                let c = column(b.board_id, &format!("col-{}", i), i as Position);
                storage.column_insert(&c).unwrap();
                c
            })
            .collect();
        (b, columns)
    }

    #[test]
    fn test_column_insert_must_append() {
        let storage = MockStorage::new();
        let (b, _) = seed_board_with_columns(&storage, 2);

        let gap = column(b.board_id, "gap", 5);
        let err = storage.column_insert(&gap).unwrap_err();
        assert!(matches!(
            err,
            corkboard_core::CorkboardError::Storage(StorageError::InsertFailed { .. })
        ));
    }

    #[test]
    fn test_column_delete_closes_gap() {
        let storage = MockStorage::new();
        let (b, columns) = seed_board_with_columns(&storage, 3);

        storage.column_delete(columns[1].column_id).unwrap();

        let remaining = storage.column_list_by_board(b.board_id).unwrap();
        assert_eq!(remaining.len(), 2);
        assert_eq!(remaining[0].column_id, columns[0].column_id);
        assert_eq!(remaining[0].position, 0);
        assert_eq!(remaining[1].column_id, columns[2].column_id);
        assert_eq!(remaining[1].position, 1);
    }

    #[test]
    fn test_column_reorder_swap() {
        let storage = MockStorage::new();
        let (b, columns) = seed_board_with_columns(&storage, 3);

        storage
            .column_reorder(
                b.board_id,
                &[(columns[0].column_id, 2), (columns[2].column_id, 0)],
            )
            .unwrap();

        let ordered = storage.column_list_by_board(b.board_id).unwrap();
        let ids: Vec<ColumnId> = ordered.iter().map(|c| c.column_id).collect();
        assert_eq!(
            ids,
            vec![
                columns[2].column_id,
                columns[1].column_id,
                columns[0].column_id
            ]
        );
    }

    #[test]
    fn test_column_reorder_rejects_non_dense_result() {
        let storage = MockStorage::new();
        let (b, columns) = seed_board_with_columns(&storage, 3);

        // Parking two columns on the same slot would corrupt the ordering.
        let err = storage
            .column_reorder(b.board_id, &[(columns[0].column_id, 1)])
            .unwrap_err();
        assert!(matches!(
            err,
            corkboard_core::CorkboardError::Validation(ValidationError::DensityViolation { .. })
        ));

        // Nothing moved.
        let ordered = storage.column_list_by_board(b.board_id).unwrap();
        let ids: Vec<ColumnId> = ordered.iter().map(|c| c.column_id).collect();
        assert_eq!(
            ids,
            columns.iter().map(|c| c.column_id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_column_reorder_unknown_column_named_in_error() {
        let storage = MockStorage::new();
        let (b, _) = seed_board_with_columns(&storage, 2);

        let stranger = new_entity_id();
        let err = storage
            .column_reorder(b.board_id, &[(stranger, 0)])
            .unwrap_err();
        match err {
            corkboard_core::CorkboardError::Storage(StorageError::NotFound {
                entity_type,
                id,
            }) => {
                assert_eq!(entity_type, EntityType::Column);
                assert_eq!(id, stranger);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_card_move_same_column_down() {
        let storage = MockStorage::new();
        let (_, columns) = seed_board_with_columns(&storage, 1);
        let col = &columns[0];
        let cards: Vec<Card> = (0..4)
            .map(|i| {
                let c = card(col.column_id, &format!("card-{}", i), i);
                storage.card_insert(&c).unwrap();
                c
            })
            .collect();

        let moved = storage.card_move(cards[0].card_id, col.column_id, 3).unwrap();
        assert_eq!(moved.position, 3);

        let ordered = storage.card_list_by_column(col.column_id).unwrap();
        let ids: Vec<CardId> = ordered.iter().map(|c| c.card_id).collect();
        assert_eq!(
            ids,
            vec![
                cards[1].card_id,
                cards[2].card_id,
                cards[3].card_id,
                cards[0].card_id
            ]
        );
    }

    #[test]
    fn test_card_move_to_current_slot_is_noop() {
        let storage = MockStorage::new();
        let (_, columns) = seed_board_with_columns(&storage, 1);
        let col = &columns[0];
        for i in 0..3 {
            storage
                .card_insert(&card(col.column_id, &format!("card-{}", i), i))
                .unwrap();
        }
        let before = storage.card_list_by_column(col.column_id).unwrap();

        let target = before[1].clone();
        let moved = storage
            .card_move(target.card_id, col.column_id, target.position)
            .unwrap();
        assert_eq!(moved, target);

        let after = storage.card_list_by_column(col.column_id).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn test_card_move_across_boards_rejected() {
        let storage = MockStorage::new();
        let (_, columns_a) = seed_board_with_columns(&storage, 1);
        let (_, columns_b) = seed_board_with_columns(&storage, 1);

        let c = card(columns_a[0].column_id, "stuck", 0);
        storage.card_insert(&c).unwrap();

        let err = storage
            .card_move(c.card_id, columns_b[0].column_id, 0)
            .unwrap_err();
        assert!(matches!(
            err,
            corkboard_core::CorkboardError::Reorder(ReorderError::CrossBoardMove { .. })
        ));
    }

    #[test]
    fn test_board_delete_cascades() {
        let storage = MockStorage::new();
        let (b, columns) = seed_board_with_columns(&storage, 2);
        storage
            .card_insert(&card(columns[0].column_id, "c", 0))
            .unwrap();

        storage.board_delete(b.board_id).unwrap();
        assert_eq!(storage.board_count(), 0);
        assert_eq!(storage.column_count(), 0);
        assert_eq!(storage.card_count(), 0);
    }

    #[test]
    fn test_has_board_access() {
        let storage = MockStorage::new();
        let owner = new_entity_id();
        let invited = new_entity_id();
        let stranger = new_entity_id();
        let b = board(owner);
        storage.board_insert(&b).unwrap();
        storage
            .board_member_insert(&BoardMember {
                board_id: b.board_id,
                member_id: invited,
                role: corkboard_core::BoardRole::Member,
                created_at: Utc::now(),
            })
            .unwrap();

        assert!(storage.has_board_access(b.board_id, owner).unwrap());
        assert!(storage.has_board_access(b.board_id, invited).unwrap());
        assert!(!storage.has_board_access(b.board_id, stranger).unwrap());
    }
}
