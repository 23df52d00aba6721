//! Property-Based Tests for the Positional Reorder Engine
//!
//! **Property: density** — after any sequence of card moves, the positions of
//! every column's cards form exactly `{0, .., n-1}`.
//!
//! **Property: round-trip** — moving a card from one column to another and
//! back restores the original ordering of both columns.
//!
//! Plus deterministic checks for the no-op move, the worked cross-column
//! example, untouched state on NotFound, and serialization of concurrent
//! moves into one column.

use std::sync::Arc;

use chrono::Utc;
use corkboard_core::{
    new_entity_id, Board, Card, CardId, Column, ColumnId, CorkboardError, Position, StorageError,
};
use corkboard_storage::{MockStorage, StorageTrait};
use proptest::prelude::*;

// ============================================================================
// FIXTURES
// ============================================================================

fn seed_board(
    storage: &MockStorage,
    column_sizes: &[usize],
) -> (Vec<ColumnId>, Vec<Vec<CardId>>) {
    let board = Board {
        board_id: new_entity_id(),
        owner_id: new_entity_id(),
        title: "Test board".to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    storage.board_insert(&board).expect("board insert");

    let mut columns = Vec::new();
    let cards = column_sizes
        .iter()
        .enumerate()
        .map(|(col_index, &size)| {
            let column = Column {
                column_id: new_entity_id(),
                board_id: board.board_id,
                title: format!("column-{}", col_index),
                position: col_index as Position,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            storage.column_insert(&column).expect("column insert");
            columns.push(column.column_id);

            (0..size)
                .map(|i| {
                    let card = Card {
                        card_id: new_entity_id(),
                        column_id: column.column_id,
                        title: format!("card-{}-{}", col_index, i),
                        description: None,
                        position: i as Position,
                        created_at: Utc::now(),
                        updated_at: Utc::now(),
                    };
                    storage.card_insert(&card).expect("card insert");
                    card.card_id
                })
                .collect()
        })
        .collect();
    (columns, cards)
}

/// Positions of every card in a column, in listing order.
fn positions(storage: &MockStorage, column_id: ColumnId) -> Vec<Position> {
    storage
        .card_list_by_column(column_id)
        .expect("list")
        .iter()
        .map(|c| c.position)
        .collect()
}

/// Full ordering snapshot: (card, column, position) sorted for comparison.
fn snapshot(storage: &MockStorage, column_ids: &[ColumnId]) -> Vec<(CardId, ColumnId, Position)> {
    let mut rows: Vec<(CardId, ColumnId, Position)> = column_ids
        .iter()
        .flat_map(|&col| {
            storage
                .card_list_by_column(col)
                .expect("list")
                .into_iter()
                .map(move |c| (c.card_id, col, c.position))
        })
        .collect();
    rows.sort();
    rows
}

fn assert_dense(storage: &MockStorage, column_id: ColumnId) {
    let positions = positions(storage, column_id);
    let expected: Vec<Position> = (0..positions.len() as Position).collect();
    assert_eq!(positions, expected, "column {} not dense", column_id);
}

// ============================================================================
// PROPERTY TESTS
// ============================================================================

/// A random card-move request against a seeded board.
#[derive(Debug, Clone)]
struct MoveRequest {
    source_column: usize,
    card_index: usize,
    target_column: usize,
    target_position: Position,
}

fn move_sequence_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<MoveRequest>)> {
    // Between 1 and 4 columns holding up to 6 cards each.
    prop::collection::vec(1usize..=6, 1..=4).prop_flat_map(|sizes| {
        let n_columns = sizes.len();
        let moves = prop::collection::vec(
            (0..n_columns, 0usize..16, 0..n_columns, 0i32..12).prop_map(
                |(source_column, card_index, target_column, target_position)| MoveRequest {
                    source_column,
                    card_index,
                    target_column,
                    target_position,
                },
            ),
            0..12,
        );
        (Just(sizes), moves)
    })
}

proptest! {
    /// Property 1: the density invariant survives any sequence of moves.
    #[test]
    fn prop_density_after_move_sequence((sizes, moves) in move_sequence_strategy()) {
        let storage = MockStorage::new();
        let (columns, _cards) = seed_board(&storage, &sizes);

        for request in moves {
            let source = columns[request.source_column];
            let in_source = storage.card_list_by_column(source).expect("list");
            if in_source.is_empty() {
                continue;
            }
            let card_id = in_source[request.card_index % in_source.len()].card_id;
            let target = columns[request.target_column];

            storage
                .card_move(card_id, target, request.target_position)
                .expect("move");

            for &column_id in &columns {
                let positions = positions(&storage, column_id);
                let expected: Vec<Position> = (0..positions.len() as Position).collect();
                prop_assert_eq!(positions, expected);
            }
        }
    }

    /// Property 3: a cross-column move followed by the inverse move restores
    /// the original ordering of both columns.
    #[test]
    fn prop_cross_column_round_trip(
        source_size in 1usize..6,
        target_size in 0usize..6,
        card_index in 0usize..16,
        target_position in 0i32..8,
    ) {
        let storage = MockStorage::new();
        let (columns, cards) = seed_board(&storage, &[source_size, target_size]);
        let before = snapshot(&storage, &columns);

        let card_index = card_index % source_size;
        let card_id = cards[0][card_index];
        let original_position = card_index as Position;

        storage
            .card_move(card_id, columns[1], target_position)
            .expect("move out");
        storage
            .card_move(card_id, columns[0], original_position)
            .expect("move back");

        prop_assert_eq!(snapshot(&storage, &columns), before);
    }
}

// ============================================================================
// DETERMINISTIC SPEC CASES
// ============================================================================

#[test]
fn test_boundary_first_to_last_and_back() {
    let storage = MockStorage::new();
    let (columns, cards) = seed_board(&storage, &[4]);

    // First to last: every other card steps down by one.
    storage.card_move(cards[0][0], columns[0], 3).expect("move");
    let order: Vec<CardId> = storage
        .card_list_by_column(columns[0])
        .expect("list")
        .iter()
        .map(|c| c.card_id)
        .collect();
    assert_eq!(
        order,
        vec![cards[0][1], cards[0][2], cards[0][3], cards[0][0]]
    );

    // Last to first: the inverse shift restores the seed ordering.
    storage.card_move(cards[0][0], columns[0], 0).expect("move");
    let order: Vec<CardId> = storage
        .card_list_by_column(columns[0])
        .expect("list")
        .iter()
        .map(|c| c.card_id)
        .collect();
    assert_eq!(order, cards[0]);
}

#[test]
fn test_cross_column_worked_example() {
    // A = [a, b, c], B = [x, y]; move b to B at 1.
    // Expected: A = [a(0), c(1)], B = [x(0), b(1), y(2)].
    let storage = MockStorage::new();
    let (columns, cards) = seed_board(&storage, &[3, 2]);
    let (a, b, c) = (cards[0][0], cards[0][1], cards[0][2]);
    let (x, y) = (cards[1][0], cards[1][1]);

    let moved = storage.card_move(b, columns[1], 1).expect("move");
    assert_eq!(moved.column_id, columns[1]);
    assert_eq!(moved.position, 1);

    let in_a: Vec<(CardId, Position)> = storage
        .card_list_by_column(columns[0])
        .expect("list")
        .iter()
        .map(|card| (card.card_id, card.position))
        .collect();
    assert_eq!(in_a, vec![(a, 0), (c, 1)]);

    let in_b: Vec<(CardId, Position)> = storage
        .card_list_by_column(columns[1])
        .expect("list")
        .iter()
        .map(|card| (card.card_id, card.position))
        .collect();
    assert_eq!(in_b, vec![(x, 0), (b, 1), (y, 2)]);
}

#[test]
fn test_missing_card_modifies_nothing() {
    let storage = MockStorage::new();
    let (columns, _cards) = seed_board(&storage, &[3, 2]);
    let before = snapshot(&storage, &columns);

    let err = storage
        .card_move(new_entity_id(), columns[1], 0)
        .expect_err("missing card");
    assert!(matches!(
        err,
        CorkboardError::Storage(StorageError::NotFound { .. })
    ));

    assert_eq!(snapshot(&storage, &columns), before);
}

#[test]
fn test_missing_target_column_modifies_nothing() {
    let storage = MockStorage::new();
    let (columns, cards) = seed_board(&storage, &[3]);
    let before = snapshot(&storage, &columns);

    let err = storage
        .card_move(cards[0][0], new_entity_id(), 0)
        .expect_err("missing column");
    assert!(matches!(
        err,
        CorkboardError::Storage(StorageError::NotFound { .. })
    ));

    assert_eq!(snapshot(&storage, &columns), before);
}

/// Property 7: concurrent moves into the same column serialize and leave the
/// ordering dense, whichever request wins.
#[test]
fn test_concurrent_moves_preserve_density() {
    let storage = Arc::new(MockStorage::new());
    let (columns, cards) = seed_board(&storage, &[6, 6, 6]);

    let handles: Vec<_> = (0..2)
        .map(|worker| {
            let storage = Arc::clone(&storage);
            let columns = columns.clone();
            let movers = cards[worker].clone();
            std::thread::spawn(move || {
                for (i, card_id) in movers.into_iter().enumerate() {
                    // Both workers target the shared destination column with
                    // overlapping position ranges.
                    storage
                        .card_move(card_id, columns[2], (i % 4) as Position)
                        .expect("concurrent move");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker panicked");
    }

    for &column_id in &columns {
        assert_dense(&storage, column_id);
    }
    // All twelve moved cards ended up in the destination column.
    assert_eq!(
        storage.card_list_by_column(columns[2]).expect("list").len(),
        18
    );
}
