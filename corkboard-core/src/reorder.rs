//! Positional reorder planning.
//!
//! Columns within a board and cards within a column carry a dense, zero-based
//! `position`. Relocating one child means shifting exactly the contiguous run
//! of siblings between the old and new slot, and nothing else. This module
//! computes those shifts as data (`MovePlan`); the storage layer applies them
//! atomically, either under a write lock (mock) or inside a SQL transaction
//! with row locking (Postgres).
//!
//! Invariant: for a fixed parent, the positions of its children are exactly
//! `{0, .., n-1}`. Every plan produced here preserves that invariant when
//! applied to a dense starting state.

use crate::error::{CorkboardResult, ValidationError};
use crate::Position;

// ============================================================================
// SHIFT ARITHMETIC
// ============================================================================

/// An inclusive range of sibling positions displaced by a fixed delta.
///
/// `end == None` means the range is unbounded above ("every sibling past
/// `start`"), which is how the gap left behind in a source parent is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingShift {
    /// Inclusive lower bound of affected positions.
    pub start: Position,
    /// Inclusive upper bound; `None` = unbounded.
    pub end: Option<Position>,
    /// Amount each affected position moves (-1 or +1).
    pub delta: Position,
}

impl SiblingShift {
    /// Whether a sibling at `position` is displaced by this shift.
    pub fn applies_to(&self, position: Position) -> bool {
        position >= self.start && self.end.is_none_or(|end| position <= end)
    }

    /// New position for a sibling currently at `position`.
    pub fn apply(&self, position: Position) -> Position {
        if self.applies_to(position) {
            position + self.delta
        } else {
            position
        }
    }
}

// ============================================================================
// MOVE PLANS
// ============================================================================

/// The minimal set of sibling updates required to relocate one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovePlan {
    /// Target equals the current slot; no row changes at all.
    Noop,
    /// Relocation within the current parent.
    WithinParent {
        shift: SiblingShift,
        new_position: Position,
    },
    /// Relocation into a different parent.
    AcrossParents {
        /// Closes the gap left behind: source siblings past the old slot.
        source_shift: SiblingShift,
        /// Opens a slot in the destination: target siblings at or past it.
        target_shift: SiblingShift,
        new_position: Position,
    },
}

/// Plan a move within a single parent.
///
/// `sibling_count` is the total number of children under the parent,
/// including the one being moved. Requested positions past the last slot are
/// clamped to `sibling_count - 1`; negative positions are rejected.
pub fn plan_within_parent(
    old_position: Position,
    requested_position: Position,
    sibling_count: Position,
) -> CorkboardResult<MovePlan> {
    let new_position = clamp_target(requested_position, sibling_count - 1)?;

    if new_position == old_position {
        return Ok(MovePlan::Noop);
    }

    let shift = if new_position > old_position {
        // Moving down: everyone the child passes over steps back by one.
        SiblingShift {
            start: old_position + 1,
            end: Some(new_position),
            delta: -1,
        }
    } else {
        // Moving up: everyone between the new and old slot steps forward.
        SiblingShift {
            start: new_position,
            end: Some(old_position - 1),
            delta: 1,
        }
    };

    Ok(MovePlan::WithinParent {
        shift,
        new_position,
    })
}

/// Plan a move into a different parent.
///
/// `old_position` is the child's slot in the source parent; `target_count`
/// is the number of children already in the destination (the moved child not
/// among them). Requested positions past the end are clamped to
/// `target_count`, i.e. append.
pub fn plan_across_parents(
    old_position: Position,
    requested_position: Position,
    target_count: Position,
) -> CorkboardResult<MovePlan> {
    let new_position = clamp_target(requested_position, target_count)?;

    Ok(MovePlan::AcrossParents {
        source_shift: SiblingShift {
            start: old_position + 1,
            end: None,
            delta: -1,
        },
        target_shift: SiblingShift {
            start: new_position,
            end: None,
            delta: 1,
        },
        new_position,
    })
}

fn clamp_target(requested: Position, max_slot: Position) -> Result<Position, ValidationError> {
    if requested < 0 {
        return Err(ValidationError::NegativePosition {
            position: requested,
        });
    }
    Ok(requested.min(max_slot.max(0)))
}

// ============================================================================
// DENSITY VALIDATION
// ============================================================================

/// Whether a set of sibling positions is exactly `{0, .., n-1}`.
///
/// Order of the input slice does not matter.
pub fn check_dense(positions: &[Position]) -> bool {
    let mut sorted: Vec<Position> = positions.to_vec();
    sorted.sort_unstable();
    sorted
        .iter()
        .enumerate()
        .all(|(expected, &actual)| actual == expected as Position)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ------------------------------------------------------------------------
    // Reference model: a parent's ordering as a Vec of child indices, where
    // Vec index = position. Plans must agree with naive remove + insert.
    // ------------------------------------------------------------------------

    fn apply_within(order: &mut Vec<u32>, moved: u32, plan: MovePlan) {
        match plan {
            MovePlan::Noop => {}
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                let mut positions: Vec<(u32, i32)> = order
                    .iter()
                    .enumerate()
                    .map(|(p, &c)| {
                        if c == moved {
                            (c, new_position)
                        } else {
                            (c, shift.apply(p as i32))
                        }
                    })
                    .collect();
                positions.sort_by_key(|&(_, p)| p);
                *order = positions.into_iter().map(|(c, _)| c).collect();
            }
            MovePlan::AcrossParents { .. } => panic!("within-parent test"),
        }
    }

    #[test]
    fn test_same_slot_is_noop() {
        let plan = plan_within_parent(2, 2, 5).unwrap();
        assert_eq!(plan, MovePlan::Noop);
    }

    #[test]
    fn test_move_down_shifts_passed_siblings_back() {
        let plan = plan_within_parent(1, 3, 5).unwrap();
        match plan {
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                assert_eq!(new_position, 3);
                assert_eq!(shift.delta, -1);
                // Exactly positions 2 and 3 are displaced.
                assert!(!shift.applies_to(1));
                assert!(shift.applies_to(2));
                assert!(shift.applies_to(3));
                assert!(!shift.applies_to(4));
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_move_up_shifts_displaced_siblings_forward() {
        let plan = plan_within_parent(3, 1, 5).unwrap();
        match plan {
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                assert_eq!(new_position, 1);
                assert_eq!(shift.delta, 1);
                assert!(!shift.applies_to(0));
                assert!(shift.applies_to(1));
                assert!(shift.applies_to(2));
                assert!(!shift.applies_to(3));
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_first_to_last_boundary() {
        // Moving position 0 to the last slot shifts every other sibling by -1.
        let n = 4;
        let plan = plan_within_parent(0, n - 1, n).unwrap();
        match plan {
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                assert_eq!(new_position, n - 1);
                for p in 1..n {
                    assert_eq!(shift.apply(p), p - 1);
                }
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_last_to_first_boundary() {
        let n = 4;
        let plan = plan_within_parent(n - 1, 0, n).unwrap();
        match plan {
            MovePlan::WithinParent {
                shift,
                new_position,
            } => {
                assert_eq!(new_position, 0);
                for p in 0..n - 1 {
                    assert_eq!(shift.apply(p), p + 1);
                }
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_negative_target_rejected() {
        let err = plan_within_parent(2, -1, 5).unwrap_err();
        assert!(matches!(
            err,
            crate::CorkboardError::Validation(ValidationError::NegativePosition { position: -1 })
        ));

        let err = plan_across_parents(0, -7, 3).unwrap_err();
        assert!(matches!(
            err,
            crate::CorkboardError::Validation(ValidationError::NegativePosition { position: -7 })
        ));
    }

    #[test]
    fn test_overshoot_clamps_to_last_slot() {
        // Same parent: slot n-1 is the last valid target.
        let plan = plan_within_parent(0, 100, 3).unwrap();
        assert!(matches!(
            plan,
            MovePlan::WithinParent {
                new_position: 2,
                ..
            }
        ));

        // Cross parent: slot target_count appends at the end.
        let plan = plan_across_parents(0, 100, 3).unwrap();
        assert!(matches!(
            plan,
            MovePlan::AcrossParents {
                new_position: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_move_into_empty_parent() {
        let plan = plan_across_parents(1, 0, 0).unwrap();
        match plan {
            MovePlan::AcrossParents {
                source_shift,
                target_shift,
                new_position,
            } => {
                assert_eq!(new_position, 0);
                assert!(source_shift.applies_to(2));
                assert!(!source_shift.applies_to(1));
                // No target siblings exist; the open shift touches nothing.
                assert_eq!(target_shift.delta, 1);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_cross_parent_worked_example() {
        // A = [a, b, c], B = [x, y]; move b to B at position 1.
        let plan = plan_across_parents(1, 1, 2).unwrap();
        match plan {
            MovePlan::AcrossParents {
                source_shift,
                target_shift,
                new_position,
            } => {
                // c at 2 closes the gap to 1; a at 0 stays.
                assert_eq!(source_shift.apply(0), 0);
                assert_eq!(source_shift.apply(2), 1);
                // x at 0 stays; y at 1 opens to 2; b lands at 1.
                assert_eq!(target_shift.apply(0), 0);
                assert_eq!(target_shift.apply(1), 2);
                assert_eq!(new_position, 1);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn test_check_dense() {
        assert!(check_dense(&[]));
        assert!(check_dense(&[0]));
        assert!(check_dense(&[2, 0, 1]));
        assert!(!check_dense(&[1, 2, 3]));
        assert!(!check_dense(&[0, 0, 1]));
        assert!(!check_dense(&[0, 2]));
    }

    // ------------------------------------------------------------------------
    // Property: applying a within-parent plan agrees with the naive
    // remove-then-insert model and keeps the ordering dense.
    // ------------------------------------------------------------------------

    proptest! {
        #[test]
        fn prop_within_parent_matches_remove_insert(
            n in 1usize..24,
            old in 0usize..24,
            requested in 0i32..32,
        ) {
            let old = old % n;
            let mut order: Vec<u32> = (0..n as u32).collect();
            let moved = order[old];

            let plan = plan_within_parent(old as i32, requested, n as i32).unwrap();
            apply_within(&mut order, moved, plan);

            // Reference model.
            let mut expected: Vec<u32> = (0..n as u32).collect();
            let child = expected.remove(old);
            let slot = (requested as usize).min(n - 1);
            expected.insert(slot, child);

            prop_assert_eq!(&order, &expected);

            // Positions implied by the final Vec are dense by construction;
            // verify the plan never produced duplicates along the way.
            let mut seen: Vec<u32> = order.clone();
            seen.sort_unstable();
            seen.dedup();
            prop_assert_eq!(seen.len(), n);
        }

        #[test]
        fn prop_cross_parent_preserves_density(
            source_n in 1usize..16,
            target_n in 0usize..16,
            old in 0usize..16,
            requested in 0i32..24,
        ) {
            let old = old % source_n;
            let plan = plan_across_parents(
                old as i32,
                requested,
                target_n as i32,
            ).unwrap();

            let (source_shift, target_shift, new_position) = match plan {
                MovePlan::AcrossParents { source_shift, target_shift, new_position } =>
                    (source_shift, target_shift, new_position),
                other => return Err(TestCaseError::fail(format!("unexpected plan {:?}", other))),
            };

            // Source parent loses the child at `old`.
            let source_after: Vec<i32> = (0..source_n as i32)
                .filter(|&p| p != old as i32)
                .map(|p| source_shift.apply(p))
                .collect();
            prop_assert!(check_dense(&source_after));

            // Target parent gains the child at `new_position`.
            let mut target_after: Vec<i32> = (0..target_n as i32)
                .map(|p| target_shift.apply(p))
                .collect();
            target_after.push(new_position);
            prop_assert!(check_dense(&target_after));
        }
    }
}
