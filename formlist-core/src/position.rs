//! Position directives: `direction:anchor` addressing for list mutations.
//!
//! The anchor is the exact serialized form of an existing entry and may itself
//! contain `:` or `;`, so the directive splits on the first colon only. An
//! unresolvable anchor is not an error: inserts degrade to an append, moves to
//! a no-op. That fallback is a documented contract, not a defect.

use crate::entry::Entry;
use crate::list::ShowItemList;

// ============================================================================
// DIRECTION + POSITION
// ============================================================================

/// Direction token of a position directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Insert at the anchor's index, shifting the anchor right.
    Before,
    /// Insert immediately after the anchor.
    After,
    /// Remove the anchor, insert at its former index.
    Replace,
}

/// A parsed `direction:anchor` position directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Where to place the new entry relative to the anchor.
    pub direction: Direction,
    /// Exact serialized form of the anchor entry.
    pub anchor: String,
}

impl Position {
    /// Parse a directive string. Returns `None` for an empty directive, a
    /// directive without a colon, or an unrecognized direction token — all of
    /// which fall through to the append/no-op policy at the call site.
    pub fn parse(directive: &str) -> Option<Self> {
        let (direction, anchor) = directive.split_once(':')?;
        let direction = match direction.trim() {
            "before" => Direction::Before,
            "after" => Direction::After,
            "replace" => Direction::Replace,
            _ => return None,
        };
        Some(Self {
            direction,
            anchor: anchor.to_string(),
        })
    }

    /// Resolve this directive against a list: the index at which to insert,
    /// and for `replace`, the index to remove first. `None` when the anchor
    /// does not resolve to an existing entry.
    pub fn resolve(&self, list: &ShowItemList) -> Option<Placement> {
        let anchor_index = list.position_of(&self.anchor)?;
        Some(match self.direction {
            Direction::Before => Placement {
                insert_at: anchor_index,
                remove_at: None,
            },
            Direction::After => Placement {
                insert_at: anchor_index + 1,
                remove_at: None,
            },
            Direction::Replace => Placement {
                insert_at: anchor_index,
                remove_at: Some(anchor_index),
            },
        })
    }
}

/// A resolved placement: where to splice, and what to remove for `replace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index the new entry lands at.
    pub insert_at: usize,
    /// Index to remove before inserting (replace only).
    pub remove_at: Option<usize>,
}

/// Insert `entry` into `list` at the given directive. An empty directive, an
/// unparseable directive, or an anchor that resolves to nothing all degrade to
/// an append at the end.
pub fn insert_positioned(list: &mut ShowItemList, entry: Entry, directive: &str) {
    let placement = Position::parse(directive).and_then(|p| p.resolve(list));
    match placement {
        Some(Placement {
            insert_at,
            remove_at,
        }) => {
            if let Some(index) = remove_at {
                list.remove(index);
            }
            list.insert(insert_at, entry);
        }
        None => list.push(entry),
    }
}

// =============================================================================
// TESTS
// =============================================================================
