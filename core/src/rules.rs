// SPDX-License-Identifier: MIT OR Apache-2.0

//! Game rules and validation logic

use crate::board::{Board, Fingerprint};
use crate::{Color, Coord, MoveError};
use std::collections::HashSet;

/// A legal placement, evaluated on a scratch copy of the board
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Board after the stone and its captures
    pub board: Board,
    /// Fingerprint of `board`
    pub fingerprint: Fingerprint,
    /// Opposing stones the placement removes
    pub captured: Vec<Coord>,
}

/// Validates placements against the occupied, suicide and positional superko rules
pub struct RuleValidator<'a> {
    /// The live board
    board: &'a Board,
    /// Every position seen so far in the game
    seen: &'a HashSet<Fingerprint>,
}

impl<'a> RuleValidator<'a> {
    /// Create a new rules validator
    pub fn new(board: &'a Board, seen: &'a HashSet<Fingerprint>) -> Self {
        Self { board, seen }
    }

    /// Check a placement and build the board it would produce.
    ///
    /// The live board is never touched; the caller commits [`Candidate::board`].
    pub fn check_move(&self, coord: Coord, color: Color) -> Result<Candidate, MoveError> {
        if self.board.get(coord)?.is_some() {
            return Err(MoveError::PointOccupied(coord));
        }

        let mut scratch = self.board.clone();
        let placement = scratch.place(coord, color)?;

        // Captures are resolved first, so a move that captures always has a liberty.
        if placement.liberties == 0 {
            return Err(MoveError::Suicide(coord));
        }

        let fingerprint = scratch.fingerprint();
        if self.seen.contains(&fingerprint) {
            tracing::debug!(%coord, ?color, "superko violation");
            return Err(MoveError::SuperKo(coord));
        }

        Ok(Candidate {
            board: scratch,
            fingerprint,
            captured: placement.captured,
        })
    }
}

/// Calculate the number of liberties for a group of stones
pub fn liberties(board: &Board, group: &[Coord]) -> usize {
    let mut liberties_set = HashSet::new();

    for &coord in group {
        for neighbor in board.adjacent_coords(coord) {
            if board.stone_at(neighbor).is_none() {
                liberties_set.insert(neighbor);
            }
        }
    }

    liberties_set.len()
}

/// Find all stones in a group connected to the stone at coord
pub fn find_group(board: &Board, coord: Coord) -> Vec<Coord> {
    let target_color = match board.stone_at(coord) {
        Some(color) => color,
        None => return Vec::new(),
    };

    let mut group = Vec::new();
    let mut visited = HashSet::new();
    let mut queue = vec![coord];

    while let Some(current) = queue.pop() {
        if !visited.insert(current) {
            continue;
        }
        group.push(current);

        for neighbor in board.adjacent_coords(current) {
            if board.stone_at(neighbor) == Some(target_color) && !visited.contains(&neighbor) {
                queue.push(neighbor);
            }
        }
    }

    group
}
