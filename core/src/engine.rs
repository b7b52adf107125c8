// SPDX-License-Identifier: MIT OR Apache-2.0

//! The rule engine: one board, its move history and every position seen so far.
//!
//! The history is the source of truth. The board and the fingerprint set are derived
//! from it and are rebuilt from scratch by [`replay`] whenever they need to shrink.
//!
//! A `RuleEngine` has no internal locking. Callers must serialize `play_move`, `undo`
//! and `reset` per engine; distinct engines are independent.

use crate::board::{Board, Fingerprint};
use crate::rules::RuleValidator;
use crate::{Color, HistoryError, Move, MoveError, Stone, Target, UndoError};
use std::collections::HashSet;

/// Go rule engine for a single match
#[derive(Debug, Clone)]
pub struct RuleEngine {
    board: Board,
    moves: Vec<Move>,
    seen: HashSet<Fingerprint>,
    /// Set when an undo found the stored history unreplayable and reset the engine
    corruption: Option<HistoryError>,
}

/// Board and fingerprint set rebuilt from a move list
#[derive(Debug, Clone)]
pub struct Replayed {
    pub board: Board,
    pub seen: HashSet<Fingerprint>,
}

/// Rebuild the position reached by `moves` from an empty board of `size`.
///
/// Every move goes through the same checks as [`RuleEngine::play_move`].
pub fn replay(size: u8, moves: &[Move]) -> Result<Replayed, HistoryError> {
    let mut board = Board::new(size);
    let mut seen = HashSet::new();
    seen.insert(board.fingerprint());

    for (index, mv) in moves.iter().enumerate() {
        if let Target::Point(coord) = mv.target {
            let candidate = RuleValidator::new(&board, &seen)
                .check_move(coord, mv.color)
                .map_err(|source| HistoryError {
                    index,
                    mv: *mv,
                    source,
                })?;
            board = candidate.board;
            seen.insert(candidate.fingerprint);
        }
    }

    Ok(Replayed { board, seen })
}

impl RuleEngine {
    /// Create an engine with an empty board of the given size
    pub fn new(size: u8) -> Self {
        let board = Board::new(size);
        let mut seen = HashSet::new();
        seen.insert(board.fingerprint());
        Self {
            board,
            moves: Vec::new(),
            seen,
            corruption: None,
        }
    }

    /// Create an engine by replaying a stored history.
    ///
    /// A move that fails validation is a data-integrity error, never skipped.
    pub fn from_history(size: u8, moves: Vec<Move>) -> Result<Self, HistoryError> {
        let Replayed { board, seen } = replay(size, &moves).map_err(|err| {
            tracing::warn!(error = %err, "stored history rejected during load");
            err
        })?;
        tracing::debug!(moves = moves.len(), size, "history replayed");
        Ok(Self {
            board,
            moves,
            seen,
            corruption: None,
        })
    }

    /// Play a move, committing it only if it passes every rule.
    ///
    /// Passes are always accepted and leave the board and fingerprint set alone.
    pub fn play_move(&mut self, color: Color, target: Target) -> Result<(), MoveError> {
        if let Target::Point(coord) = target {
            let candidate = RuleValidator::new(&self.board, &self.seen).check_move(coord, color)?;
            if !candidate.captured.is_empty() {
                tracing::debug!(%coord, captured = candidate.captured.len(), "stones captured");
            }
            self.board = candidate.board;
            self.seen.insert(candidate.fingerprint);
        }

        let mv = Move { color, target };
        tracing::debug!(%mv, number = self.moves.len() + 1, "move accepted");
        self.moves.push(mv);
        Ok(())
    }

    /// Take back the last move and rebuild all derived state from the remaining history.
    ///
    /// If the remaining history fails to replay the engine is reset to an empty board
    /// and the failure is returned as [`UndoError::CorruptHistory`].
    pub fn undo(&mut self) -> Result<(), UndoError> {
        let undone = self.moves.pop().ok_or(UndoError::NothingToUndo)?;

        match replay(self.board.size(), &self.moves) {
            Ok(Replayed { board, seen }) => {
                self.board = board;
                self.seen = seen;
                tracing::debug!(%undone, remaining = self.moves.len(), "move undone");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "history failed to replay on undo, resetting board");
                self.reset();
                self.corruption = Some(err.clone());
                Err(UndoError::CorruptHistory(err))
            }
        }
    }

    /// Clear the board, history and seen positions
    pub fn reset(&mut self) {
        *self = Self::new(self.board.size());
    }

    /// Snapshot of every occupied point, row-major
    pub fn current_stones(&self) -> Vec<Stone> {
        self.board.stones()
    }

    /// The full move list
    pub fn history(&self) -> &[Move] {
        &self.moves
    }

    pub fn board_size(&self) -> u8 {
        self.board.size()
    }

    /// Read-only view of the live board
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of distinct positions seen, the empty board included
    pub fn positions_seen(&self) -> usize {
        self.seen.len()
    }

    /// Whether a position has occurred in this game
    pub fn has_seen(&self, fingerprint: &Fingerprint) -> bool {
        self.seen.contains(fingerprint)
    }

    /// The history failure that forced the last reset, if any
    pub fn corruption(&self) -> Option<&HistoryError> {
        self.corruption.as_ref()
    }

    /// Check that replaying the history reproduces the live board and seen positions
    pub fn is_consistent(&self) -> bool {
        match replay(self.board.size(), &self.moves) {
            Ok(replayed) => replayed.board == self.board && replayed.seen == self.seen,
            Err(_) => false,
        }
    }

    /// Whether the last two moves were passes
    pub fn both_passed(&self) -> bool {
        matches!(self.moves.as_slice(), [.., a, b] if a.is_pass() && b.is_pass())
    }

    /// Check a placement without committing it
    pub fn is_legal(&self, color: Color, target: Target) -> bool {
        match target {
            Target::Pass => true,
            Target::Point(coord) => RuleValidator::new(&self.board, &self.seen)
                .check_move(coord, color)
                .is_ok(),
        }
    }
}
