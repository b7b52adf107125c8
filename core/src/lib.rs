// SPDX-License-Identifier: MIT OR Apache-2.0

//! lulugo core - Go rule engine
//!
//! This crate provides the rule engine behind a two-player online Go board:
//! - Board representation with capture resolution and positional fingerprints
//! - Move legality (occupied points, suicide, positional superko)
//! - Deterministic history replay for undo and reload
//! - Coordinate labels (`A1`..`Z25`, skipping `I`) and the persisted move encoding
//! - Match bookkeeping and the analysis-engine request/response contract
//!
//! A [`RuleEngine`] is single-writer: callers serialize `play_move`, `undo` and
//! `reset` per match (see [`session::MatchTable`]).

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod analysis;
pub mod board;
pub mod coord;
pub mod engine;
pub mod record;
pub mod rules;
pub mod session;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use board::{Board, Fingerprint};
pub use engine::RuleEngine;

/// Player color in a Go game (Black or White)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Black player (first player)
    Black,
    /// White player (second player)
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Single-letter tag used in move records
    pub fn tag(&self) -> &'static str {
        match self {
            Color::Black => "B",
            Color::White => "W",
        }
    }
}

/// A board point, zero-based, row 0 being the row labelled `1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Check if coordinate is valid for a board of given size
    pub fn is_valid(&self, board_size: u8) -> bool {
        self.row < board_size && self.col < board_size
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match coord::encode(*self) {
            Ok(label) => f.write_str(&label),
            Err(_) => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

/// Where a move goes: a point, or nowhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Point(Coord),
    Pass,
}

/// A recorded move. Immutable once it is in a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub color: Color,
    pub target: Target,
}

impl Move {
    /// Stone placement at `coord`
    pub fn place(color: Color, coord: Coord) -> Self {
        Self {
            color,
            target: Target::Point(coord),
        }
    }

    /// Pass for `color`
    pub fn pass(color: Color) -> Self {
        Self {
            color,
            target: Target::Pass,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self.target, Target::Pass)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Point(coord) => write!(f, "{} {}", self.color.tag(), coord),
            Target::Pass => write!(f, "{} pass", self.color.tag()),
        }
    }
}

/// An occupied point, as reported by [`RuleEngine::current_stones`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stone {
    pub color: Color,
    pub coord: Coord,
}

/// Rule violations reported by [`RuleEngine::play_move`].
///
/// All of these leave the engine untouched and are meant to be relayed to the player.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The coordinate is outside the board
    #[error("point ({row}, {col}) is outside the {size}x{size} board")]
    OutOfBounds { row: u8, col: u8, size: u8 },

    /// The point already holds a stone
    #[error("point {0} is already occupied")]
    PointOccupied(Coord),

    /// The played stone's group would have no liberties after captures
    #[error("move at {0} would be suicide")]
    Suicide(Coord),

    /// The resulting position already occurred in this game
    #[error("move at {0} repeats an earlier board position (superko)")]
    SuperKo(Coord),
}

/// A previously accepted history no longer replays.
///
/// Raised by bulk load and by undo; indicates a bug or tampered persisted data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("history move {index} ({mv}) failed to replay: {source}")]
pub struct HistoryError {
    /// Zero-based position of the failing move in the history
    pub index: usize,
    pub mv: Move,
    #[source]
    pub source: MoveError,
}

/// Errors returned by [`RuleEngine::undo`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UndoError {
    #[error("nothing to undo")]
    NothingToUndo,

    /// Replay of the shortened history failed; the engine was reset to an empty board
    #[error("history corrupted, board reset: {0}")]
    CorruptHistory(#[from] HistoryError),
}

/// Errors converting between labels like `Q16` and board coordinates
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("empty coordinate label")]
    Empty,

    #[error("invalid column letter '{0}'")]
    BadColumn(char),

    #[error("invalid row number '{0}'")]
    BadRow(String),

    #[error("coordinate {label} is outside a {size}x{size} board")]
    OutOfRange { label: String, size: u8 },

    #[error("labels only cover boards up to 25x25, got {0}")]
    UnsupportedSize(u8),
}
