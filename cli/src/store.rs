// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match persistence for the local game
//!
//! The file holds the bare `[["B","D4"], ...]` move list while the game is open. Once a
//! resignation or a count decides it, the moves are wrapped together with the outcome.

use anyhow::{Context, Result};
use lulugo_core::record::{self, MoveRecord};
use lulugo_core::session::{Match, MatchStatus, Outcome};
use lulugo_core::Move;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredMatch {
    Moves(Vec<MoveRecord>),
    Decided {
        moves: Vec<MoveRecord>,
        outcome: Outcome,
    },
}

/// A match as read back from disk
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavedMatch {
    pub moves: Vec<Move>,
    /// Set when the game was decided by resignation or count
    pub outcome: Option<Outcome>,
}

/// Read a stored match; a missing or empty file is a new game
pub fn load_match(path: &Path, board_size: u8) -> Result<SavedMatch> {
    if !path.exists() {
        return Ok(SavedMatch::default());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read history file: {}", path.display()))?;
    if json.trim().is_empty() {
        return Ok(SavedMatch::default());
    }

    let stored: StoredMatch = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse history file: {}", path.display()))?;
    let (records, outcome) = match stored {
        StoredMatch::Decided { moves, outcome } => (moves, Some(outcome)),
        StoredMatch::Moves(moves) => (moves, None),
    };
    let moves = record::from_records(&records, board_size)
        .with_context(|| format!("Failed to decode history file: {}", path.display()))?;

    Ok(SavedMatch { moves, outcome })
}

/// Write the match, replacing the previous file
pub fn save_match(path: &Path, game: &Match) -> Result<()> {
    let moves = game.records().context("Failed to encode history")?;
    let stored = match game.status() {
        // Two passes are already in the move list
        MatchStatus::Ended(outcome) if outcome != Outcome::BothPassed => {
            StoredMatch::Decided { moves, outcome }
        }
        _ => StoredMatch::Moves(moves),
    };
    let json = serde_json::to_string(&stored).context("Failed to encode history")?;

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)
        .with_context(|| format!("Failed to write history file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace history file: {}", path.display()))?;

    tracing::debug!(
        moves = game.engine().history().len(),
        path = %path.display(),
        "match saved"
    );
    Ok(())
}
