// SPDX-License-Identifier: MIT OR Apache-2.0

//! Match bookkeeping around a rule engine
//!
//! A [`Match`] adds turn order and a lifecycle to one [`RuleEngine`]. The
//! [`MatchTable`] keeps the active matches in memory, one mutex per match, which is
//! how concurrent callers satisfy the engine's single-writer requirement.

use crate::analysis::{AnalysisRequest, Analyzer};
use crate::record::{self, MoveRecord};
use crate::{Color, CoordError, HistoryError, Move, MoveError, RuleEngine, Target, UndoError};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// How a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One side resigned
    Resignation { winner: Color },
    /// Two consecutive passes; counting is up to the players
    BothPassed,
    /// Settled on an analyzer's score estimate, margin in tenths of a point
    Counted { winner: Color, margin_tenths: u32 },
}

impl Outcome {
    /// Result string in the usual `B+Resign` form, if the outcome decides a winner
    pub fn result(&self) -> Option<String> {
        match self {
            Outcome::Resignation { winner } => Some(format!("{}+Resign", winner.tag())),
            Outcome::BothPassed => None,
            Outcome::Counted {
                winner,
                margin_tenths,
            } => Some(format!(
                "{}+{}.{}",
                winner.tag(),
                margin_tenths / 10,
                margin_tenths % 10
            )),
        }
    }

    /// Outcome for a Black-relative score lead; a lead of zero or less goes to White
    pub fn counted(lead: f32) -> Self {
        let winner = if lead > 0.0 { Color::Black } else { Color::White };
        Outcome::Counted {
            winner,
            margin_tenths: (lead.abs() * 10.0).round() as u32,
        }
    }
}

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    Waiting,
    Playing,
    Ended(Outcome),
}

/// Errors from match operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no active match {0}")]
    UnknownMatch(Uuid),

    #[error("match is not in play")]
    NotPlaying,

    #[error("it is {expected:?}'s turn")]
    OutOfTurn { expected: Color },

    #[error(transparent)]
    Rule(#[from] MoveError),

    #[error(transparent)]
    Undo(#[from] UndoError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("counting failed: {0}")]
    Analysis(String),
}

/// One game between two players
#[derive(Debug, Clone)]
pub struct Match {
    id: Uuid,
    engine: RuleEngine,
    status: MatchStatus,
}

impl Match {
    /// Fresh match waiting for players
    pub fn new(size: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            engine: RuleEngine::new(size),
            status: MatchStatus::Waiting,
        }
    }

    /// Reload a match in play from its stored history
    pub fn load(id: Uuid, size: u8, moves: Vec<Move>) -> Result<Self, SessionError> {
        let engine = RuleEngine::from_history(size, moves)?;
        let status = if engine.both_passed() {
            MatchStatus::Ended(Outcome::BothPassed)
        } else {
            MatchStatus::Playing
        };
        Ok(Self { id, engine, status })
    }

    /// Mark a reloaded match as already decided
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.status = MatchStatus::Ended(outcome);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Both seats are filled
    pub fn start(&mut self) {
        if self.status == MatchStatus::Waiting {
            tracing::info!(id = %self.id, "match started");
            self.status = MatchStatus::Playing;
        }
    }

    /// Color expected to move next
    pub fn to_move(&self) -> Color {
        if self.engine.history().len() % 2 == 0 {
            Color::Black
        } else {
            Color::White
        }
    }

    fn ensure_playing(&self) -> Result<(), SessionError> {
        match self.status {
            MatchStatus::Playing => Ok(()),
            _ => Err(SessionError::NotPlaying),
        }
    }

    /// Play for `color`, enforcing turn order
    pub fn play(&mut self, color: Color, target: Target) -> Result<(), SessionError> {
        self.ensure_playing()?;
        let expected = self.to_move();
        if color != expected {
            return Err(SessionError::OutOfTurn { expected });
        }

        self.engine.play_move(color, target)?;

        if self.engine.both_passed() {
            tracing::info!(id = %self.id, "both players passed");
            self.status = MatchStatus::Ended(Outcome::BothPassed);
        }
        Ok(())
    }

    /// Take back the last move
    pub fn undo(&mut self) -> Result<(), SessionError> {
        self.ensure_playing()?;
        self.engine.undo().map_err(|err| {
            if let UndoError::CorruptHistory(cause) = &err {
                tracing::error!(id = %self.id, error = %cause, "match history corrupted");
            }
            SessionError::from(err)
        })
    }

    /// Start the game over on an empty board
    pub fn reset(&mut self) {
        self.engine.reset();
        if matches!(self.status, MatchStatus::Ended(_)) {
            self.status = MatchStatus::Playing;
        }
    }

    /// `color` gives up
    pub fn resign(&mut self, color: Color) -> Result<Outcome, SessionError> {
        self.ensure_playing()?;
        let outcome = Outcome::Resignation {
            winner: color.opposite(),
        };
        tracing::info!(id = %self.id, ?color, "resigned");
        self.status = MatchStatus::Ended(outcome);
        Ok(outcome)
    }

    /// End the match on the analyzer's score estimate.
    ///
    /// Allowed in play and after two passes; a resigned or counted match stays as it is.
    pub fn settle(
        &mut self,
        analyzer: &impl Analyzer,
        max_visits: u32,
    ) -> Result<Outcome, SessionError> {
        if !matches!(
            self.status,
            MatchStatus::Playing | MatchStatus::Ended(Outcome::BothPassed)
        ) {
            return Err(SessionError::NotPlaying);
        }

        let request = self.analysis_request(max_visits)?;
        let response = analyzer
            .analyze(&request)
            .map_err(|err| SessionError::Analysis(err.to_string()))?;
        let outcome = Outcome::counted(response.lead);

        tracing::info!(id = %self.id, lead = response.lead, "match settled by count");
        self.status = MatchStatus::Ended(outcome);
        Ok(outcome)
    }

    /// History in wire form, for persistence after every mutation
    pub fn records(&self) -> Result<Vec<MoveRecord>, CoordError> {
        record::to_records(self.engine.history())
    }

    /// Request for an analysis backend at the current position
    pub fn analysis_request(&self, max_visits: u32) -> Result<AnalysisRequest, CoordError> {
        Ok(AnalysisRequest {
            board_size: self.engine.board_size(),
            moves: self.records()?,
            max_visits,
        })
    }
}

/// Shared handle to one match
pub type MatchHandle = Arc<Mutex<Match>>;

/// Active matches held in memory
#[derive(Debug, Default)]
pub struct MatchTable {
    matches: Mutex<HashMap<Uuid, MatchHandle>>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new waiting match
    pub fn create(&self, size: u8) -> MatchHandle {
        let game = Match::new(size);
        let id = game.id();
        let handle = Arc::new(Mutex::new(game));
        self.matches.lock().insert(id, handle.clone());
        tracing::debug!(%id, size, "match created");
        handle
    }

    /// Return the match if it is in memory, otherwise rebuild it from stored moves
    pub fn load(&self, id: Uuid, size: u8, moves: Vec<Move>) -> Result<MatchHandle, SessionError> {
        if let Some(handle) = self.get(id) {
            return Ok(handle);
        }
        let handle = Arc::new(Mutex::new(Match::load(id, size, moves)?));
        let mut matches = self.matches.lock();
        Ok(matches.entry(id).or_insert(handle).clone())
    }

    pub fn get(&self, id: Uuid) -> Option<MatchHandle> {
        self.matches.lock().get(&id).cloned()
    }

    /// Run `f` with exclusive access to one match
    pub fn with_match<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Match) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let handle = self.get(id).ok_or(SessionError::UnknownMatch(id))?;
        let mut game = handle.lock();
        f(&mut game)
    }

    /// Drop a match from memory
    pub fn evict(&self, id: Uuid) -> Option<MatchHandle> {
        self.matches.lock().remove(&id)
    }

    /// Matches whose status passes `wanted`, ordered by id.
    ///
    /// Locks every match in turn; do not call it from inside [`MatchTable::with_match`].
    pub fn list(&self, wanted: impl Fn(&MatchStatus) -> bool) -> Vec<(Uuid, MatchStatus)> {
        let handles: Vec<MatchHandle> = self.matches.lock().values().cloned().collect();
        let mut listed: Vec<(Uuid, MatchStatus)> = handles
            .iter()
            .map(|handle| {
                let game = handle.lock();
                (game.id(), game.status())
            })
            .filter(|(_, status)| wanted(status))
            .collect();
        listed.sort_by_key(|(id, _)| *id);
        listed
    }

    pub fn len(&self) -> usize {
        self.matches.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
