// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis engine interface
//!
//! The rule engine never talks to an analysis backend itself. Session code builds an
//! [`AnalysisRequest`] from the match history and hands it to an [`Analyzer`].
//! Winrates and leads are always from Black's point of view.

use crate::record::{self, MoveRecord, RecordError};
use crate::{coord, Color, Coord, HistoryError, RuleEngine, Target};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visits requested when the caller has no preference
pub const DEFAULT_MAX_VISITS: u32 = 500;

/// Visits spent on the final count that settles a match
pub const COUNTING_MAX_VISITS: u32 = 800;

/// A position to analyze, given as the moves that reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub board_size: u8,
    pub moves: Vec<MoveRecord>,
    pub max_visits: u32,
}

/// A candidate move with its principal variation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "move")]
    pub mv: String,
    pub winrate: f32,
    pub score_lead: f32,
    pub pv: Vec<String>,
}

/// Backend verdict on a position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub winrate: f32,
    pub lead: f32,
    pub recommendations: Vec<Recommendation>,
    pub visits: u32,
    /// Row-major, `board_size` rows; +1 Black, -1 White
    pub ownership: Vec<Vec<f32>>,
}

/// Errors from an analysis backend
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request history is unreadable: {0}")]
    BadRecord(#[from] RecordError),

    #[error("request history is illegal: {0}")]
    IllegalHistory(#[from] HistoryError),

    #[error("analysis backend failed: {0}")]
    Backend(String),
}

/// Analysis backend trait
pub trait Analyzer {
    /// Analyze the position reached by `request.moves`
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError>;
}

/// Deterministic stand-in for a real engine, for development and tests.
///
/// Recommends the first legal points in row-major order and reports an even game.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    /// Number of recommendations to return
    pub count: usize,
    /// Principal variation length
    pub pv_len: usize,
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self { count: 3, pv_len: 10 }
    }
}

impl MockAnalyzer {
    fn first_legal(engine: &RuleEngine, color: Color, skip: usize) -> Option<Coord> {
        let size = engine.board_size();
        (0..size)
            .flat_map(|row| (0..size).map(move |col| Coord::new(row, col)))
            .filter(|point| engine.is_legal(color, Target::Point(*point)))
            .nth(skip)
    }

    fn principal_variation(&self, engine: &RuleEngine, first: Coord, color: Color) -> Vec<String> {
        let mut line = engine.clone();
        let mut pv = Vec::with_capacity(self.pv_len);
        let mut next = Some(first);
        let mut to_play = color;

        while let Some(point) = next {
            if pv.len() >= self.pv_len || line.play_move(to_play, Target::Point(point)).is_err() {
                break;
            }
            match coord::encode(point) {
                Ok(label) => pv.push(label),
                Err(_) => break,
            }
            to_play = to_play.opposite();
            next = Self::first_legal(&line, to_play, 0);
        }

        pv
    }
}

impl Analyzer for MockAnalyzer {
    fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        let moves = record::from_records(&request.moves, request.board_size)?;
        let engine = RuleEngine::from_history(request.board_size, moves)?;
        let to_play = if engine.history().len() % 2 == 0 {
            Color::Black
        } else {
            Color::White
        };

        let mut recommendations = Vec::with_capacity(self.count);
        for skip in 0..self.count {
            let Some(point) = Self::first_legal(&engine, to_play, skip) else {
                break;
            };
            let mv = coord::encode(point).map_err(|err| AnalysisError::Backend(err.to_string()))?;
            recommendations.push(Recommendation {
                mv,
                winrate: 0.5,
                score_lead: 0.0,
                pv: self.principal_variation(&engine, point, to_play),
            });
        }

        let size = engine.board_size() as usize;
        let mut ownership = vec![vec![0.0; size]; size];
        for stone in engine.current_stones() {
            ownership[stone.coord.row as usize][stone.coord.col as usize] = match stone.color {
                Color::Black => 1.0,
                Color::White => -1.0,
            };
        }

        Ok(AnalysisResponse {
            winrate: 0.5,
            lead: 0.0,
            recommendations,
            visits: request.max_visits,
            ownership,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(moves: &[(&str, &str)]) -> AnalysisRequest {
        AnalysisRequest {
            board_size: 9,
            moves: moves
                .iter()
                .map(|(c, v)| MoveRecord(c.to_string(), v.to_string()))
                .collect(),
            max_visits: DEFAULT_MAX_VISITS,
        }
    }

    #[test]
    fn mock_recommends_legal_empty_points() {
        let response = MockAnalyzer::default()
            .analyze(&request(&[("B", "A1"), ("W", "B1")]))
            .unwrap();

        let picks: Vec<&str> = response.recommendations.iter().map(|r| r.mv.as_str()).collect();
        assert_eq!(picks, vec!["C1", "D1", "E1"]);
        assert_eq!(response.visits, DEFAULT_MAX_VISITS);
        assert_eq!(response.recommendations[0].pv.len(), 10);
        assert_eq!(response.recommendations[0].pv[0], "C1");
        assert_eq!(response.ownership[0][0], 1.0);
        assert_eq!(response.ownership[0][1], -1.0);
        assert_eq!(response.ownership[8][8], 0.0);
    }

    #[test]
    fn mock_rejects_illegal_history() {
        let result = MockAnalyzer::default().analyze(&request(&[("B", "A1"), ("W", "A1")]));
        assert!(matches!(result, Err(AnalysisError::IllegalHistory(_))));

        let result = MockAnalyzer::default().analyze(&request(&[("Q", "A1")]));
        assert!(matches!(result, Err(AnalysisError::BadRecord(_))));
    }

    #[test]
    fn response_uses_camel_case() {
        let response = MockAnalyzer { count: 1, pv_len: 1 }
            .analyze(&request(&[]))
            .unwrap();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recommendations"][0]["move"], "A1");
        assert!(json["recommendations"][0].get("scoreLead").is_some());
    }
}
