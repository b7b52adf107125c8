// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move records as they cross the engine boundary
//!
//! A move is stored and exchanged as a two-element array `[color, vertex]`, e.g.
//! `["B", "Q16"]` or `["W", "pass"]`. Histories are JSON arrays of these records;
//! [`Snapshot`] additionally offers a compact CBOR form.

use crate::{coord, Color, CoordError, HistoryError, Move, RuleEngine, Stone, Target};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Vertex string used for passes
pub const PASS: &str = "pass";

/// Errors decoding move records
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("unknown color tag '{0}', expected B or W")]
    BadColor(String),

    #[error(transparent)]
    Coord(#[from] CoordError),

    #[error("malformed history JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One move in wire form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord(pub String, pub String);

impl MoveRecord {
    /// Encode a move; fails only for points beyond the labelled range
    pub fn from_move(mv: &Move) -> Result<Self, CoordError> {
        let vertex = match mv.target {
            Target::Point(point) => coord::encode(point)?,
            Target::Pass => PASS.to_string(),
        };
        Ok(Self(mv.color.tag().to_string(), vertex))
    }

    /// Decode against a board of `size`
    pub fn to_move(&self, size: u8) -> Result<Move, RecordError> {
        let color = parse_color(&self.0)?;
        let vertex = self.1.trim();
        if vertex.eq_ignore_ascii_case(PASS) {
            return Ok(Move::pass(color));
        }
        Ok(Move::place(color, coord::decode(vertex, size)?))
    }

    pub fn color(&self) -> &str {
        &self.0
    }

    pub fn vertex(&self) -> &str {
        &self.1
    }
}

/// Parse a `B`/`W` tag, case-insensitive
pub fn parse_color(tag: &str) -> Result<Color, RecordError> {
    match tag.trim().to_ascii_uppercase().as_str() {
        "B" => Ok(Color::Black),
        "W" => Ok(Color::White),
        _ => Err(RecordError::BadColor(tag.to_string())),
    }
}

/// Encode a whole history as records
pub fn to_records(moves: &[Move]) -> Result<Vec<MoveRecord>, CoordError> {
    moves.iter().map(MoveRecord::from_move).collect()
}

/// Decode records against a board of `size`
pub fn from_records(records: &[MoveRecord], size: u8) -> Result<Vec<Move>, RecordError> {
    records.iter().map(|record| record.to_move(size)).collect()
}

/// Encode a history as a JSON array of records
pub fn encode_history(moves: &[Move]) -> Result<String, RecordError> {
    let records = to_records(moves)?;
    Ok(serde_json::to_string(&records)?)
}

/// Decode a JSON array of records
pub fn decode_history(json: &str, size: u8) -> Result<Vec<Move>, RecordError> {
    let records: Vec<MoveRecord> = serde_json::from_str(json)?;
    from_records(&records, size)
}

/// Render stones as `[color, vertex]` pairs for clients
pub fn stone_records(stones: &[Stone]) -> Result<Vec<MoveRecord>, CoordError> {
    stones
        .iter()
        .map(|stone| MoveRecord::from_move(&Move::place(stone.color, stone.coord)))
        .collect()
}

/// A board size plus the moves played on it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board_size: u8,
    pub moves: Vec<MoveRecord>,
}

impl Snapshot {
    /// Capture an engine's history
    pub fn of(engine: &RuleEngine) -> Result<Self, CoordError> {
        Ok(Self {
            board_size: engine.board_size(),
            moves: to_records(engine.history())?,
        })
    }

    /// Rebuild an engine, validating every stored move
    pub fn restore(&self) -> Result<RuleEngine, SnapshotError> {
        let moves = from_records(&self.moves, self.board_size)?;
        Ok(RuleEngine::from_history(self.board_size, moves)?)
    }

    /// Serialize to CBOR
    pub fn to_cbor(&self) -> Vec<u8> {
        match serde_cbor::to_vec(self) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!("Failed to serialize snapshot: {}", err);
                Vec::new()
            }
        }
    }

    /// Deserialize from CBOR
    pub fn from_cbor(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        match serde_cbor::from_slice(data) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::error!("Failed to deserialize snapshot: {}", err);
                None
            }
        }
    }
}

/// Errors restoring a [`Snapshot`]
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    #[test]
    fn records_serialize_as_pairs() {
        let moves = vec![
            Move::place(Color::Black, Coord::new(15, 15)),
            Move::pass(Color::White),
        ];
        let json = encode_history(&moves).unwrap();
        assert_eq!(json, r#"[["B","Q16"],["W","pass"]]"#);

        let records = to_records(&moves).unwrap();
        assert_eq!(records[0].color(), "B");
        assert_eq!(records[0].vertex(), "Q16");
        assert_eq!(records[1].vertex(), PASS);
    }

    #[test]
    fn decode_is_case_insensitive() {
        let moves = decode_history(r#"[["b","d4"],["W","PASS"]]"#, 19).unwrap();
        assert_eq!(
            moves,
            vec![Move::place(Color::Black, Coord::new(3, 3)), Move::pass(Color::White)]
        );
    }

    #[test]
    fn decode_rejects_bad_records() {
        assert!(matches!(
            decode_history(r#"[["X","D4"]]"#, 19),
            Err(RecordError::BadColor(_))
        ));
        assert!(matches!(
            decode_history(r#"[["B","T19"]]"#, 9),
            Err(RecordError::Coord(CoordError::OutOfRange { .. }))
        ));
        assert!(matches!(decode_history("{", 19), Err(RecordError::Json(_))));
    }

    #[test]
    fn stone_records_use_labels() {
        let stones = vec![Stone {
            color: Color::White,
            coord: Coord::new(0, 8),
        }];
        assert_eq!(
            stone_records(&stones).unwrap(),
            vec![MoveRecord("W".into(), "J1".into())]
        );
    }

    #[test]
    fn snapshot_cbor_restores_engine() {
        let mut engine = RuleEngine::new(9);
        engine.play_move(Color::Black, Target::Point(Coord::new(2, 2))).unwrap();
        engine.play_move(Color::White, Target::Pass).unwrap();

        let bytes = Snapshot::of(&engine).unwrap().to_cbor();
        let restored = Snapshot::from_cbor(&bytes).unwrap().restore().unwrap();

        assert_eq!(restored.history(), engine.history());
        assert_eq!(restored.current_stones(), engine.current_stones());
        assert!(Snapshot::from_cbor(&[]).is_none());
        assert!(Snapshot::from_cbor(&[0xff, 0x00]).is_none());
    }

    #[test]
    fn snapshot_with_illegal_move_fails_restore() {
        let snapshot = Snapshot {
            board_size: 9,
            moves: vec![
                MoveRecord("B".into(), "E5".into()),
                MoveRecord("W".into(), "E5".into()),
            ],
        };
        assert!(matches!(
            snapshot.restore(),
            Err(SnapshotError::History(HistoryError { index: 1, .. }))
        ));
    }
}
