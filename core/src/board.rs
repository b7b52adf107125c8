// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation and manipulation

use crate::rules::{find_group, liberties};
use crate::{Color, Coord, MoveError, Stone};
use std::fmt;

/// Represents the Go board with stones and empty positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Size of the board (typically 9, 13, or 19)
    size: u8,
    /// Positions on the board, row-major
    positions: Vec<Option<Color>>,
}

/// What a successful [`Board::place`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Opposing stones removed by the placement
    pub captured: Vec<Coord>,
    /// Liberties of the placed stone's group after captures
    pub liberties: usize,
}

impl Board {
    /// Create a new empty board with the specified size
    pub fn new(size: u8) -> Self {
        let cells = (size as usize) * (size as usize);
        Self {
            size,
            positions: vec![None; cells],
        }
    }

    /// Get the size of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get the stone at the specified coordinate
    pub fn get(&self, coord: Coord) -> Result<Option<Color>, MoveError> {
        self.check_bounds(coord)?;
        Ok(self.positions[self.coord_to_index(coord)])
    }

    /// Place a stone on an empty point and remove any opposing groups left without
    /// liberties.
    ///
    /// The placed stone stays on the board even when its own group ends up with no
    /// liberties; [`Placement::liberties`] reports that and the caller decides.
    pub fn place(&mut self, coord: Coord, color: Color) -> Result<Placement, MoveError> {
        if self.get(coord)?.is_some() {
            return Err(MoveError::PointOccupied(coord));
        }

        let idx = self.coord_to_index(coord);
        self.positions[idx] = Some(color);

        let mut captured = Vec::new();
        for neighbor in self.adjacent_coords(coord) {
            if self.stone_at(neighbor) != Some(color.opposite()) {
                continue;
            }
            let group = find_group(self, neighbor);
            if liberties(self, &group) == 0 {
                for stone in &group {
                    self.remove(*stone);
                }
                captured.extend(group);
            }
        }

        let own_group = find_group(self, coord);
        Ok(Placement {
            captured,
            liberties: liberties(self, &own_group),
        })
    }

    /// Remove a stone at the specified coordinate
    pub fn remove(&mut self, coord: Coord) -> bool {
        if !coord.is_valid(self.size) {
            return false;
        }

        let idx = self.coord_to_index(coord);
        self.positions[idx].take().is_some()
    }

    /// Stone at an in-bounds coordinate; `None` for empty or off-board points
    pub(crate) fn stone_at(&self, coord: Coord) -> Option<Color> {
        if !coord.is_valid(self.size) {
            return None;
        }
        self.positions[self.coord_to_index(coord)]
    }

    /// Get adjacent coordinates (up, down, left, right)
    pub fn adjacent_coords(&self, coord: Coord) -> Vec<Coord> {
        let mut result = Vec::with_capacity(4);
        let Coord { row, col } = coord;

        if row > 0 {
            result.push(Coord::new(row - 1, col));
        }
        if row + 1 < self.size {
            result.push(Coord::new(row + 1, col));
        }
        if col > 0 {
            result.push(Coord::new(row, col - 1));
        }
        if col + 1 < self.size {
            result.push(Coord::new(row, col + 1));
        }

        result
    }

    /// All occupied points in row-major order
    pub fn stones(&self) -> Vec<Stone> {
        self.positions
            .iter()
            .enumerate()
            .filter_map(|(idx, point)| {
                point.map(|color| Stone {
                    color,
                    coord: self.index_to_coord(idx),
                })
            })
            .collect()
    }

    /// Count stones of specified color on the board
    pub fn count_stones_for(&self, color: Color) -> usize {
        self.positions
            .iter()
            .filter(|stone| **stone == Some(color))
            .count()
    }

    /// Fingerprint of the full stone layout
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[self.size]);
        let cells: Vec<u8> = self
            .positions
            .iter()
            .map(|point| match point {
                None => b'.',
                Some(Color::Black) => b'b',
                Some(Color::White) => b'w',
            })
            .collect();
        hasher.update(&cells);
        Fingerprint(*hasher.finalize().as_bytes())
    }

    fn check_bounds(&self, coord: Coord) -> Result<(), MoveError> {
        if coord.is_valid(self.size) {
            Ok(())
        } else {
            Err(MoveError::OutOfBounds {
                row: coord.row,
                col: coord.col,
                size: self.size,
            })
        }
    }

    /// Convert a coordinate to a vector index
    fn coord_to_index(&self, coord: Coord) -> usize {
        (coord.row as usize) * (self.size as usize) + (coord.col as usize)
    }

    fn index_to_coord(&self, idx: usize) -> Coord {
        let size = self.size as usize;
        Coord::new((idx / size) as u8, (idx % size) as u8)
    }
}

/// Blake3 digest of a board's stone layout.
///
/// Equal layouts give equal fingerprints no matter which moves produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &hex::encode(self.0)[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_get() {
        let board = Board::new(9);
        assert_eq!(
            board.get(Coord::new(9, 0)),
            Err(MoveError::OutOfBounds { row: 9, col: 0, size: 9 })
        );
        assert_eq!(board.get(Coord::new(8, 8)), Ok(None));
    }

    #[test]
    fn corner_has_two_neighbors() {
        let board = Board::new(9);
        assert_eq!(board.adjacent_coords(Coord::new(0, 0)).len(), 2);
        assert_eq!(board.adjacent_coords(Coord::new(4, 4)).len(), 4);
        assert!(Board::new(1).adjacent_coords(Coord::new(0, 0)).is_empty());
    }

    #[test]
    fn place_refuses_occupied_point() {
        let mut board = Board::new(5);
        board.place(Coord::new(2, 2), Color::Black).unwrap();
        assert_eq!(
            board.place(Coord::new(2, 2), Color::White),
            Err(MoveError::PointOccupied(Coord::new(2, 2)))
        );
        assert_eq!(board.get(Coord::new(2, 2)), Ok(Some(Color::Black)));
    }

    #[test]
    fn corner_capture() {
        let mut board = Board::new(5);
        board.place(Coord::new(0, 0), Color::White).unwrap();
        board.place(Coord::new(0, 1), Color::Black).unwrap();
        let placement = board.place(Coord::new(1, 0), Color::Black).unwrap();

        assert_eq!(placement.captured, vec![Coord::new(0, 0)]);
        assert_eq!(board.get(Coord::new(0, 0)), Ok(None));
        assert_eq!(board.count_stones_for(Color::White), 0);
    }

    #[test]
    fn fingerprint_depends_on_layout_only() {
        let mut a = Board::new(9);
        a.place(Coord::new(2, 2), Color::Black).unwrap();
        a.place(Coord::new(6, 6), Color::White).unwrap();

        let mut b = Board::new(9);
        b.place(Coord::new(6, 6), Color::White).unwrap();
        b.place(Coord::new(2, 2), Color::Black).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());

        b.remove(Coord::new(2, 2));
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(Board::new(9).fingerprint(), Board::new(13).fingerprint());
    }

    #[test]
    fn fingerprint_hex_forms() {
        let print = Board::new(9).fingerprint();
        let full = print.to_string();

        assert_eq!(full, hex::encode(print.as_bytes()));
        assert_eq!(full.len(), 64);
        assert_eq!(format!("{:?}", print), format!("Fingerprint({})", &full[..16]));
    }

    #[test]
    fn stones_are_row_major() {
        let mut board = Board::new(5);
        board.place(Coord::new(3, 1), Color::White).unwrap();
        board.place(Coord::new(0, 4), Color::Black).unwrap();
        let coords: Vec<Coord> = board.stones().iter().map(|s| s.coord).collect();
        assert_eq!(coords, vec![Coord::new(0, 4), Coord::new(3, 1)]);
    }
}
