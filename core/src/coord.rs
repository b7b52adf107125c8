// SPDX-License-Identifier: MIT OR Apache-2.0

//! Coordinate labels: column letter (A-Z, skipping I) followed by a 1-based row number

use crate::{Coord, CoordError};

/// Column letters in board order
pub const COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Largest board the label scheme covers
pub const MAX_LABELLED_SIZE: u8 = 25;

/// Column letter for a zero-based column index
pub fn column_char(col: u8) -> Option<char> {
    COLUMNS.get(col as usize).map(|&b| b as char)
}

/// Zero-based column index for a letter, case-insensitive
pub fn column_index(letter: char) -> Option<u8> {
    let upper = letter.to_ascii_uppercase();
    COLUMNS
        .iter()
        .position(|&b| b as char == upper)
        .map(|idx| idx as u8)
}

/// Encode a coordinate as a label, e.g. `(15, 15)` -> `Q16`
pub fn encode(coord: Coord) -> Result<String, CoordError> {
    let col = column_char(coord.col)
        .filter(|_| coord.row < MAX_LABELLED_SIZE)
        .ok_or_else(|| CoordError::UnsupportedSize(coord.row.max(coord.col).saturating_add(1)))?;
    Ok(format!("{}{}", col, coord.row as u16 + 1))
}

/// Decode a label for a board of `size`, e.g. `Q16` -> `(15, 15)`
pub fn decode(label: &str, size: u8) -> Result<Coord, CoordError> {
    if size > MAX_LABELLED_SIZE {
        return Err(CoordError::UnsupportedSize(size));
    }

    let label = label.trim();
    let mut chars = label.chars();
    let letter = chars.next().ok_or(CoordError::Empty)?;
    let col = column_index(letter).ok_or(CoordError::BadColumn(letter))?;

    let digits = chars.as_str();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoordError::BadRow(digits.to_string()));
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Err(CoordError::BadRow(digits.to_string()));
    }

    let out_of_range = || CoordError::OutOfRange {
        label: label.to_uppercase(),
        size,
    };
    // No supported board has a three-digit row
    if significant.len() > 2 {
        return Err(out_of_range());
    }
    let row: u16 = significant
        .parse()
        .map_err(|_| CoordError::BadRow(digits.to_string()))?;
    if row > size as u16 || col >= size {
        return Err(out_of_range());
    }

    Ok(Coord::new((row - 1) as u8, col))
}
