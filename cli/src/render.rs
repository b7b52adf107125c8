// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.

use lulugo_core::coord::column_char;
use lulugo_core::{Color, Coord, RuleEngine};

/// Render the board as text, highest row at the top like a printed diagram
pub fn render_board(engine: &RuleEngine) -> String {
    let board = engine.board();
    let size = board.size();
    let mut output = String::new();

    let labels = column_labels(size);
    output.push_str(&labels);

    for row in (0..size).rev() {
        // Row number (1-indexed)
        output.push_str(&format!("{:2} ", row + 1));

        for col in 0..size {
            let symbol = match board.get(Coord::new(row, col)) {
                Ok(Some(Color::Black)) => "●",
                Ok(Some(Color::White)) => "○",
                _ => "+",
            };
            output.push_str(&format!(" {}", symbol));
        }

        // Add row number again on the right
        output.push_str(&format!(" {}", row + 1));
        output.push('\n');
    }

    output.push_str(&labels);
    output
}

fn column_labels(size: u8) -> String {
    let mut line = String::from("   ");
    for col in 0..size {
        line.push(' ');
        line.push(column_char(col).unwrap_or('?'));
    }
    line.push('\n');
    line
}

/// One-line status shown under the board
pub fn status_line(engine: &RuleEngine, to_move: Color) -> String {
    let board = engine.board();
    format!(
        "Move {} | {:?} to play | stones: Black {} White {}",
        engine.history().len() + 1,
        to_move,
        board.count_stones_for(Color::Black),
        board.count_stones_for(Color::White),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lulugo_core::Target;

    #[test]
    fn test_render_empty_9x9_board() {
        let engine = RuleEngine::new(9);
        let output = render_board(&engine);

        // Column labels skip I
        assert!(output.contains("A B C D E F G H J"));

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 11); // 2 label rows + 9 board rows
        assert!(lines[1].starts_with(" 9 "));
        assert!(lines[9].starts_with(" 1 "));
    }

    #[test]
    fn test_render_board_with_stones() {
        let mut engine = RuleEngine::new(9);
        engine
            .play_move(Color::Black, Target::Point(Coord::new(0, 0)))
            .unwrap();
        engine
            .play_move(Color::White, Target::Point(Coord::new(8, 8)))
            .unwrap();

        let output = render_board(&engine);
        let lines: Vec<&str> = output.lines().collect();

        // A1 is bottom-left, J9 top-right
        assert!(lines[9].starts_with(" 1  ●"));
        assert!(lines[1].ends_with("○ 9"));
    }

    #[test]
    fn test_status_line() {
        let engine = RuleEngine::new(9);
        assert_eq!(
            status_line(&engine, Color::Black),
            "Move 1 | Black to play | stones: Black 0 White 0"
        );
    }
}
