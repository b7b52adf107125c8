// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of interactive commands

use anyhow::{anyhow, Result};
use lulugo_core::{coord, Target};

/// A line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place a stone or pass for the side to move
    Play(Target),
    Undo,
    Reset,
    Resign,
    History,
    Analyze,
    /// Settle the game on the analyzer's count
    Score,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <vertex>   play a stone, e.g. D4 (columns skip I)
  pass       pass the turn
  undo       take back the last move
  reset      clear the board
  resign     give up the game
  history    list the moves played
  analyze    ask the analysis engine about the position
  score      end the game on the analysis engine's count (also after two passes)
  help       show this text
  quit       leave";

/// Parse a command for a board of `board_size`
pub fn parse_command(input: &str, board_size: u8) -> Result<Command> {
    let input = input.trim();
    let command = match input.to_ascii_lowercase().as_str() {
        "pass" => Command::Play(Target::Pass),
        "undo" => Command::Undo,
        "reset" => Command::Reset,
        "resign" => Command::Resign,
        "history" | "moves" => Command::History,
        "analyze" | "analyse" => Command::Analyze,
        "score" | "count" => Command::Score,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => {
            let point = coord::decode(input, board_size).map_err(|e| {
                anyhow!("{}. Examples: 'D4', 'pass', 'undo', 'help'.", e)
            })?;
            Command::Play(Target::Point(point))
        }
    };
    Ok(command)
}
