// SPDX-License-Identifier: MIT OR Apache-2.0

//! lulugo CLI - Command-line interface for a local match
//!
//! Hosts one match in the terminal: both players type moves at the same prompt.
//! The move list is persisted after every change and replayed on the next start.

use anyhow::{Context, Result};
use clap::Parser;
use lulugo_cli::command::{parse_command, Command, HELP};
use lulugo_cli::config::{load_config, CliConfig, DEFAULT_CONFIG_FILE};
use lulugo_cli::{render, store};
use lulugo_core::analysis::{Analyzer, MockAnalyzer, COUNTING_MAX_VISITS};
use lulugo_core::session::{Match, MatchStatus, SessionError};
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tokio::signal;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "lulugo", about = "Play Go in the terminal", version)]
struct Args {
    /// Config file (created with defaults if missing)
    #[clap(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Board size (1-25), overrides the config file
    #[clap(short, long)]
    size: Option<u8>,

    /// JSON move list to resume from and save to, overrides the config file
    #[clap(long)]
    history: Option<PathBuf>,

    /// Enable debug logging
    #[clap(long)]
    debug: bool,
}

fn init_logging(config: &CliConfig, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = load_config(&args.config)?;
    let mut config = loaded.config;
    if let Some(size) = args.size {
        config.board_size = size;
    }
    if let Some(history) = args.history {
        config.history_path = Some(history);
    }
    config.validate()?;

    init_logging(&config, args.debug);
    if loaded.created {
        tracing::info!("Config file not found, created default at: {}", args.config.display());
    }

    let game = open_match(&config)?;
    let span = tracing::info_span!("match", id = %game.id());
    run_game_loop(game, &config).instrument(span).await
}

/// Resume the stored match, or start a fresh one
fn open_match(config: &CliConfig) -> Result<Match> {
    let saved = match &config.history_path {
        Some(path) => store::load_match(path, config.board_size)?,
        None => store::SavedMatch::default(),
    };

    let mut game = Match::load(Uuid::new_v4(), config.board_size, saved.moves)
        .context("Stored history does not replay")?;
    if let Some(outcome) = saved.outcome {
        game = game.with_outcome(outcome);
    }
    tracing::info!(
        size = config.board_size,
        moves = game.engine().history().len(),
        "match opened"
    );
    Ok(game)
}

/// Run the main game loop
async fn run_game_loop(mut game: Match, config: &CliConfig) -> Result<()> {
    let analyzer = MockAnalyzer::default();
    print_game_state(&game);

    let mut stdin_lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\nEnter a move (e.g., 'D4'), 'pass', or 'help':");

        let line = tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nReceived Ctrl+C, shutting down gracefully...");
                break;
            }
            result = stdin_lines.next_line() => match result {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => {
                    eprintln!("Error reading input: {}", e);
                    continue;
                }
            },
        };

        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line, config.board_size) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("Invalid input: {}", e);
                continue;
            }
        };

        let before = game.status();
        let changed = match command {
            Command::Play(target) => report(game.play(game.to_move(), target)),
            Command::Undo => report(game.undo()),
            Command::Reset => {
                game.reset();
                true
            }
            Command::Resign => report(game.resign(game.to_move()).map(drop)),
            Command::Score => report(game.settle(&analyzer, COUNTING_MAX_VISITS).map(drop)),
            Command::History => {
                print_history(&game);
                false
            }
            Command::Analyze => {
                analyze(&game, &analyzer, config.max_visits);
                false
            }
            Command::Help => {
                println!("{}", HELP);
                false
            }
            Command::Quit => break,
        };

        if changed {
            if let Some(path) = &config.history_path {
                store::save_match(path, &game)?;
            }
            print_game_state(&game);
        }

        if let (true, MatchStatus::Ended(outcome)) = (game.status() != before, game.status()) {
            match outcome.result() {
                Some(result) => println!("Game over: {}", result),
                None => println!("Both players passed. Type 'score' to count, or 'reset' to play again."),
            }
        }
    }

    Ok(())
}

/// Print a rejected action; returns whether the match changed
fn report(result: Result<(), SessionError>) -> bool {
    match result {
        Ok(()) => true,
        // The engine reset itself; the emptied history still has to be saved.
        Err(SessionError::Undo(e @ lulugo_core::UndoError::CorruptHistory(_))) => {
            eprintln!("{}", e);
            true
        }
        Err(e) => {
            eprintln!("Illegal: {}", e);
            false
        }
    }
}

fn analyze(game: &Match, analyzer: &impl Analyzer, max_visits: u32) {
    let response = game
        .analysis_request(max_visits)
        .map_err(anyhow::Error::from)
        .and_then(|request| analyzer.analyze(&request).map_err(anyhow::Error::from));

    match response {
        Ok(response) => {
            println!(
                "Black winrate {:.1}%, lead {:+.1} ({} visits)",
                response.winrate * 100.0,
                response.lead,
                response.visits
            );
            for rec in response.recommendations {
                println!("  {:<4} {:.1}%  pv: {}", rec.mv, rec.winrate * 100.0, rec.pv.join(" "));
            }
        }
        Err(e) => eprintln!("Analysis failed: {:#}", e),
    }
}

fn print_history(game: &Match) {
    for (number, mv) in game.engine().history().iter().enumerate() {
        println!("{:4}. {}", number + 1, mv);
    }
}

/// Print the current game state
fn print_game_state(game: &Match) {
    let engine = game.engine();
    println!("\n{}", render::render_board(engine));
    println!("{}", render::status_line(engine, game.to_move()));
}
