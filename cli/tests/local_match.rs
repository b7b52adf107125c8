// SPDX-License-Identifier: MIT OR Apache-2.0

// Drives a local match the way the binary does: parse, play, persist, reload.
use lulugo_cli::command::{parse_command, Command};
use lulugo_cli::{render, store};
use lulugo_core::analysis::{MockAnalyzer, COUNTING_MAX_VISITS};
use lulugo_core::session::{Match, MatchStatus, Outcome, SessionError};
use lulugo_core::{Color, MoveError};
use uuid::Uuid;

fn run(game: &mut Match, lines: &[&str]) -> Vec<Result<(), SessionError>> {
    lines
        .iter()
        .map(|line| match parse_command(line, game.engine().board_size()).unwrap() {
            Command::Play(target) => game.play(game.to_move(), target),
            Command::Undo => game.undo(),
            Command::Resign => game.resign(game.to_move()).map(drop),
            Command::Score => game.settle(&MockAnalyzer::default(), COUNTING_MAX_VISITS).map(drop),
            other => panic!("unexpected command {:?}", other),
        })
        .collect()
}

#[test]
fn test_persist_and_resume() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");

    let mut game = Match::load(Uuid::new_v4(), 9, store::load_match(&path, 9)?.moves)?;
    assert_eq!(game.status(), MatchStatus::Playing);

    let results = run(&mut game, &["D4", "F6", "D4", "C3", "pass", "undo"]);
    assert!(results[0].is_ok());
    assert_eq!(
        results[2],
        Err(SessionError::Rule(MoveError::PointOccupied(
            lulugo_core::coord::decode("D4", 9)?
        )))
    );
    assert!(results[5].is_ok());
    store::save_match(&path, &game)?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    assert_eq!(json, serde_json::json!([["B", "D4"], ["W", "F6"], ["B", "C3"]]));

    let resumed = Match::load(Uuid::new_v4(), 9, store::load_match(&path, 9)?.moves)?;
    assert_eq!(resumed.to_move(), Color::White);
    assert_eq!(
        render::render_board(resumed.engine()),
        render::render_board(game.engine())
    );
    Ok(())
}

#[test]
fn test_tampered_history_is_refused() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");
    std::fs::write(&path, r#"[["B","E5"],["W","E5"]]"#)?;

    let moves = store::load_match(&path, 9)?.moves;
    let err = Match::load(Uuid::new_v4(), 9, moves).unwrap_err();
    assert!(matches!(err, SessionError::History(ref e) if e.index == 1));
    Ok(())
}

#[test]
fn test_two_passes_end_the_match() {
    let mut game = Match::load(Uuid::new_v4(), 9, Vec::new()).unwrap();
    let results = run(&mut game, &["E5", "pass", "pass"]);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(game.status(), MatchStatus::Ended(Outcome::BothPassed));

    game.reset();
    assert_eq!(game.status(), MatchStatus::Playing);
    assert!(game.engine().history().is_empty());
}

#[test]
fn test_missing_history_file_is_empty_game() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let saved = store::load_match(&dir.path().join("none.json"), 19)?;
    assert!(saved.moves.is_empty());
    assert!(saved.outcome.is_none());
    Ok(())
}

#[test]
fn test_counted_game_resumes_decided() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("game.json");

    let mut game = Match::load(Uuid::new_v4(), 9, Vec::new())?;
    let results = run(&mut game, &["E5", "pass", "pass", "score"]);
    assert!(results.iter().all(Result::is_ok));
    // The mock engine always calls the game even
    assert_eq!(game.status(), MatchStatus::Ended(Outcome::counted(0.0)));
    store::save_match(&path, &game)?;

    let saved = store::load_match(&path, 9)?;
    let mut resumed = Match::load(Uuid::new_v4(), 9, saved.moves)?;
    assert_eq!(resumed.status(), MatchStatus::Ended(Outcome::BothPassed));
    resumed = resumed.with_outcome(saved.outcome.unwrap());
    assert_eq!(resumed.status(), game.status());
    assert_eq!(run(&mut resumed, &["undo"]), vec![Err(SessionError::NotPlaying)]);
    Ok(())
}
