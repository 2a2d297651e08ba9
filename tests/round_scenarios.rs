//! End-to-end placement scenarios through the public round API.

use rand::rngs::StdRng;
use rand::SeedableRng;

use verbra_engine::engine::config::RulesConfig;
use verbra_engine::engine::error::GameError;
use verbra_engine::engine::models::{Event, LossReason, Move, RoundConfig, RoundPhase};
use verbra_engine::game::difficulty::profile_for;
use verbra_engine::game::pieces::shape_def;
use verbra_engine::game::round::Round;
use verbra_engine::game::types::{Grid, Piece, PieceCell, ShapeKind, SlotDisplay, Tray};
use verbra_engine::game::words::builtin_dictionary;

fn piece(id: u64, kind: ShapeKind, letters: &str) -> Piece {
    let def = shape_def(kind);
    Piece {
        id,
        shape: kind,
        cells: def
            .cells
            .iter()
            .zip(letters.chars())
            .map(|(&(row, col), letter)| PieceCell { row, col, letter })
            .collect(),
        width: def.width,
        height: def.height,
    }
}

fn tray_of(pieces: Vec<Piece>) -> Tray {
    let mut tray = Tray::default();
    for (slot, p) in pieces.into_iter().enumerate() {
        tray.set(slot, Some(p));
    }
    tray
}

fn fixed_round(level: u32, word: &str) -> Round {
    Round::with_word(level, word, &RulesConfig::default(), StdRng::seed_from_u64(2024))
}

#[test]
fn test_row_clear_with_two_needed_letters() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_grid(Grid::from_rows(&["", "", "", "", "", "XY...."]));
    round.set_tray(tray_of(vec![
        piece(1, ShapeKind::I4, "CDQQ"),
        piece(2, ShapeKind::Dot, "Q"),
    ]));

    let report = round.attempt_placement(0, 5, 4).unwrap();
    assert_eq!((report.anchor_row, report.anchor_col), (5, 2));
    assert_eq!(report.points, 200);
    assert_eq!(round.streak(), 1);
    assert_eq!(
        round.word_display(),
        vec![
            SlotDisplay::Revealed('A'),
            SlotDisplay::Revealed('B'),
            SlotDisplay::Captured('C'),
            SlotDisplay::Captured('D'),
            SlotDisplay::Revealed('E'),
        ]
    );
}

#[test]
fn test_streak_builds_across_consecutive_clears() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_grid(Grid::from_rows(&["", "", "", "", "XXXXX.", "XXXXX."]));
    round.set_tray(tray_of(vec![
        piece(1, ShapeKind::Dot, "Q"),
        piece(2, ShapeKind::Dot, "Q"),
        piece(3, ShapeKind::Dot, "Q"),
    ]));

    // Bottom row clears; the row above falls into its place.
    let first = round.place_at_anchor(0, 5, 5).unwrap();
    assert_eq!(first.points, 100);
    assert_eq!(round.streak(), 1);
    assert_eq!(round.grid().filled_count(), 5);

    let second = round.place_at_anchor(1, 5, 5).unwrap();
    assert_eq!(second.points, 125);
    assert_eq!(round.streak(), 2);

    let third = round.place_at_anchor(2, 0, 0).unwrap();
    assert_eq!(third.points, 0);
    assert_eq!(round.streak(), 0);
    assert_eq!(round.score(), 225);
    assert_eq!(round.lines_cleared(), 2);
}

#[test]
fn test_gravity_completed_line_is_a_chain() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_grid(Grid::from_rows(&["", "", "", "E.....", ".EEEEE", "QQQQQ."]));
    round.set_tray(tray_of(vec![piece(1, ShapeKind::Dot, "Q"), piece(2, ShapeKind::Dot, "Q")]));

    let report = round.place_at_anchor(0, 5, 5).unwrap();
    assert_eq!(report.chain_reactions, 1);
    // 100 for the first clear, then (100 + 25 + 50) * 2 with E captured in the chain
    assert_eq!(report.points, 100 + 350);
    assert!(round.word().is_captured(4));

    let depths: Vec<u32> = report
        .events
        .iter()
        .filter_map(|e| match e {
            Event::LinesCleared { chain_depth, .. } => Some(*chain_depth),
            _ => None,
        })
        .collect();
    assert_eq!(depths, vec![0, 1]);
}

#[test]
fn test_no_space_ends_round() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_grid(Grid::from_rows(&[
        "..XXXX", "X.XXXX", "XX.XXX", "XXX.XX", "XXXX.X", "XXXXX.",
    ]));
    round.set_tray(tray_of(vec![
        piece(1, ShapeKind::Dot, "Q"),
        piece(2, ShapeKind::L3, "QQQ"),
        piece(3, ShapeKind::I3, "QQQ"),
    ]));

    let report = round.place_at_anchor(0, 0, 1).unwrap();
    assert_eq!(report.lines_cleared, 0);
    assert_eq!(report.phase, RoundPhase::Lost(LossReason::NoSpace));
    assert!(round.legal_moves().is_empty());
    assert!(round.moves_remaining() > 0);
}

#[test]
fn test_rejections_change_nothing() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_tray(tray_of(vec![piece(1, ShapeKind::O, "QQQQ")]));
    let before = round.snapshot();

    assert_eq!(
        round.place_at_anchor(0, 5, 5),
        Err(GameError::InvalidPlacement { anchor_row: 5, anchor_col: 5 })
    );
    assert_eq!(
        round.apply_move(&Move {
            slot: 0,
            rotation: 3,
            anchor_row: 5,
            anchor_col: 0
        }),
        Err(GameError::InvalidPlacement { anchor_row: 5, anchor_col: 0 })
    );
    assert_eq!(round.rotate_slot(1), Err(GameError::EmptyTraySlot { slot: 1 }));

    let after = round.snapshot();
    assert_eq!(after.grid, before.grid);
    assert_eq!(after.tray, before.tray);
    assert_eq!(after.moves_remaining, before.moves_remaining);
    assert_eq!(after.score, before.score);
}

#[test]
fn test_seeded_rounds_replay_identically() {
    let dictionary = builtin_dictionary();
    let config = RoundConfig {
        level: 6,
        random_seed: Some(31337),
    };
    let play = || {
        let mut round = Round::new(&config, &dictionary, &RulesConfig::default()).unwrap();
        while !round.is_over() {
            let mv = round.legal_moves()[0];
            round.apply_move(&mv).unwrap();
        }
        round.events().to_vec()
    };
    assert_eq!(play(), play());
}

#[test]
fn test_move_budget_follows_level() {
    let rules = RulesConfig::default();
    let easy = fixed_round(1, "LANTERN");
    let hard = fixed_round(10, "LANTERN");
    assert_eq!(easy.move_budget(), 15 + 7 + 5);
    assert_eq!(hard.move_budget(), 15 + 7 - 4);
    assert_eq!(profile_for(10).move_bonus, -4);

    let tight = RulesConfig {
        base_moves: 0,
        min_moves: 5,
    };
    let floored = Round::with_word(10, "ABC", &tight, StdRng::seed_from_u64(1));
    assert_eq!(floored.move_budget(), 5);
    assert_eq!(rules.min_moves, 5);
}

#[test]
fn test_event_log_serializes_to_json() {
    let mut round = fixed_round(1, "ABCDE");
    round.set_tray(tray_of(vec![piece(1, ShapeKind::Dot, "A"), piece(2, ShapeKind::Dot, "B")]));
    round.place_at_anchor(0, 5, 0).unwrap();

    let json = serde_json::to_value(round.events()).unwrap();
    assert_eq!(json[0]["event_type"], "round_started");
    assert_eq!(json[1]["event_type"], "piece_placed");
    assert_eq!(json[1]["cells"], serde_json::json!([[5, 0]]));
    assert_eq!(json[2]["event_type"], "streak_reset");
}
