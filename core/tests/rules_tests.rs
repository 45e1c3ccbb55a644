// SPDX-License-Identifier: MIT OR Apache-2.0

use goban_core::rules::LifeAndDeathSettlingRule;
use goban_core::{
    BoardSize, Color, Game, GameConfig, GameError, GameEvent, IllegalMoveReason, KoRule, RuleSet,
    RulesPreset, Vertex,
};

fn new_game(size: u8, rules: RuleSet) -> Game {
    let mut config = GameConfig::with_size(BoardSize::new(size).unwrap());
    config.rules = rules;
    Game::new(config).unwrap()
}

fn at(game: &Game, label: &str) -> Vertex {
    Vertex::from_label(label, game.board().size()).unwrap()
}

/// Play labels in order; `-` passes
fn play_all(game: &mut Game, labels: &[&str]) {
    for label in labels {
        if *label == "-" {
            game.pass().unwrap();
        } else {
            let vertex = at(game, label);
            game.play(vertex)
                .unwrap_or_else(|e| panic!("{} should be legal: {}", label, e));
        }
    }
}

/// White stone at D5 inside a Black mouth, Black about to take it at E5
const KO_SETUP: [&str; 8] = ["C5", "E6", "D6", "E4", "D4", "F5", "A1", "D5"];

#[test]
fn centre_stone_has_four_liberties() {
    let mut game = new_game(9, RuleSet::default());
    let e5 = at(&game, "E5");
    let events = game.play(e5).unwrap();
    assert_eq!(game.board().liberties_at(e5), 4);
    assert_eq!(game.board().region_at(e5).size(), 1);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::StonesCaptured { .. })));
}

#[test]
fn surrounded_stone_is_captured_on_the_last_liberty() {
    let mut game = new_game(9, RuleSet::default());
    play_all(&mut game, &["E6", "E5", "E4", "A1", "D5", "A2"]);
    let e5 = at(&game, "E5");
    assert_eq!(game.board().get(e5), Some(Color::White));
    assert_eq!(game.board().liberties_at(e5), 1);

    let f5 = at(&game, "F5");
    let events = game.play(f5).unwrap();
    assert!(events.contains(&GameEvent::StonesCaptured {
        color: Color::White,
        vertices: vec![e5],
    }));
    assert_eq!(game.board().get(e5), None);
    assert_eq!(game.captures(Color::Black), 1);

    // every surrounding stone regains the point as a liberty
    for label in ["E6", "E4", "D5", "F5"] {
        assert_eq!(game.board().liberties_at(at(&game, label)), 4, "{}", label);
    }
    let empty = game.board().region_at(e5);
    assert_eq!(empty.color(), None);
    assert_eq!(empty.size(), 1);
    game.board().verify_integrity().unwrap();
}

#[test]
fn capturing_a_group_frees_all_its_points() {
    let mut game = new_game(9, RuleSet::default());
    // White pair on A1-B1 is closed in by A2, B2 and C1
    play_all(&mut game, &["A2", "A1", "B2", "B1", "C1"]);
    assert_eq!(game.board().get(at(&game, "A1")), None);
    assert_eq!(game.board().get(at(&game, "B1")), None);
    assert_eq!(game.captures(Color::Black), 2);
    let corner = game.board().region_at(at(&game, "A1"));
    assert_eq!(corner.size(), 2);
    game.board().verify_integrity().unwrap();
}

#[test]
fn immediate_ko_recapture_is_refused() {
    let mut game = new_game(9, RuleSet::preset(RulesPreset::Japanese));
    play_all(&mut game, &KO_SETUP);
    play_all(&mut game, &["E5"]);
    assert_eq!(game.board().get(at(&game, "D5")), None);

    let d5 = at(&game, "D5");
    assert_eq!(
        game.play(d5),
        Err(GameError::KoViolation {
            vertex: d5,
            rule: KoRule::SimpleKo
        })
    );

    // after an exchange elsewhere the ko can be taken back
    play_all(&mut game, &["J9", "J8", "D5"]);
    assert_eq!(game.board().get(at(&game, "E5")), None);
}

#[test]
fn superko_catches_repetition_through_passes() {
    for (ko_rule, legal) in [
        (KoRule::SimpleKo, true),
        (KoRule::PositionalSuperko, false),
        (KoRule::SituationalSuperko, false),
    ] {
        let mut rules = RuleSet::preset(RulesPreset::Chinese);
        rules.ko_rule = ko_rule;
        rules.life_and_death_settling_rule = LifeAndDeathSettlingRule::ThreePasses;
        let mut game = new_game(9, rules);
        play_all(&mut game, &KO_SETUP);
        play_all(&mut game, &["E5", "-", "-"]);

        let d5 = at(&game, "D5");
        assert_eq!(game.play(d5).is_ok(), legal, "{:?}", ko_rule);
    }
}

#[test]
fn single_stone_suicide_is_always_illegal() {
    for preset in [RulesPreset::Chinese, RulesPreset::NewZealand] {
        let mut game = new_game(9, RuleSet::preset(preset));
        play_all(&mut game, &["J9", "B1", "J8", "A2"]);
        let a1 = at(&game, "A1");
        assert_eq!(
            game.play(a1),
            Err(GameError::IllegalMove {
                vertex: a1,
                reason: IllegalMoveReason::Suicide
            })
        );
        assert_eq!(game.moves().len(), 4);
    }
}

#[test]
fn multi_stone_suicide_depends_on_the_rules() {
    let setup = ["A1", "B1", "J9", "B2", "J8", "A3"];

    let mut game = new_game(9, RuleSet::preset(RulesPreset::Chinese));
    play_all(&mut game, &setup);
    let a2 = at(&game, "A2");
    assert!(matches!(
        game.play(a2),
        Err(GameError::IllegalMove {
            reason: IllegalMoveReason::Suicide,
            ..
        })
    ));

    let mut game = new_game(9, RuleSet::preset(RulesPreset::NewZealand));
    play_all(&mut game, &setup);
    let events = game.play(a2).unwrap();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::StonesCaptured { color: Color::Black, vertices } if vertices.len() == 2
    )));
    assert_eq!(game.board().get(at(&game, "A1")), None);
    assert_eq!(game.board().get(a2), None);
    assert_eq!(game.captures(Color::White), 2);
    game.board().verify_integrity().unwrap();
}

#[test]
fn playing_into_a_captured_point_is_legal() {
    let mut game = new_game(9, RuleSet::default());
    play_all(&mut game, &["B1", "A1", "A2"]);
    // White may not refill A1 while it has no liberty and captures nothing
    let a1 = at(&game, "A1");
    assert!(game.play(a1).is_err());
    play_all(&mut game, &["J9", "A1"]);
    assert_eq!(game.board().get(a1), Some(Color::Black));
}

#[test]
fn wall_splits_the_empty_region() {
    let mut game = new_game(7, RuleSet::default());
    play_all(
        &mut game,
        &["D1", "A7", "D2", "B7", "D3", "C7", "D4", "E7", "D5", "F7", "D6", "G7", "D7"],
    );
    let board = game.board();
    let left = board.region_at(at(&game, "A1"));
    let right = board.region_at(at(&game, "G1"));
    assert_eq!(left.color(), None);
    assert_eq!(left.size(), 18);
    assert_eq!(right.size(), 18);
    assert_ne!(
        board.point(at(&game, "A1")).region(),
        board.point(at(&game, "G1")).region()
    );
    board.verify_integrity().unwrap();
}

#[test]
fn out_of_range_labels_are_rejected() {
    let size = BoardSize::NINE;
    assert!(matches!(
        Vertex::from_label("K5", size),
        Err(GameError::InvalidVertex(_))
    ));
    assert!(Vertex::from_label("A10", size).is_err());
    assert!(Vertex::from_label("I3", BoardSize::NINETEEN).is_err());
}
