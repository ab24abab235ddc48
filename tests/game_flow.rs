//! End-to-end session flows through the public facade.

use blockfall::core::Game;
use blockfall::types::{
    Command, GameConfig, GameEvent, PieceKind, Pos, RunState, EMPTY_CELL,
};

/// A playing session whose delays are zeroed so locks resolve
/// synchronously.
fn immediate_game(seed: u32) -> Game {
    let mut game = Game::new(GameConfig::immediate(), seed);
    game.apply(Command::TogglePause);
    game
}

/// Scan seeds until the first active piece has the wanted kind.
fn game_with_first_piece(kind: PieceKind) -> Game {
    for seed in 1..10_000 {
        let game = immediate_game(seed);
        if game.piece().map(|p| p.kind()) == Some(kind) {
            return game;
        }
    }
    unreachable!("uniform piece draw never produced {:?}", kind);
}

#[test]
fn square_dropped_flush_left_fills_the_corner() {
    let mut game = game_with_first_piece(PieceKind::O);

    while game.apply(Command::MoveLeft) {}
    assert_eq!(game.pos().x, 0);

    game.apply(Command::HardDrop);

    // The 2x2 square sits in the bottom-left corner.
    let v = PieceKind::O.cell_value();
    let h = game.config().height as i32;
    for y in [h - 2, h - 1] {
        assert_eq!(game.board().get(0, y), Some(v));
        assert_eq!(game.board().get(1, y), Some(v));
        assert_eq!(game.board().get(2, y), Some(EMPTY_CELL));
    }

    // No row completed: no score, no lines.
    assert_eq!(game.score(), 0);
    assert_eq!(game.lines(), 0);

    // The next piece is already active at the top, centered.
    let piece = game.piece().expect("respawn after lock");
    let expected_x = game.config().width as i32 / 2 - piece.width() as i32 / 2;
    assert_eq!(game.pos(), Pos::new(expected_x, 0));
    assert!(matches!(
        game.take_last_event(),
        Some(GameEvent::Locked { cleared: 0 })
    ));
}

#[test]
fn stacking_without_clearing_eventually_ends_the_run() {
    let mut game = immediate_game(42);

    // Center drops only: the stack grows and never completes a row.
    let mut drops = 0;
    while game.run_state() == RunState::Playing {
        game.apply(Command::HardDrop);
        drops += 1;
        assert!(drops < 100, "stack should have topped out");
    }

    assert_eq!(game.run_state(), RunState::GameOver);
    assert_eq!(game.lines(), 0);
    assert!(matches!(
        game.take_last_event(),
        Some(GameEvent::GameOver { score: 0 })
    ));

    // The dead session ignores everything but reset and pause.
    let board = game.board().clone();
    assert!(!game.apply(Command::HardDrop));
    game.tick(60_000);
    assert_eq!(game.board(), &board);

    assert!(game.apply(Command::Reset));
    assert_eq!(game.run_state(), RunState::Playing);
    assert_eq!(game.score(), 0);
}

#[test]
fn vertical_bar_rotates_flat_through_a_wall_kick() {
    let mut game = game_with_first_piece(PieceKind::I);

    // Flush left: the vertical bar's column offset lets it reach x = -1.
    while game.apply(Command::MoveLeft) {}
    assert_eq!(game.pos().x, -1);

    // Rotating to the horizontal bar needs a kick away from the wall.
    let turned = game.apply(Command::RotateCw);
    if turned {
        let piece = game.piece().unwrap();
        for (dx, _, _) in piece.occupied() {
            let x = game.pos().x + dx as i32;
            assert!(x >= 0 && x < game.config().width as i32);
        }
    } else {
        // A revert must leave the piece exactly where it was.
        assert_eq!(game.pos().x, -1);
        assert_eq!(game.piece().unwrap().kind(), PieceKind::I);
    }
}

#[test]
fn pause_mid_fall_and_resume_continues_the_run() {
    let mut game = immediate_game(7);

    game.tick(1001);
    let y = game.pos().y;
    assert!(y > 0);

    game.apply(Command::TogglePause);
    game.tick(30_000);
    assert_eq!(game.pos().y, y);

    game.apply(Command::TogglePause);
    game.tick(1001);
    assert_eq!(game.pos().y, y + 1);
}

#[test]
fn soft_drop_walks_the_piece_down_one_row_at_a_time() {
    let mut game = immediate_game(3);
    let y0 = game.pos().y;

    assert!(game.apply(Command::SoftDrop));
    assert!(game.apply(Command::SoftDrop));
    assert_eq!(game.pos().y, y0 + 2);
}
