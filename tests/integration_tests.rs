//! Integration tests for a full session driven through the public API

use falling_blocks::core::{Board, GameController, GameEvent, NoopSink, PieceFactory};
use falling_blocks::types::{Color, ConfigError, GameAction, GameConfig, GameStatus};

fn recorded(seed: u32) -> GameController<Vec<GameEvent>> {
    GameController::with_sink(GameConfig::default(), seed, Vec::new()).unwrap()
}

#[test]
fn test_game_lifecycle() {
    let game = GameController::new(GameConfig::default(), 12345).unwrap();
    assert_eq!(game.status(), GameStatus::Running);
    assert!(game.current().is_some());
    assert_eq!(game.session_id(), 1);
}

#[test]
fn test_piece_descends_one_row_per_interval() {
    let mut game = recorded(1);
    let interval = game.tick_interval_ms();
    let spawned = game.current().unwrap();
    assert_eq!((spawned.x, spawned.y), (5, 19));

    for step in 1..=19 {
        assert!(game.on_tick(interval));
        let piece = game.current().unwrap();
        assert_eq!(piece.y, 19 - step);
        assert_eq!(piece.x, 5);
    }
    assert_eq!(game.board().occupied_count(), 0);

    assert!(game.on_tick(interval));
    assert_eq!(game.board().occupied_count(), 4);
    let next = game.current().unwrap();
    assert_eq!((next.x, next.y), (5, 19));

    let committed = game
        .sink()
        .iter()
        .filter(|e| matches!(e, GameEvent::PieceCommitted { .. }))
        .count();
    let spawned = game
        .sink()
        .iter()
        .filter(|e| matches!(e, GameEvent::PieceSpawned { .. }))
        .count();
    assert_eq!(committed, 1);
    assert_eq!(spawned, 2);
}

#[test]
fn test_small_deltas_accumulate() {
    let mut game = recorded(3);
    for _ in 0..12 {
        assert!(!game.on_tick(16));
    }
    assert_eq!(game.time_accumulator_ms(), 192);
    assert!(game.on_tick(16));
    assert_eq!(game.time_accumulator_ms(), 0);
    assert_eq!(game.current().unwrap().y, 18);
}

#[test]
fn test_move_left_until_wall() {
    let mut game = recorded(9);
    let mut moves = 0;
    while game.apply_action(GameAction::MoveLeft) {
        moves += 1;
        assert!(moves <= 5);
    }
    assert_eq!(moves, 5);
    assert_eq!(game.current().unwrap().x, 0);

    let board = game.board().clone();
    let piece = game.current();
    let events = game.sink().len();

    assert!(!game.apply_horizontal(-1));
    assert_eq!(game.current(), piece);
    assert_eq!(game.board(), &board);
    assert_eq!(game.sink().len(), events);
}

#[test]
fn test_full_top_row_ends_the_session() {
    let config = GameConfig::default();
    let mut board = Board::new(config.cols, config.rows);
    for x in 0..config.cols {
        board.set(x, 19, Some(Color::Red));
    }

    let mut game = GameController::with_board(config, 4, board, Vec::new()).unwrap();
    let mut frames = 0;
    while !game.is_over() {
        game.on_tick(config.tick_interval_ms);
        frames += 1;
        assert!(frames < 100, "session never ended");
    }
    assert!(game.current().is_none());

    let board = game.board().clone();
    for _ in 0..20 {
        assert!(!game.on_tick(config.tick_interval_ms));
        assert!(!game.apply_rotate());
    }
    assert_eq!(game.board(), &board);

    let overs = game
        .sink()
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver))
        .count();
    assert_eq!(overs, 1);
    assert_eq!(game.sink().last(), Some(&GameEvent::GameOver));
}

#[test]
fn test_unattended_game_eventually_tops_out() {
    let mut game = GameController::new(GameConfig::default(), 31337).unwrap();
    let mut steps = 0;
    while !game.is_over() {
        game.on_tick(200);
        steps += 1;
        assert!(steps < 20_000, "stack never reached the ceiling");
    }
    assert_eq!(game.status(), GameStatus::Over);
    assert!(game.pieces_committed() > 0);
}

#[test]
fn test_rows_removed_during_play() {
    // Floor row filled everywhere except under the first piece's bottom cells
    let config = GameConfig::default();
    let seed = 8;
    let first = PieceFactory::new(seed)
        .random_piece()
        .placed_at(config.spawn_x, 0);
    let holes: Vec<i32> = first.cells().filter(|p| p.y == 0).map(|p| p.x).collect();

    let mut board = Board::new(config.cols, config.rows);
    for x in (0..config.cols).filter(|x| !holes.contains(x)) {
        board.set(x, 0, Some(Color::Red));
    }
    let filled = board.occupied_count();

    let mut game = GameController::with_board(config, seed, board, Vec::new()).unwrap();
    assert_eq!(game.current().unwrap().kind, first.kind);

    let mut frames = 0;
    while game.pieces_committed() == 0 {
        game.on_tick(config.tick_interval_ms);
        frames += 1;
        assert!(frames < 100, "piece never landed");
    }

    assert_eq!(game.status(), GameStatus::Running);
    assert!(game.rows_removed() > 0);
    assert_eq!(game.rows_removed(), 1);
    assert!(game.board().find_full_rows().rows.is_empty());
    assert_eq!(game.board().occupied_count(), filled + 4 - config.cols as usize);

    let removed: Vec<usize> = game
        .sink()
        .iter()
        .filter_map(|e| match e {
            GameEvent::RowRemoved { row } => Some(*row),
            _ => None,
        })
        .collect();
    assert_eq!(removed, vec![0]);
}

#[test]
fn test_pause_and_resume() {
    let mut game = recorded(2);
    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.status(), GameStatus::Paused);
    assert!(!game.on_tick(10_000));
    assert!(!game.apply_action(GameAction::MoveRight));
    assert_eq!(game.current().unwrap().y, 19);

    assert!(game.apply_action(GameAction::Resume));
    assert!(game.on_tick(200));
    assert_eq!(game.current().unwrap().y, 18);
}

#[test]
fn test_restart_after_game_over() {
    let mut game = recorded(6);
    game.game_over();
    assert!(game.is_over());

    game.start_game(GameConfig::default()).unwrap();
    assert_eq!(game.status(), GameStatus::Running);
    assert_eq!(game.session_id(), 2);
    assert_eq!(game.board().occupied_count(), 0);
    assert_eq!(game.pieces_committed(), 0);
}

#[test]
fn test_invalid_configs_never_start() {
    let bad = [
        GameConfig {
            cols: 0,
            ..GameConfig::default()
        },
        GameConfig {
            rows: -1,
            ..GameConfig::default()
        },
        GameConfig {
            spawn_x: 12,
            ..GameConfig::default()
        },
        GameConfig {
            tick_interval_ms: 0,
            ..GameConfig::default()
        },
    ];
    for config in bad {
        assert!(GameController::new(config, 1).is_err(), "{:?}", config);
    }

    let board = Board::new(13, 19);
    assert!(matches!(
        GameController::with_board(GameConfig::default(), 1, board, NoopSink),
        Err(ConfigError::BoardSizeMismatch { .. })
    ));
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut game = recorded(11);
    game.on_tick(200);
    let snap = game.snapshot();
    let json = serde_json::to_string(&snap).unwrap();
    let back: falling_blocks::core::GameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snap);
    assert!(json.contains(r#""status":"running""#));
}
