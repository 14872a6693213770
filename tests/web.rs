//! 浏览器端测试，使用 `wasm-pack test --headless --firefox` 运行。

#![cfg(target_arch = "wasm32")]

use serde_wasm_bindgen::{from_value, to_value};
use tictactoe_wasm::{
    empty_cells, evaluate_board, is_terminal, select_move, GameEngine, TurnResolution, Verdict, Winner,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_board(cells: [Option<&str>; 9]) -> JsValue {
    to_value(&cells).expect("board should convert")
}

#[wasm_bindgen_test]
fn evaluate_reports_anti_diagonal() {
    let board = js_board([None, None, Some("O"), None, Some("O"), None, Some("O"), None, None]);
    let verdict: Verdict =
        from_value(evaluate_board(board).expect("board is valid")).expect("verdict decodes");
    assert_eq!(verdict.winner, Winner::O);
    assert_eq!(verdict.winning_line, vec![2, 4, 6]);
}

#[wasm_bindgen_test]
fn evaluate_returns_null_for_ongoing_game() {
    let board = js_board([Some("X"), None, None, None, Some("O"), None, None, None, None]);
    assert!(evaluate_board(board).expect("board is valid").is_null());
}

#[wasm_bindgen_test]
fn empty_cells_returns_plain_array() {
    let board = js_board([Some("X"), None, Some("O"), None, None, Some("X"), None, Some("O"), None]);
    let cells: Vec<usize> =
        from_value(empty_cells(board).expect("board is valid")).expect("cells decode");
    assert_eq!(cells, vec![1, 3, 4, 6, 8]);
}

#[wasm_bindgen_test]
fn rejects_short_board() {
    let board = to_value(&vec![None::<&str>; 4]).expect("array should convert");
    assert!(is_terminal(board).is_err());
}

#[wasm_bindgen_test]
fn select_move_handles_full_board_and_fallback() {
    let full = js_board([
        Some("X"),
        Some("O"),
        Some("X"),
        Some("X"),
        Some("O"),
        Some("O"),
        Some("O"),
        Some("X"),
        Some("X"),
    ]);
    assert!(select_move(full, Some("easy".into())).expect("board is valid").is_null());

    let empty = js_board([None; 9]);
    let cell = select_move(empty, Some("unknown".into())).expect("board is valid");
    assert_eq!(cell.as_f64(), Some(4.0));
}

#[wasm_bindgen_test]
fn engine_plays_a_turn() {
    let mut engine = GameEngine::new(Some("hard".into()));
    let resolution: TurnResolution =
        from_value(engine.play(0).expect("move is legal")).expect("resolution decodes");
    assert_eq!(resolution.ai_move, Some(4));
    assert!(engine.play(4).is_err());
    engine.reset();
    assert_eq!(engine.difficulty(), "hard");
}
