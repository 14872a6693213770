//! 井字棋核心逻辑：棋盘表示、终局判定与对局状态。

pub mod board;
pub mod rules;
pub mod state;

pub use board::{Board, BoardError, Cell, Mark, CELL_COUNT, CENTER, CORNERS, WIN_PATTERNS};
pub use rules::{empty_cells, evaluate, is_terminal, Verdict, Winner};
pub use state::{GameState, MoveError, HUMAN_MARK};
