use serde::{Deserialize, Serialize};

use super::board::{Board, Mark, CELL_COUNT, WIN_PATTERNS};

/// 对局结果中的胜者；平局使用 `Draw`。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Winner {
    X,
    O,
    #[serde(rename = "draw")]
    Draw,
}

impl Winner {
    pub fn mark(self) -> Option<Mark> {
        match self {
            Winner::X => Some(Mark::X),
            Winner::O => Some(Mark::O),
            Winner::Draw => None,
        }
    }
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Winner::X,
            Mark::O => Winner::O,
        }
    }
}

/// 终局判定。平局时 `winning_line` 为空。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub winner: Winner,
    pub winning_line: Vec<usize>,
}

impl Verdict {
    pub fn win(mark: Mark, line: [usize; 3]) -> Self {
        Self {
            winner: mark.into(),
            winning_line: line.to_vec(),
        }
    }

    pub fn draw() -> Self {
        Self {
            winner: Winner::Draw,
            winning_line: Vec::new(),
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner == Winner::Draw
    }
}

/// 按行、列、对角线的顺序检查连线；无人获胜且棋盘已满时判为平局。
pub fn evaluate(board: &Board) -> Option<Verdict> {
    for pattern in WIN_PATTERNS {
        let [a, b, c] = pattern;
        if let Some(mark) = board.get(a) {
            if board.get(b) == Some(mark) && board.get(c) == Some(mark) {
                return Some(Verdict::win(mark, pattern));
            }
        }
    }

    if board.is_full() {
        return Some(Verdict::draw());
    }

    None
}

pub fn empty_cells(board: &Board) -> Vec<usize> {
    (0..CELL_COUNT)
        .filter(|&index| board.is_empty_at(index))
        .collect()
}

pub fn is_terminal(board: &Board) -> bool {
    evaluate(board).is_some()
}
