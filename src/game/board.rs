use std::fmt;

use serde::{Deserialize, Serialize};

/// 棋盘格子数量。
pub const CELL_COUNT: usize = 9;
/// 中心格。
pub const CENTER: usize = 4;
/// 四个角格。
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// 8 条获胜连线：三行、三列、两条对角线。
pub const WIN_PATTERNS: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 棋子标记。`X` 为人类玩家（先手），`O` 为电脑。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Cell = Option<Mark>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum BoardError {
    InvalidLength { len: usize },
    InvalidCell { index: usize, value: String },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::InvalidLength { len } => {
                write!(f, "board must have {CELL_COUNT} cells, got {len}")
            }
            BoardError::InvalidCell { index, value } => {
                write!(f, "cell {index} holds unsupported value {value:?}")
            }
        }
    }
}

impl std::error::Error for BoardError {}

/// 3x3 棋盘，按行优先存储。
///
/// 在 JS 侧表示为长度为 9 的数组，元素为 `null`、`"X"` 或 `"O"`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<String>>", into = "Vec<Option<String>>")]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells.get(index).copied().flatten()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        index < CELL_COUNT && self.cells[index].is_none()
    }

    /// 返回放置后的新棋盘，原棋盘不变。
    ///
    /// 调用方负责保证 `index < CELL_COUNT` 且该格为空，越界会 panic。
    pub fn with_mark(mut self, index: usize, mark: Mark) -> Self {
        debug_assert!(index < CELL_COUNT, "cell {index} is outside the board");
        self.cells[index] = Some(mark);
        self
    }

    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        self.cells[index] = Some(mark);
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl From<[Cell; CELL_COUNT]> for Board {
    fn from(cells: [Cell; CELL_COUNT]) -> Self {
        Self::from_cells(cells)
    }
}

impl TryFrom<Vec<Option<String>>> for Board {
    type Error = BoardError;

    fn try_from(values: Vec<Option<String>>) -> Result<Self, Self::Error> {
        if values.len() != CELL_COUNT {
            return Err(BoardError::InvalidLength { len: values.len() });
        }

        let mut cells = [None; CELL_COUNT];
        for (index, value) in values.into_iter().enumerate() {
            cells[index] = match value.as_deref() {
                None => None,
                Some("X") => Some(Mark::X),
                Some("O") => Some(Mark::O),
                Some(other) => {
                    return Err(BoardError::InvalidCell {
                        index,
                        value: other.to_string(),
                    })
                }
            };
        }
        Ok(Self { cells })
    }
}

impl From<Board> for Vec<Option<String>> {
    fn from(board: Board) -> Self {
        board
            .cells
            .iter()
            .map(|cell| cell.map(|mark| mark.as_str().to_string()))
            .collect()
    }
}
