use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::{Board, Mark, CELL_COUNT};
use super::rules::{evaluate, Verdict};
use crate::ai::{AiAgent, AiDecision, AiDifficulty};

/// 人类玩家使用的标记，总是先手。
pub const HUMAN_MARK: Mark = Mark::X;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum MoveError {
    GameFinished,
    NotPlayerTurn { expected: Mark, actual: Mark },
    CellOutOfRange { index: usize },
    CellOccupied { index: usize },
    NoMoveAvailable,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameFinished => f.write_str("game is already finished"),
            MoveError::NotPlayerTurn { expected, actual } => {
                write!(f, "it is {expected}'s turn, not {actual}'s")
            }
            MoveError::CellOutOfRange { index } => {
                write!(f, "cell {index} is outside the board")
            }
            MoveError::CellOccupied { index } => write!(f, "cell {index} is already taken"),
            MoveError::NoMoveAvailable => f.write_str("no empty cell left to play"),
        }
    }
}

impl std::error::Error for MoveError {}

/// 单局对局状态。判定结果总是由棋盘重新计算，`outcome` 只是缓存。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Mark,
    pub difficulty: AiDifficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Verdict>,
}

impl GameState {
    pub fn new(difficulty: AiDifficulty) -> Self {
        Self {
            board: Board::new(),
            current_player: HUMAN_MARK,
            difficulty,
            outcome: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&Verdict> {
        self.outcome.as_ref()
    }

    pub fn move_count(&self) -> usize {
        self.board.occupied_count()
    }

    /// 人类落子。
    pub fn play(&mut self, index: usize) -> Result<Option<Verdict>, MoveError> {
        self.place(HUMAN_MARK, index)
    }

    pub fn place(&mut self, mark: Mark, index: usize) -> Result<Option<Verdict>, MoveError> {
        if self.is_finished() {
            return Err(MoveError::GameFinished);
        }
        if mark != self.current_player {
            return Err(MoveError::NotPlayerTurn {
                expected: self.current_player,
                actual: mark,
            });
        }
        if index >= CELL_COUNT {
            return Err(MoveError::CellOutOfRange { index });
        }
        if !self.board.is_empty_at(index) {
            return Err(MoveError::CellOccupied { index });
        }

        self.board.place(index, mark);
        self.outcome = evaluate(&self.board);
        if self.outcome.is_none() {
            self.current_player = mark.opponent();
        }
        Ok(self.outcome.clone())
    }

    /// 电脑应手：向 `agent` 询问落子并以其标记落下。失败时状态不变。
    pub fn apply_ai_move<R: Rng>(
        &mut self,
        agent: &mut AiAgent<R>,
    ) -> Result<AiDecision, MoveError> {
        let ai_mark = agent.config().ai_mark;
        if self.is_finished() {
            return Err(MoveError::GameFinished);
        }
        if ai_mark != self.current_player {
            return Err(MoveError::NotPlayerTurn {
                expected: self.current_player,
                actual: ai_mark,
            });
        }

        let decision = agent.decide(&self.board);
        let cell = decision.cell.ok_or(MoveError::NoMoveAvailable)?;
        self.place(ai_mark, cell)?;
        Ok(decision)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.difficulty);
    }

    /// 切换难度会重新开局。
    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.difficulty = difficulty;
        self.reset();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(AiDifficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiConfig;
    use crate::game::Winner;

    fn hard_agent(mark: Mark) -> AiAgent {
        AiAgent::with_seed(AiConfig::from_difficulty(AiDifficulty::Hard).with_mark(mark), 9)
    }

    #[test]
    fn new_game_starts_with_human() {
        let state = GameState::default();
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.difficulty, AiDifficulty::Medium);
        assert_eq!(state.move_count(), 0);
        assert!(!state.is_finished());
    }

    #[test]
    fn turns_alternate_between_marks() {
        let mut state = GameState::default();
        state.play(0).expect("human move should succeed");
        assert_eq!(state.current_player, Mark::O);

        let error = state.play(1).unwrap_err();
        assert_eq!(
            error,
            MoveError::NotPlayerTurn {
                expected: Mark::O,
                actual: Mark::X
            }
        );

        state.place(Mark::O, 4).expect("ai move should succeed");
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.move_count(), 2);
    }

    #[test]
    fn rejects_invalid_cells() {
        let mut state = GameState::default();
        assert_eq!(
            state.play(9).unwrap_err(),
            MoveError::CellOutOfRange { index: 9 }
        );
        state.play(3).expect("human move should succeed");
        state.place(Mark::O, 4).expect("ai move should succeed");
        assert_eq!(
            state.play(4).unwrap_err(),
            MoveError::CellOccupied { index: 4 }
        );
    }

    #[test]
    fn win_finishes_the_game() {
        let mut state = GameState::default();
        for (mark, index) in [(Mark::X, 0), (Mark::O, 3), (Mark::X, 1), (Mark::O, 4)] {
            assert_eq!(state.place(mark, index), Ok(None));
        }
        let verdict = state
            .play(2)
            .expect("winning move should succeed")
            .expect("top row completes");
        assert_eq!(verdict.winner, Winner::X);
        assert_eq!(verdict.winning_line, vec![0, 1, 2]);
        assert!(state.is_finished());
        assert_eq!(state.current_player, Mark::X);
        assert_eq!(state.place(Mark::X, 8).unwrap_err(), MoveError::GameFinished);
    }

    #[test]
    fn ai_reply_places_agent_mark() {
        let mut state = GameState::new(AiDifficulty::Hard);
        state.play(0).expect("human move should succeed");
        let decision = state
            .apply_ai_move(&mut hard_agent(Mark::O))
            .expect("ai move should succeed");
        assert_eq!(decision.cell, Some(4));
        assert_eq!(state.board.get(4), Some(Mark::O));
        assert_eq!(state.current_player, Mark::X);
    }

    #[test]
    fn ai_reply_out_of_turn_is_rejected() {
        let mut state = GameState::new(AiDifficulty::Hard);
        let before = state.clone();
        let error = state.apply_ai_move(&mut hard_agent(Mark::O)).unwrap_err();
        assert_eq!(
            error,
            MoveError::NotPlayerTurn {
                expected: Mark::X,
                actual: Mark::O
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn ai_reply_after_game_over_is_rejected() {
        let mut state = GameState::default();
        for (mark, index) in [(Mark::X, 0), (Mark::O, 3), (Mark::X, 1), (Mark::O, 4), (Mark::X, 2)] {
            state.place(mark, index).expect("setup move should succeed");
        }
        let error = state.apply_ai_move(&mut hard_agent(Mark::O)).unwrap_err();
        assert_eq!(error, MoveError::GameFinished);
    }

    #[test]
    fn changing_difficulty_resets_board() {
        let mut state = GameState::new(AiDifficulty::Easy);
        state.play(4).expect("human move should succeed");
        state.set_difficulty(AiDifficulty::Hard);
        assert_eq!(state.board, Board::new());
        assert_eq!(state.current_player, HUMAN_MARK);
        assert_eq!(state.difficulty, AiDifficulty::Hard);

        state.play(0).expect("human move should succeed");
        state.reset();
        assert_eq!(state.move_count(), 0);
        assert_eq!(state.difficulty, AiDifficulty::Hard);
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = GameState::new(AiDifficulty::Hard);
        state.play(4).expect("human move should succeed");
        let json = serde_json::to_string(&state).expect("state should serialize");
        let restored: GameState = serde_json::from_str(&json).expect("state should deserialize");
        assert_eq!(restored, state);
    }
}
