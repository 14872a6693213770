//! 电脑对手：随机、限深与完整 minimax 三档策略。

pub mod minimax;

pub use minimax::{
    easy_move, hard_move, medium_move, select_move, AiAgent, AiConfig, AiDecision, AiDifficulty,
    AiStrategy,
};
