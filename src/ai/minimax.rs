use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::game::{empty_cells, evaluate, Board, Mark, Winner, CELL_COUNT, CENTER, CORNERS};

const WIN_SCORE: i32 = 10;
const MEDIUM_RANDOM_CHANCE: f64 = 0.3;
const MEDIUM_MAX_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl AiDifficulty {
    /// 无法识别的难度统一回退到该值。
    pub const FALLBACK: AiDifficulty = AiDifficulty::Hard;

    pub fn parse_or_fallback(value: &str) -> Self {
        value.parse().unwrap_or(Self::FALLBACK)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AiDifficulty::Easy => "easy",
            AiDifficulty::Medium => "medium",
            AiDifficulty::Hard => "hard",
        }
    }
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiStrategy {
    Random,
    Bounded,
    Optimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    pub difficulty: AiDifficulty,
    pub ai_mark: Mark,
    /// 直接随机落子的概率，取值 `[0, 1]`。
    pub random_move_chance: f64,
    /// 搜索层数上限，`None` 表示搜索到终局。
    pub max_depth: Option<u8>,
    /// 开局捷径：空棋盘占中心，对手先占中心时随机占角。
    pub opening_shortcuts: bool,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        match difficulty {
            AiDifficulty::Easy => Self {
                difficulty,
                ai_mark: Mark::O,
                random_move_chance: 1.0,
                max_depth: None,
                opening_shortcuts: false,
            },
            AiDifficulty::Medium => Self {
                difficulty,
                ai_mark: Mark::O,
                random_move_chance: MEDIUM_RANDOM_CHANCE,
                max_depth: Some(MEDIUM_MAX_DEPTH),
                opening_shortcuts: false,
            },
            AiDifficulty::Hard => Self {
                difficulty,
                ai_mark: Mark::O,
                random_move_chance: 0.0,
                max_depth: None,
                opening_shortcuts: true,
            },
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.ai_mark = mark;
        self
    }

    pub fn strategy(&self) -> AiStrategy {
        if self.random_move_chance >= 1.0 {
            AiStrategy::Random
        } else if self.max_depth.is_some() {
            AiStrategy::Bounded
        } else {
            AiStrategy::Optimal
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(AiDifficulty::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(rename = "move")]
    pub cell: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    pub nodes: u64,
    pub depth_reached: u8,
    pub randomized: bool,
    pub strategy: AiStrategy,
    pub difficulty: AiDifficulty,
}

impl AiDecision {
    fn new(config: &AiConfig, cell: Option<usize>) -> Self {
        Self {
            cell,
            score: None,
            nodes: 0,
            depth_reached: 0,
            randomized: false,
            strategy: config.strategy(),
            difficulty: config.difficulty,
        }
    }
}

struct SearchStats {
    nodes: u64,
    depth_reached: u8,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            nodes: 0,
            depth_reached: 0,
        }
    }
}

struct Search {
    ai_mark: Mark,
    max_depth: Option<u8>,
    stats: SearchStats,
}

impl Search {
    fn new(ai_mark: Mark, max_depth: Option<u8>) -> Self {
        Self {
            ai_mark,
            max_depth,
            stats: SearchStats::new(),
        }
    }

    /// `depth` 从传入的根局面开始计数。胜得越快、输得越慢，分数越高。
    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.stats.nodes += 1;
        if depth > self.stats.depth_reached {
            self.stats.depth_reached = depth;
        }

        if let Some(verdict) = evaluate(board) {
            let depth = i32::from(depth);
            return match verdict.winner {
                Winner::Draw => 0,
                winner if winner.mark() == Some(self.ai_mark) => WIN_SCORE - depth,
                _ => depth - WIN_SCORE,
            };
        }

        if self.max_depth.is_some_and(|max| depth >= max) {
            return 0;
        }

        if maximizing {
            let mut value = i32::MIN;
            for cell in empty_cells(board) {
                let child = board.with_mark(cell, self.ai_mark);
                let score = self.minimax(&child, depth + 1, false, alpha, beta);
                value = value.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        } else {
            let mut value = i32::MAX;
            for cell in empty_cells(board) {
                let child = board.with_mark(cell, self.ai_mark.opponent());
                let score = self.minimax(&child, depth + 1, true, alpha, beta);
                value = value.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        }
    }
}

pub struct AiAgent<R = SmallRng> {
    config: AiConfig,
    rng: R,
}

impl AiAgent<SmallRng> {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> AiAgent<R> {
    pub fn with_rng(config: AiConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn select_move(&mut self, board: &Board) -> Option<usize> {
        self.decide(board).cell
    }

    pub fn decide(&mut self, board: &Board) -> AiDecision {
        let candidates = empty_cells(board);
        if candidates.is_empty() {
            return AiDecision::new(&self.config, None);
        }

        let chance = self.config.random_move_chance;
        if chance > 0.0 && (chance >= 1.0 || self.rng.gen_bool(chance)) {
            return self.random_decision(&candidates);
        }

        if self.config.opening_shortcuts {
            if candidates.len() == CELL_COUNT {
                return AiDecision::new(&self.config, Some(CENTER));
            }
            if candidates.len() == CELL_COUNT - 1 && board.get(CENTER).is_some() {
                let corner = CORNERS.choose(&mut self.rng).copied();
                return AiDecision {
                    randomized: true,
                    ..AiDecision::new(&self.config, corner)
                };
            }
        }

        self.search_decision(board, &candidates)
    }

    fn random_decision(&mut self, candidates: &[usize]) -> AiDecision {
        let cell = candidates.choose(&mut self.rng).copied();
        AiDecision {
            randomized: true,
            ..AiDecision::new(&self.config, cell)
        }
    }

    fn search_decision(&mut self, board: &Board, candidates: &[usize]) -> AiDecision {
        let mut search = Search::new(self.config.ai_mark, self.config.max_depth);
        let mut best_cell = None;
        let mut best_score = i32::MIN;

        // 每个根候选都用完整窗口搜索，剪枝不影响根节点的比较结果。
        for &cell in candidates {
            let child = board.with_mark(cell, self.config.ai_mark);
            let score = search.minimax(&child, 0, false, i32::MIN, i32::MAX);
            if best_cell.is_none() || score > best_score {
                best_score = score;
                best_cell = Some(cell);
            }
        }

        AiDecision {
            score: best_cell.map(|_| best_score),
            nodes: search.stats.nodes,
            depth_reached: search.stats.depth_reached,
            ..AiDecision::new(&self.config, best_cell)
        }
    }
}

pub fn easy_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    AiAgent::with_rng(AiConfig::from_difficulty(AiDifficulty::Easy), rng).select_move(board)
}

pub fn medium_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    AiAgent::with_rng(AiConfig::from_difficulty(AiDifficulty::Medium), rng).select_move(board)
}

pub fn hard_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    AiAgent::with_rng(AiConfig::from_difficulty(AiDifficulty::Hard), rng).select_move(board)
}

/// 按难度名称分派：`"easy"`、`"medium"` 精确匹配，其余一律按困难处理。
pub fn select_move<R: Rng>(board: &Board, difficulty: &str, rng: &mut R) -> Option<usize> {
    match AiDifficulty::parse_or_fallback(difficulty) {
        AiDifficulty::Easy => easy_move(board, rng),
        AiDifficulty::Medium => medium_move(board, rng),
        AiDifficulty::Hard => hard_move(board, rng),
    }
}
