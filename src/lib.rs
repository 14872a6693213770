pub mod ai;
pub mod game;
pub mod utils;

use gloo_timers::future::TimeoutFuture;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{AiAgent, AiConfig, AiDecision, AiDifficulty, AiStrategy};
pub use game::{
    Board, BoardError, Cell, GameState, Mark, MoveError, Verdict, Winner, CELL_COUNT, WIN_PATTERNS,
};

use utils::log;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn to_js_error<E: Serialize + std::fmt::Display>(error: E) -> JsValue {
    to_js(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn decode_board(value: JsValue) -> Result<Board, JsValue> {
    let cells: Vec<Option<String>> = from_value(value).map_err(JsValue::from)?;
    Board::try_from(cells).map_err(to_js_error)
}

fn difficulty_from(value: Option<String>) -> AiDifficulty {
    value
        .as_deref()
        .map(AiDifficulty::parse_or_fallback)
        .unwrap_or(AiDifficulty::FALLBACK)
}

/// 一次完整回合：人类落子，若未终局则电脑应手。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TurnResolution {
    pub board: Board,
    pub human_move: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_move: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<AiDecision>,
    pub verdict: Option<Verdict>,
}

pub fn play_turn<R: Rng>(
    state: &mut GameState,
    agent: &mut AiAgent<R>,
    index: usize,
) -> Result<TurnResolution, MoveError> {
    let before = state.clone();
    state.play(index)?;

    let decision = if state.is_finished() {
        None
    } else {
        match state.apply_ai_move(agent) {
            Ok(decision) => Some(decision),
            Err(error) => {
                *state = before;
                return Err(error);
            }
        }
    };

    Ok(TurnResolution {
        board: state.board,
        human_move: index,
        ai_move: decision.as_ref().and_then(|decision| decision.cell),
        decision,
        verdict: state.outcome.clone(),
    })
}

#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
    agent: AiAgent,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: Option<String>) -> GameEngine {
        let difficulty = difficulty
            .as_deref()
            .map(AiDifficulty::parse_or_fallback)
            .unwrap_or_default();
        GameEngine {
            state: GameState::new(difficulty),
            agent: AiAgent::new(AiConfig::from_difficulty(difficulty)),
        }
    }

    pub fn board(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.board)
    }

    pub fn verdict(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.outcome)
    }

    pub fn difficulty(&self) -> String {
        self.state.difficulty.as_str().to_string()
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn play(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let resolution =
            play_turn(&mut self.state, &mut self.agent, index).map_err(to_js_error)?;
        if let Some(decision) = &resolution.decision {
            log!(
                "[{}] human {} -> ai {:?} ({} nodes)",
                decision.difficulty.as_str(),
                index,
                decision.cell,
                decision.nodes
            );
        }
        if let Some(verdict) = &resolution.verdict {
            log!("game over: {:?} {:?}", verdict.winner, verdict.winning_line);
        }
        to_js(&resolution)
    }

    pub fn reset(&mut self) {
        self.state.reset();
        log!("new game ({})", self.state.difficulty.as_str());
    }

    pub fn set_difficulty(&mut self, difficulty: &str) {
        let difficulty = AiDifficulty::parse_or_fallback(difficulty);
        self.state.set_difficulty(difficulty);
        self.agent = AiAgent::new(AiConfig::from_difficulty(difficulty));
        log!("difficulty set to {}", difficulty.as_str());
    }
}

#[wasm_bindgen(js_name = "evaluate")]
pub fn evaluate_board(board: JsValue) -> Result<JsValue, JsValue> {
    let board = decode_board(board)?;
    to_js(&game::evaluate(&board))
}

#[wasm_bindgen(js_name = "emptyCells")]
pub fn empty_cells(board: JsValue) -> Result<JsValue, JsValue> {
    let board = decode_board(board)?;
    to_js(&game::empty_cells(&board))
}

#[wasm_bindgen(js_name = "isTerminal")]
pub fn is_terminal(board: JsValue) -> Result<bool, JsValue> {
    let board = decode_board(board)?;
    Ok(game::is_terminal(&board))
}

/// 返回电脑选择的格子序号；棋盘已满时返回 `null`。
#[wasm_bindgen(js_name = "selectMove")]
pub fn select_move(board: JsValue, difficulty: Option<String>) -> Result<JsValue, JsValue> {
    let decision = compute_decision(board, difficulty)?;
    to_js(&decision.cell)
}

#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(board: JsValue, difficulty: Option<String>) -> Result<JsValue, JsValue> {
    let decision = compute_decision(board, difficulty)?;
    to_js(&decision)
}

fn compute_decision(board: JsValue, difficulty: Option<String>) -> Result<AiDecision, JsValue> {
    let board = decode_board(board)?;
    let difficulty = difficulty_from(difficulty);
    let mut agent = AiAgent::new(AiConfig::from_difficulty(difficulty));
    let decision = agent.decide(&board);
    log!(
        "[{}] ai picked {:?} ({} nodes)",
        difficulty.as_str(),
        decision.cell,
        decision.nodes
    );
    Ok(decision)
}

/// 与 `selectMove` 相同，但在延迟 `delay_ms` 毫秒后才给出结果，模拟思考。
#[wasm_bindgen(js_name = "thinkMove")]
pub fn think_move(
    board: JsValue,
    difficulty: Option<String>,
    delay_ms: Option<u32>,
) -> Result<Promise, JsValue> {
    let board = decode_board(board)?;
    let difficulty = difficulty_from(difficulty);
    let delay = delay_ms.unwrap_or(0);

    Ok(future_to_promise(async move {
        if delay > 0 {
            TimeoutFuture::new(delay).await;
        }
        let mut agent = AiAgent::new(AiConfig::from_difficulty(difficulty));
        let cell = agent.select_move(&board);
        to_js(&cell)
    }))
}
