//! WASM bindings for rendering automata in the browser

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;
use crate::{describe_strategy, presets, simulate, Game, SimulationConfig, Strategy};

/// Run a simulation described by a JSON `SimulationConfig`
///
/// # Returns
/// `SimulationResult` object: `rows`, `cols`, `grid` (0/1 per cell),
/// `payoffs`, `defectors`
#[wasm_bindgen]
pub fn run_simulation(config_json: &str) -> Result<JsValue, JsError> {
    let config = SimulationConfig::from_json(config_json)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;

    let result = simulate(&config).map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Payoff table of a JSON `Game`, keyed `"000"` through `"111"`
#[wasm_bindgen]
pub fn get_payoff_table(game_json: &str) -> Result<JsValue, JsError> {
    let game: Game = serde_json::from_str(game_json)
        .map_err(|e| JsError::new(&format!("Invalid game: {}", e)))?;
    let table = game.payoff_table().map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&table)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Standard parameterisations of the three games
#[wasm_bindgen]
pub fn get_game_presets() -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&presets())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Display name of strategy bit `bit` (0 or 1) under a game kind
#[wasm_bindgen]
pub fn get_strategy_label(game_kind: &str, bit: u8) -> Result<String, JsError> {
    let strategy = match bit {
        0 => Strategy::Cooperate,
        1 => Strategy::Defect,
        _ => return Err(JsError::new(&format!("Strategy bit must be 0 or 1, got {}", bit))),
    };
    Ok(describe_strategy(strategy, game_kind).to_string())
}

/// Preset config JSON for a game id, ready to pass to `run_simulation`
#[wasm_bindgen]
pub fn create_config(game_id: &str, rows: usize) -> Result<String, JsError> {
    let config = match game_id {
        "hawk_dove" => SimulationConfig::hawk_dove(rows),
        "stag_hunt" => SimulationConfig::stag_hunt(rows),
        "prisoners_dilemma" => SimulationConfig::prisoners_dilemma(rows),
        _ => return Err(JsError::new(&format!("Unknown game: {}", game_id))),
    };

    config.to_json().map_err(|e| JsError::new(&e.to_string()))
}
