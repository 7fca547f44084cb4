//! Spatial Game Automata
//!
//! One-dimensional game-theoretic automata on a ring of cells. Each cell
//! plays a binary strategy against its two neighbours and, every
//! generation, imitates whichever of left, self or right scored best.
//! Hawk-Dove, Stag Hunt and the Prisoner's Dilemma differ only in the
//! payoff table handed to the same engine.
//! This crate is compiled to:
//! - Native (library use and tests)
//! - WASM (browser rendering of the generation grid)

mod automaton;
mod config;
mod error;
mod payoff;
mod random;
mod strategy;

#[cfg(feature = "wasm")]
mod wasm;

pub use automaton::{
    imitation_choice, Choice, Phase, SimulationResult, SpatialAutomaton, MAX_CELLS,
};
pub use config::{presets, simulate, InitMode, Preset, SimulationConfig};
pub use error::{ConfigError, Error, Result, StepError};
pub use payoff::{
    neighborhood_index, neighborhood_key, Game, PayoffMatrix, PayoffTable, NEIGHBORHOODS,
};
pub use random::SeededRng;
pub use strategy::{describe_strategy, Strategy};
