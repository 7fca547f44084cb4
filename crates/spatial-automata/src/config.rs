//! Simulation configuration and presets

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::automaton::{SimulationResult, SpatialAutomaton};
use crate::error::Result;
use crate::payoff::Game;
use crate::random::SeededRng;
use crate::strategy::{describe_strategy, Strategy};

/// How row 0 is filled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitMode {
    /// One strategy-1 cell in the centre
    #[default]
    Single,
    /// Fair coin per cell
    Random,
}

/// Everything needed to reproduce a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub game: Game,
    /// Number of generations, including row 0
    pub rows: usize,
    /// Ring size, `2 * rows + 1` when absent
    #[serde(default)]
    pub cols: Option<usize>,
    /// Seed for random rows and tie-breaks, entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub init: InitMode,
}

impl SimulationConfig {
    pub fn new(game: Game, rows: usize) -> Self {
        Self { game, rows, cols: None, seed: None, init: InitMode::Single }
    }

    /// Hawk-Dove with value 2, cost 3
    pub fn hawk_dove(rows: usize) -> Self {
        Self::new(Game::hawk_dove(2.0, 3.0), rows)
    }

    /// Stag Hunt with hare 2, stag 3, sucker 0
    pub fn stag_hunt(rows: usize) -> Self {
        Self::new(Game::stag_hunt(2.0, 3.0, 0.0), rows)
    }

    /// Prisoner's Dilemma with T=3, R=2, P=1, S=0
    pub fn prisoners_dilemma(rows: usize) -> Self {
        Self::new(Game::prisoners_dilemma(3.0, 2.0, 1.0, 0.0), rows)
    }

    pub fn with_cols(mut self, cols: usize) -> Self {
        self.cols = Some(cols);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_init(mut self, init: InitMode) -> Self {
        self.init = init;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Allocate and initialise an automaton without stepping it
    pub fn build(&self) -> Result<SpatialAutomaton> {
        let table = self.game.payoff_table()?;
        let mut automaton =
            SpatialAutomaton::with_rng(table, self.rows, self.cols, SeededRng::new(self.seed))?;
        match self.init {
            InitMode::Single => automaton.init_single()?,
            InitMode::Random => automaton.init_random()?,
        }
        Ok(automaton)
    }
}

/// Build, initialise and run an automaton to completion
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult> {
    debug!(game = config.game.kind(), rows = config.rows, init = ?config.init, "simulating");
    let mut automaton = config.build()?;
    if !automaton.is_complete() {
        automaton.run()?;
    }
    Ok(automaton.to_result())
}

/// A named game setting
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Preset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Display names of strategy 0 and strategy 1
    pub labels: [&'static str; 2],
    pub game: Game,
}

fn labels(game_kind: &str) -> [&'static str; 2] {
    [
        describe_strategy(Strategy::Cooperate, game_kind),
        describe_strategy(Strategy::Defect, game_kind),
    ]
}

/// The standard parameterisations of the three games
pub fn presets() -> Vec<Preset> {
    vec![
        Preset {
            id: "hawk_dove",
            name: "Hawk-Dove",
            description: "Value 2, cost 3. Doves share, hawks fight and pay for it.",
            labels: labels("hawk_dove"),
            game: Game::hawk_dove(2.0, 3.0),
        },
        Preset {
            id: "stag_hunt",
            name: "Stag Hunt",
            description: "Hare 2, stag 3, sucker 0. Stag hunters only win together.",
            labels: labels("stag_hunt"),
            game: Game::stag_hunt(2.0, 3.0, 0.0),
        },
        Preset {
            id: "prisoners_dilemma",
            name: "Prisoner's Dilemma",
            description: "T=3, R=2, P=1, S=0. Defection pays against any single opponent.",
            labels: labels("prisoners_dilemma"),
            game: Game::prisoners_dilemma(3.0, 2.0, 1.0, 0.0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::Phase;
    use crate::error::{ConfigError, Error};

    #[test]
    fn test_presets_match_constructors() {
        let presets = presets();
        assert_eq!(presets.len(), 3);
        assert_eq!(presets[0].game, SimulationConfig::hawk_dove(10).game);
        assert_eq!(presets[1].game, SimulationConfig::stag_hunt(10).game);
        assert_eq!(presets[2].game, SimulationConfig::prisoners_dilemma(10).game);
        for preset in &presets {
            assert_eq!(preset.id, preset.game.kind());
        }
    }

    #[test]
    fn test_preset_labels() {
        let labels: Vec<_> = presets().iter().map(|p| p.labels).collect();
        assert_eq!(
            labels,
            vec![["Dove", "Hawk"], ["Stag", "Hare"], ["Cooperate", "Defect"]]
        );
    }

    #[test]
    fn test_from_json_defaults() {
        let config = SimulationConfig::from_json(
            r#"{"game": {"kind": "hawk_dove", "value": 2, "cost": 3}, "rows": 12}"#,
        )
        .unwrap();
        assert_eq!(config, SimulationConfig::hawk_dove(12));
        assert_eq!(config.init, InitMode::Single);
    }

    #[test]
    fn test_json_round_trip() {
        let config = SimulationConfig::stag_hunt(8)
            .with_cols(11)
            .with_seed(4)
            .with_init(InitMode::Random);
        let json = config.to_json().unwrap();
        assert_eq!(SimulationConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        let err = SimulationConfig::from_json(r#"{"game": {"kind": "chicken"}, "rows": 3}"#)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_build_rejects_huge_rows() {
        let config = SimulationConfig::from_json(
            r#"{"game": {"kind": "hawk_dove", "value": 2, "cost": 3}, "rows": 100000}"#,
        )
        .unwrap();
        let err = config.build().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::TooLarge { rows: 100_000, .. })));
        assert!(matches!(simulate(&config), Err(Error::Config(ConfigError::TooLarge { .. }))));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_build_rejects_overflowing_rows() {
        let config = SimulationConfig::from_json(
            r#"{"game": {"kind": "hawk_dove", "value": 2, "cost": 3}, "rows": 4294967296}"#,
        )
        .unwrap();
        assert!(matches!(
            config.build().unwrap_err(),
            Error::Config(ConfigError::TooLarge { rows: 4_294_967_296, .. })
        ));
    }

    #[test]
    fn test_build_initialises() {
        let automaton = SimulationConfig::prisoners_dilemma(5).build().unwrap();
        assert_eq!(automaton.phase(), Phase::Ready);
        assert_eq!(automaton.cols(), 11);
        assert_eq!(automaton.count_defectors(0), 1);
    }

    #[test]
    fn test_build_rejects_bad_dimensions() {
        let err = SimulationConfig::hawk_dove(4).with_cols(2).build().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidCols { cols: 2 })));

        let err = SimulationConfig::hawk_dove(0).build().unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::InvalidRows { rows: 0 })));
    }

    #[test]
    fn test_build_rejects_bad_game() {
        let config = SimulationConfig::new(Game::hawk_dove(f64::NAN, 3.0), 4);
        assert!(matches!(
            config.build().unwrap_err(),
            Error::Config(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_simulate_is_reproducible() {
        let config = SimulationConfig::hawk_dove(25).with_seed(99).with_init(InitMode::Random);
        let a = simulate(&config).unwrap();
        let b = simulate(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.grid.len(), 25);
        assert_eq!(a.cols, 51);
    }

    #[test]
    fn test_simulate_single_row() {
        let result = simulate(&SimulationConfig::prisoners_dilemma(1)).unwrap();
        assert_eq!(result.grid, vec![vec![0, 1, 0]]);
    }

    #[test]
    fn test_simulate_all_games() {
        for preset in presets() {
            let config = SimulationConfig::new(preset.game, 15)
                .with_seed(1)
                .with_init(InitMode::Random);
            let result = simulate(&config).unwrap();
            assert_eq!(result.rows, 15);
            assert_eq!(result.defectors.len(), 15);
            assert!(result.grid.iter().flatten().all(|b| *b <= 1));
        }
    }
}
