//! Payoff tables and the games that produce them
//!
//! The engine only ever sees a [`PayoffTable`]: eight payoffs, one per
//! `(left, self, right)` neighbourhood. A [`Game`] is a named parameter set
//! that builds such a table from a symmetric 2x2 matrix, scoring each cell
//! as the sum of its two pairwise games against its ring neighbours.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Strategy;

/// Number of distinct neighbourhoods
pub const NEIGHBORHOODS: usize = 8;

/// 3-bit index of a neighbourhood: `left*4 + mid*2 + right`
pub fn neighborhood_index(left: Strategy, mid: Strategy, right: Strategy) -> usize {
    (left.index() << 2) | (mid.index() << 1) | right.index()
}

/// Textual key of a neighbourhood index, e.g. `5 -> "101"`
pub fn neighborhood_key(index: usize) -> String {
    format!("{:03b}", index & 0b111)
}

fn parse_key(key: &str) -> Result<usize, ConfigError> {
    let invalid = || ConfigError::InvalidKey { key: key.to_string() };
    if key.len() != 3 {
        return Err(invalid());
    }
    key.bytes().try_fold(0usize, |acc, b| match b {
        b'0' => Ok(acc << 1),
        b'1' => Ok((acc << 1) | 1),
        _ => Err(invalid()),
    })
}

/// Fixed neighbourhood -> payoff mapping
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct PayoffTable {
    values: [f64; NEIGHBORHOODS],
}

impl PayoffTable {
    /// Build from payoffs already in index order
    pub fn new(values: [f64; NEIGHBORHOODS]) -> Result<Self, ConfigError> {
        for (index, value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name: neighborhood_key(index) });
            }
        }
        Ok(Self { values })
    }

    /// Build from `"lmr"` keyed entries; all 8 keys must appear exactly once
    pub fn from_entries<I, K>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut values = [None; NEIGHBORHOODS];
        for (key, value) in entries {
            let key = key.as_ref();
            let index = parse_key(key)?;
            if values[index].replace(value).is_some() {
                return Err(ConfigError::DuplicateKey { key: key.to_string() });
            }
        }
        if let Some(missing) = values.iter().position(Option::is_none) {
            return Err(ConfigError::MissingPayoff { key: neighborhood_key(missing) });
        }

        let mut resolved = [0.0; NEIGHBORHOODS];
        for (slot, value) in resolved.iter_mut().zip(values) {
            *slot = value.unwrap_or_default();
        }
        Self::new(resolved)
    }

    /// Every neighbourhood pays the same
    pub fn uniform(value: f64) -> Result<Self, ConfigError> {
        Self::new([value; NEIGHBORHOODS])
    }

    /// Sum of the two pairwise games a cell plays against its neighbours
    pub fn from_matrix(matrix: &PayoffMatrix) -> Result<Self, ConfigError> {
        matrix.validate()?;
        let mut values = [0.0; NEIGHBORHOODS];
        for (index, slot) in values.iter_mut().enumerate() {
            let left = (index >> 2) & 1;
            let mid = (index >> 1) & 1;
            let right = index & 1;
            *slot = matrix.cells[mid][left] + matrix.cells[mid][right];
        }
        Self::new(values)
    }

    pub fn get(&self, left: Strategy, mid: Strategy, right: Strategy) -> f64 {
        self.values[neighborhood_index(left, mid, right)]
    }

    pub fn values(&self) -> &[f64; NEIGHBORHOODS] {
        &self.values
    }
}

impl TryFrom<BTreeMap<String, f64>> for PayoffTable {
    type Error = ConfigError;

    fn try_from(map: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::from_entries(map)
    }
}

impl From<PayoffTable> for BTreeMap<String, f64> {
    fn from(table: PayoffTable) -> Self {
        table
            .values
            .iter()
            .enumerate()
            .map(|(index, value)| (neighborhood_key(index), *value))
            .collect()
    }
}

/// Symmetric 2x2 game: `cells[own][opponent]` is the payoff to `own`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PayoffMatrix {
    pub cells: [[f64; 2]; 2],
}

impl PayoffMatrix {
    pub fn new(cells: [[f64; 2]; 2]) -> Self {
        Self { cells }
    }

    pub fn payoff(&self, own: Strategy, opponent: Strategy) -> f64 {
        self.cells[own.index()][opponent.index()]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (own, row) in self.cells.iter().enumerate() {
            for (opponent, value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinite {
                        name: format!("matrix[{}][{}]", own, opponent),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Named game parameterisations
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Game {
    /// Resource of `value`, fight costs `cost`. Strategy 0 is the dove.
    /// Two hawks each get `(value - cost) / 2`, so payoffs go negative
    /// whenever `cost > value`.
    HawkDove { value: f64, cost: f64 },
    /// Strategy 0 hunts stag (`stag` together, `sucker` alone); strategy 1
    /// always gets `hare`.
    StagHunt { hare: f64, stag: f64, sucker: f64 },
    /// Temptation, reward, punishment, sucker. Strategy 0 cooperates.
    PrisonersDilemma { temptation: f64, reward: f64, punishment: f64, sucker: f64 },
    /// Explicit table, bypassing the matrix construction
    Table { entries: PayoffTable },
}

impl Game {
    pub fn hawk_dove(value: f64, cost: f64) -> Self {
        Game::HawkDove { value, cost }
    }

    pub fn stag_hunt(hare: f64, stag: f64, sucker: f64) -> Self {
        Game::StagHunt { hare, stag, sucker }
    }

    pub fn prisoners_dilemma(temptation: f64, reward: f64, punishment: f64, sucker: f64) -> Self {
        Game::PrisonersDilemma { temptation, reward, punishment, sucker }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Game::HawkDove { .. } => "hawk_dove",
            Game::StagHunt { .. } => "stag_hunt",
            Game::PrisonersDilemma { .. } => "prisoners_dilemma",
            Game::Table { .. } => "table",
        }
    }

    /// Pairwise matrix, if this game is defined by one
    pub fn matrix(&self) -> Option<PayoffMatrix> {
        let cells = match *self {
            Game::HawkDove { value, cost } => [
                [value / 2.0, 0.0],
                [value, (value - cost) / 2.0],
            ],
            Game::StagHunt { hare, stag, sucker } => [[stag, sucker], [hare, hare]],
            Game::PrisonersDilemma { temptation, reward, punishment, sucker } => [
                [reward, sucker],
                [temptation, punishment],
            ],
            Game::Table { .. } => return None,
        };
        Some(PayoffMatrix::new(cells))
    }

    pub fn payoff_table(&self) -> Result<PayoffTable, ConfigError> {
        if let Game::Table { entries } = self {
            return Ok(entries.clone());
        }
        self.check_params()?;
        PayoffTable::from_matrix(&self.matrix().unwrap_or_default())
    }

    fn check_params(&self) -> Result<(), ConfigError> {
        let params = match *self {
            Game::HawkDove { value, cost } => vec![("value", value), ("cost", cost)],
            Game::StagHunt { hare, stag, sucker } => {
                vec![("hare", hare), ("stag", stag), ("sucker", sucker)]
            }
            Game::PrisonersDilemma { temptation, reward, punishment, sucker } => vec![
                ("temptation", temptation),
                ("reward", reward),
                ("punishment", punishment),
                ("sucker", sucker),
            ],
            Game::Table { .. } => Vec::new(),
        };
        match params.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, _)) => Err(ConfigError::NonFinite { name: name.to_string() }),
            None => Ok(()),
        }
    }
}
