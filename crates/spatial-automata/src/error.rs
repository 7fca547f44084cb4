//! Error types for automaton configuration and sequencing

use thiserror::Error;

/// Rejected before any grid is allocated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("rows must be at least 1, got {rows}")]
    InvalidRows { rows: usize },

    /// A neighbourhood needs three distinct cells.
    #[error("cols must be at least 3, got {cols}")]
    InvalidCols { cols: usize },

    #[error("payoff table has no entry for neighbourhood {key}")]
    MissingPayoff { key: String },

    #[error("invalid neighbourhood key {key:?} (expected three 0/1 characters)")]
    InvalidKey { key: String },

    #[error("duplicate payoff entry for neighbourhood {key}")]
    DuplicateKey { key: String },

    /// Grid cell count overflows or exceeds the allocation limit.
    #[error("grid of {rows} rows by {cols:?} cols is too large")]
    TooLarge { rows: usize, cols: Option<usize> },

    #[error("initial row has {got} cells, expected {expected}")]
    RowLength { expected: usize, got: usize },

    #[error("payoff parameter {name} is not finite")]
    NonFinite { name: String },
}

/// Raised when the automaton lifecycle is driven out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("automaton already initialised (next row is {next})")]
    AlreadyInitialized { next: usize },

    #[error("automaton has not been initialised")]
    NotInitialized,

    #[error("automaton is complete, all {rows} rows are filled")]
    Complete { rows: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
